// Copyright 2021 Locha Mesh Developers <contact@locha.io>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The platform interfaces this crate consumes: a half-duplex UART, the
//! RST/TEST GPIO lines, and a microsecond-granularity busy-delay.
//!
//! These are intentionally generic traits rather than a single `SerialPort`
//! bound because the BSL's physical layer is split across three independent
//! lines that a bring-up board wires to different peripherals: a UART, two
//! GPIOs and a timer.

/// Supported UART baud rates for the BSL link.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BaudRate {
    B9600,
    B19200,
    B38400,
    B57600,
    B115200,
}

impl BaudRate {
    /// The `change_baud_rate` command code for this rate.
    pub fn command_code(self) -> u8 {
        use crate::constants::baud_code;
        match self {
            BaudRate::B9600 => baud_code::B9600,
            BaudRate::B19200 => baud_code::B19200,
            BaudRate::B38400 => baud_code::B38400,
            BaudRate::B57600 => baud_code::B57600,
            BaudRate::B115200 => baud_code::B115200,
        }
    }

    /// Baud rate in bits per second.
    pub fn bps(self) -> u32 {
        match self {
            BaudRate::B9600 => 9600,
            BaudRate::B19200 => 19200,
            BaudRate::B38400 => 38400,
            BaudRate::B57600 => 57600,
            BaudRate::B115200 => 115200,
        }
    }
}

/// A half-duplex, 8-E-1 byte-level UART channel.
///
/// Implementations are expected to block in [`ByteTransport::recv_byte`]
/// until a byte is available; timeouts (beyond the driver's own ACK
/// polling, see [`crate::session::Bsl::receive_ack`]) are the caller's
/// responsibility.
pub trait ByteTransport {
    /// The error type this transport can report.
    type Error;

    /// Send one byte.
    fn send_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Block until one byte is available and return it.
    fn recv_byte(&mut self) -> Result<u8, Self::Error>;

    /// Number of bytes currently available to read without blocking.
    fn bytes_available(&mut self) -> Result<u16, Self::Error>;

    /// Reconfigure the UART to the given baud rate, 8-E-1 framing
    /// unchanged. Idempotent.
    fn configure_baud(&mut self, baud: BaudRate) -> Result<(), Self::Error>;
}

/// The RST and TEST GPIO lines used to force an MSP430 target into its ROM
/// BSL.
pub trait ResetTestPins {
    /// The error type this GPIO port can report.
    type Error;

    /// Drive the RST line high (`true`) or low (`false`).
    fn set_rst(&mut self, high: bool) -> Result<(), Self::Error>;

    /// Drive the TEST line high (`true`) or low (`false`).
    fn set_test(&mut self, high: bool) -> Result<(), Self::Error>;
}

/// A microsecond-granularity busy-wait delay primitive.
pub trait DelayUs {
    /// Busy-wait for at least `micros` microseconds.
    fn delay_us(&mut self, micros: u16);
}
