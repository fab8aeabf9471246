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

//! Typed errors for the BSL driver.
//!
//! The wire protocol only ever hands back a single status byte, overloading
//! UART-layer framing errors, BSL core errors and a synthetic timeout. This
//! module keeps the numeric codes (for logging) but gives callers an
//! exhaustively matchable type instead of a bare `u8`.

use std::fmt;

use thiserror::Error;

use crate::constants::{core_msg, uart_err};

/// The one-byte acknowledgement returned by the target's UART layer before
/// any BSL core response.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum UartAck {
    /// `0x00`, framing-level acceptance.
    Ack,
    /// `0x51`, malformed header byte.
    HeaderIncorrect,
    /// `0x52`, CRC mismatch.
    ChecksumIncorrect,
    /// `0x53`, zero-length packet.
    PacketSizeZero,
    /// `0x54`, packet larger than the receive buffer.
    PacketSizeExceedsBuffer,
    /// `0x55`, unspecified UART-layer error.
    UnknownError,
    /// `0x56`, baud rate code not recognized.
    UnknownBaudRate,
    /// `0xEE`, synthesized locally: no byte arrived within the retry
    /// window.
    TimeOut,
}

impl UartAck {
    /// Numeric code as it appears on the wire (or, for [`UartAck::TimeOut`],
    /// the synthetic local sentinel).
    pub fn code(self) -> u8 {
        match self {
            UartAck::Ack => uart_err::ACK,
            UartAck::HeaderIncorrect => uart_err::HEADER_INCORRECT,
            UartAck::ChecksumIncorrect => uart_err::CHECKSUM_INCORRECT,
            UartAck::PacketSizeZero => uart_err::PACKET_SIZE_ZERO,
            UartAck::PacketSizeExceedsBuffer => {
                uart_err::PACKET_SIZE_EXCEEDS_BUFFER
            }
            UartAck::UnknownError => uart_err::UNKNOWN_ERROR,
            UartAck::UnknownBaudRate => uart_err::UNKNOWN_BAUD_RATE,
            UartAck::TimeOut => uart_err::TIME_OUT,
        }
    }

    /// Parse a raw byte received from the transport.
    ///
    /// Any byte not in the known set is mapped to
    /// [`UartAck::UnknownError`], mirroring the target's own
    /// `EBH_UART_ERROR_UNKNOWN_ERROR` catch-all.
    pub fn from_byte(byte: u8) -> UartAck {
        match byte {
            uart_err::ACK => UartAck::Ack,
            uart_err::HEADER_INCORRECT => UartAck::HeaderIncorrect,
            uart_err::CHECKSUM_INCORRECT => UartAck::ChecksumIncorrect,
            uart_err::PACKET_SIZE_ZERO => UartAck::PacketSizeZero,
            uart_err::PACKET_SIZE_EXCEEDS_BUFFER => {
                UartAck::PacketSizeExceedsBuffer
            }
            uart_err::UNKNOWN_BAUD_RATE => UartAck::UnknownBaudRate,
            uart_err::TIME_OUT => UartAck::TimeOut,
            _ => UartAck::UnknownError,
        }
    }
}

impl From<u8> for UartAck {
    /// Equivalent to [`UartAck::from_byte`]; never fails, since any
    /// unrecognized byte maps to [`UartAck::UnknownError`].
    fn from(byte: u8) -> UartAck {
        UartAck::from_byte(byte)
    }
}

impl fmt::Display for UartAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UartAck::Ack => "ACK",
            UartAck::HeaderIncorrect => "HEADER_INCORRECT",
            UartAck::ChecksumIncorrect => "CHECKSUM_INCORRECT",
            UartAck::PacketSizeZero => "PACKET_SIZE_ZERO",
            UartAck::PacketSizeExceedsBuffer => "PACKET_SIZE_EXCEEDS_BUFFER",
            UartAck::UnknownError => "UNKNOWN_ERROR",
            UartAck::UnknownBaudRate => "UNKNOWN_BAUD_RATE",
            UartAck::TimeOut => "TIME_OUT",
        };
        write!(f, "{} ({:#04X})", name, self.code())
    }
}

/// A BSL core error code, carried by a `Message` core response whose byte
/// is not `OPERATION_SUCCESSFUL`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CoreError {
    /// `0x04`, the BSL is password-locked.
    BslLocked,
    /// `0x05`, the password supplied to `rx_password*` didn't match.
    BslPasswordError,
    /// `0x07`, the command byte isn't recognized by this BSL core.
    UnknownCommand,
    /// Any other non-zero message byte, preserved for logging.
    Other(u8),
}

impl CoreError {
    pub fn code(self) -> u8 {
        match self {
            CoreError::BslLocked => core_msg::BSL_LOCKED,
            CoreError::BslPasswordError => core_msg::BSL_PASSWORD_ERROR,
            CoreError::UnknownCommand => core_msg::UNKNOWN_COMMAND,
            CoreError::Other(b) => b,
        }
    }

    pub fn from_byte(byte: u8) -> CoreError {
        match byte {
            core_msg::BSL_LOCKED => CoreError::BslLocked,
            core_msg::BSL_PASSWORD_ERROR => CoreError::BslPasswordError,
            core_msg::UNKNOWN_COMMAND => CoreError::UnknownCommand,
            other => CoreError::Other(other),
        }
    }
}

impl From<u8> for CoreError {
    /// Equivalent to [`CoreError::from_byte`]; never fails, since any
    /// unrecognized byte is preserved as [`CoreError::Other`].
    fn from(byte: u8) -> CoreError {
        CoreError::from_byte(byte)
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoreError::BslLocked => "BSL_LOCKED",
            CoreError::BslPasswordError => "BSL_PASSWORD_ERROR",
            CoreError::UnknownCommand => "UNKNOWN_COMMAND",
            CoreError::Other(_) => "UNKNOWN_CORE_ERROR",
        };
        write!(f, "{} ({:#04X})", name, self.code())
    }
}

/// Errors produced by the BSL driver.
///
/// Generic over `E`, the injected transport's own error type, so a
/// hardware-backed [`crate::transport::ByteTransport`] can surface its own
/// faults (e.g. a UART overrun) without this crate inventing a variant per
/// platform.
#[derive(Debug, Error)]
pub enum BslError<E> {
    /// The injected transport (UART, GPIO or delay source) reported an
    /// error.
    #[error("transport error: {0}")]
    Transport(E),

    /// No ACK byte arrived within the retry window (the synthetic `0xEE`).
    #[error("timed out waiting for ACK")]
    Timeout,

    /// The target's UART layer rejected the frame (`0x51`..`0x56`).
    #[error("UART layer error: {0}")]
    UartLayer(UartAck),

    /// The target's BSL core rejected the command.
    #[error("BSL core error: {0}")]
    Core(CoreError),

    /// An inbound frame's header byte wasn't `0x80`.
    #[error("inbound frame header incorrect")]
    HeaderIncorrect,

    /// An inbound frame's CRC didn't match the computed CRC-CCITT/FALSE.
    #[error("inbound frame checksum incorrect")]
    ChecksumIncorrect,

    /// The requested outbound frame doesn't fit the wire format: `length`
    /// (command + address + payload) would exceed 257 bytes.
    #[error("packet too large: core packet is {len} bytes, max is 257")]
    PacketTooLarge { len: usize },

    /// An inbound frame declared a `length` larger than the caller-provided
    /// buffer.
    #[error(
        "inbound packet size {len} exceeds receive buffer of {cap} bytes"
    )]
    PacketSizeExceedsBuffer { len: usize, cap: usize },

    /// An inbound frame declared `length == 0`.
    ///
    /// The BSL core packet always carries at least a command byte, so this
    /// indicates a desynchronised link rather than a valid reply.
    #[error("inbound frame declared an empty core packet")]
    EmptyPacket,
}

impl<E> BslError<E> {
    /// Wrap a UART-layer ACK byte as the appropriate error, or `Ok(())` if
    /// it was `ACK`.
    pub(crate) fn from_ack(ack: UartAck) -> Result<(), BslError<E>> {
        match ack {
            UartAck::Ack => Ok(()),
            UartAck::TimeOut => Err(BslError::Timeout),
            other => Err(BslError::UartLayer(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uart_ack_round_trips_known_codes() {
        for &code in &[
            uart_err::ACK,
            uart_err::HEADER_INCORRECT,
            uart_err::CHECKSUM_INCORRECT,
            uart_err::PACKET_SIZE_ZERO,
            uart_err::PACKET_SIZE_EXCEEDS_BUFFER,
            uart_err::UNKNOWN_BAUD_RATE,
            uart_err::TIME_OUT,
        ] {
            assert_eq!(UartAck::from_byte(code).code(), code);
        }
    }

    #[test]
    fn uart_ack_unknown_byte_maps_to_unknown_error() {
        assert_eq!(UartAck::from_byte(0x99), UartAck::UnknownError);
    }

    #[test]
    fn uart_ack_from_u8_matches_from_byte() {
        assert_eq!(UartAck::from(uart_err::CHECKSUM_INCORRECT), UartAck::ChecksumIncorrect);
    }

    #[test]
    fn core_error_from_u8_matches_from_byte() {
        assert_eq!(CoreError::from(core_msg::BSL_LOCKED).code(), core_msg::BSL_LOCKED);
    }

    #[test]
    fn core_error_preserves_unrecognized_code() {
        assert_eq!(CoreError::from_byte(0x42).code(), 0x42);
    }

    #[test]
    fn display_includes_hex_code() {
        let msg = format!("{}", UartAck::ChecksumIncorrect);
        assert!(msg.contains("0x52"));
    }
}
