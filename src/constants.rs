// Copyright 2021 Locha Mesh Developers <contact@locha.io>
//
// Based on the previous work of cc2538-bsl and Texas Instruments sblAppEx
// 1.03.00.00 (swra466c.zip).
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

//! Wire-level constants for the MSP430/MSP432 BSL UART protocol: command
//! bytes, core message markers, UART-layer ACK/error bytes and the timing
//! constants the protocol mandates.

/// BSL protocol header byte, the first byte of every frame in both
/// directions.
pub const HEADER: u8 = 0x80;

/// Cap on a frame's total size (header + length + core packet + CRC),
/// matching the target's BSL receive buffer.
pub const MAX_BUFFER_SIZE: usize = 262;

/// Sync byte used by MSP432 devices for automatic baud rate detection.
pub const SYNC_CHARACTER: u8 = 0xFF;

/// Recommended delay between two successive BSL commands, in microseconds.
pub const DELAY_BETWEEN_COMMANDS: u16 = 1200;

/// Number of times the ACK receiver polls for an ACK byte before giving up.
pub const ACK_RETRIES: u16 = 1000;

/// Delay between ACK polls, in microseconds.
pub const ACK_RETRY_DELAY: u16 = 10;

/// Maximum payload bytes carried by a single `rx_data_block*` frame; larger
/// writes are chunked by the command layer.
pub const MAX_CHUNK_SIZE: usize = 256;

#[rustfmt::skip]
pub mod cmd {
    //! BSL command bytes.

    pub const RX_DATA_BLOCK: u8          = 0x10;
    pub const RX_DATA_BLOCK_32: u8       = 0x20;
    /// Reserved, not exposed as a command by this driver.
    pub const RX_DATA_BLOCK_FAST: u8     = 0x1B;
    pub const RX_PASSWORD: u8            = 0x11;
    pub const RX_PASSWORD_32: u8         = 0x21;
    pub const ERASE_SEGMENT: u8          = 0x12;
    pub const ERASE_SEGMENT_32: u8       = 0x22;
    pub const UNLOCK_AND_LOCK_INFO: u8   = 0x13;
    /// Reserved, not exposed as a command by this driver.
    pub const RESERVED: u8               = 0x14;
    pub const MASS_ERASE: u8             = 0x15;
    pub const REBOOT_RESET: u8           = 0x25;
    pub const CRC_CHECK: u8              = 0x16;
    pub const CRC_CHECK_32: u8           = 0x26;
    pub const LOAD_PC: u8                = 0x17;
    pub const LOAD_PC_32: u8             = 0x27;
    /// Reserved, not exposed as a command by this driver.
    pub const TX_DATA_BLOCK: u8          = 0x18;
    /// Reserved, not exposed as a command by this driver.
    pub const TX_DATA_BLOCK_32: u8       = 0x28;
    pub const TX_BSL_VERSION: u8         = 0x19;
    /// Reserved, not exposed as a command by this driver.
    pub const TX_BUFFER_SIZE: u8         = 0x1A;
    pub const FACTORY_RESET: u8          = 0x30;
    pub const CHANGE_BAUD_RATE: u8       = 0x52;
}

#[rustfmt::skip]
pub mod core_msg {
    //! BSL core response markers (first byte of a core response) and the
    //! message codes carried by a [`core_msg::MESSAGE`] response.

    pub const DATA: u8 = 0x3A;
    pub const MESSAGE: u8 = 0x3B;

    pub const OPERATION_SUCCESSFUL: u8 = 0x00;
    pub const BSL_LOCKED: u8           = 0x04;
    pub const BSL_PASSWORD_ERROR: u8   = 0x05;
    pub const UNKNOWN_COMMAND: u8      = 0x07;
}

#[rustfmt::skip]
pub mod uart_err {
    //! UART-layer ACK byte and error codes, returned ahead of any core
    //! response.

    pub const ACK: u8                         = 0x00;
    pub const HEADER_INCORRECT: u8            = 0x51;
    pub const CHECKSUM_INCORRECT: u8          = 0x52;
    pub const PACKET_SIZE_ZERO: u8            = 0x53;
    pub const PACKET_SIZE_EXCEEDS_BUFFER: u8  = 0x54;
    pub const UNKNOWN_ERROR: u8               = 0x55;
    pub const UNKNOWN_BAUD_RATE: u8           = 0x56;
    /// Synthetic: produced locally when no ACK byte arrives in time.
    pub const TIME_OUT: u8                    = 0xEE;
}

#[rustfmt::skip]
pub mod baud_code {
    //! `change_baud_rate` command codes for each supported baud rate.

    pub const B9600: u8   = 0x02;
    pub const B19200: u8  = 0x03;
    pub const B38400: u8  = 0x04;
    pub const B57600: u8  = 0x05;
    pub const B115200: u8 = 0x06;
}
