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

//! # MSP430/MSP432 Bootstrap Loader host driver
//!
//! A driver for the UART variant of the TI MSP430/MSP432 Bootstrap Loader
//! (BSL): frame codec, CRC-CCITT engine, ACK/timeout discipline, the full
//! command catalogue, and the RST/TEST invocation sequence (or sync
//! character, for MSP432).
//!
//! The protocol core never assumes an OS: [`transport::ByteTransport`],
//! [`transport::ResetTestPins`] and [`transport::DelayUs`] are the only
//! interfaces it consumes, so a consumer supplies its own UART, GPIO and
//! timer glue and gets a [`session::Bsl`] to drive from there.
//!
//! # See also
//!
//! - [MSP430 Flash Device Bootloader (BSL) User's Guide](https://www.ti.com/lit/ug/slau319aj/slau319aj.pdf)
//! - [MSP432 Bootloader (BSL) User's Guide](https://www.ti.com/lit/ug/slau657/slau657.pdf)

pub mod constants;
pub mod crc;
pub mod error;
pub mod family;
pub mod frame;
pub mod session;
pub mod transport;

pub use crate::error::{BslError, CoreError, UartAck};
pub use crate::family::{AddressWidth, DeviceFamily};
pub use crate::session::{Bsl, VersionInfo};
pub use crate::transport::{BaudRate, ByteTransport, DelayUs, ResetTestPins};
