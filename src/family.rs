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

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// Address width used by a command's address bytes on the wire.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AddressWidth {
    /// 20-bit address, carried as 3 bytes (`a0`, `a1`, `a2`).
    TwentyBit,
    /// 32-bit address, carried as 4 bytes (`a0`..`a3`).
    ThirtyTwoBit,
}

impl AddressWidth {
    /// Number of address bytes this width occupies on the wire.
    #[inline]
    pub fn byte_len(&self) -> usize {
        match self {
            AddressWidth::TwentyBit => 3,
            AddressWidth::ThirtyTwoBit => 4,
        }
    }
}

/// The device family being driven.
///
/// Selects addressing width, mass-erase response semantics, the version
/// response length, and invocation behaviour.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeviceFamily {
    /// MSP430 devices with flash program memory.
    Msp430Flash,
    /// MSP430 devices with FRAM program memory.
    ///
    /// FRAM targets reboot silently on `mass_erase` and emit no ACK or core
    /// response for that command.
    Msp430Fram,
    /// MSP432 devices.
    ///
    /// Use 32-bit addressing and a sync character for BSL entry instead of
    /// the RST/TEST pin sequence.
    Msp432,
}

impl DeviceFamily {
    /// Addressing width native to this family.
    ///
    /// This only reflects the family's *native* width; the `rx_data_block`,
    /// `erase_segment`, `crc_check` and `load_pc` commands come in both a
    /// 20-bit and a 32-bit form regardless of family, selected explicitly by
    /// the caller.
    #[inline]
    pub fn address_width(&self) -> AddressWidth {
        match self {
            DeviceFamily::Msp430Flash | DeviceFamily::Msp430Fram => {
                AddressWidth::TwentyBit
            }
            DeviceFamily::Msp432 => AddressWidth::ThirtyTwoBit,
        }
    }

    /// Number of data bytes returned by `tx_bsl_version`: 10 for MSP432, 4
    /// for the MSP430 families.
    #[inline]
    pub fn version_reply_len(&self) -> usize {
        match self {
            DeviceFamily::Msp430Flash | DeviceFamily::Msp430Fram => 4,
            DeviceFamily::Msp432 => 10,
        }
    }

    /// Whether `mass_erase` waits for an ACK and core reply.
    ///
    /// `false` only for [`DeviceFamily::Msp430Fram`]: the target reboots
    /// mid-erase and never emits either.
    #[inline]
    pub fn mass_erase_expects_reply(&self) -> bool {
        !matches!(self, DeviceFamily::Msp430Fram)
    }

    /// Whether BSL entry uses the MSP432 sync character instead of the
    /// RST/TEST pin sequence.
    #[inline]
    pub fn uses_sync_character(&self) -> bool {
        matches!(self, DeviceFamily::Msp432)
    }
}

#[derive(Debug)]
pub struct ParseDeviceFamilyError;

impl Display for ParseDeviceFamilyError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "invalid value, family must be one of: `msp430-flash`, `msp430-fram` or `msp432`"
        )
    }
}

impl Error for ParseDeviceFamilyError {}

impl FromStr for DeviceFamily {
    type Err = ParseDeviceFamilyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "msp430-flash" | "MSP430_FLASH" => Ok(DeviceFamily::Msp430Flash),
            "msp430-fram" | "MSP430_FRAM" => Ok(DeviceFamily::Msp430Fram),
            "msp432" | "MSP432" => Ok(DeviceFamily::Msp432),
            _ => Err(ParseDeviceFamilyError),
        }
    }
}
