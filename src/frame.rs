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

//! The BSL frame codec: assembling and transmitting an outbound frame, and
//! parsing and validating an inbound one.
//!
//! `header | len_lo | len_hi | core_packet.. | crc_lo | crc_hi`, with the
//! CRC computed only over `core_packet` (command byte + address bytes +
//! payload), never over the header or length fields.

use crate::constants::{HEADER, MAX_BUFFER_SIZE};
use crate::crc::Crc;
use crate::error::BslError;
use crate::transport::ByteTransport;

/// Largest core packet (command + address + payload) this codec will
/// emit, chosen so a full frame (core packet + 5 framing bytes) fits
/// [`MAX_BUFFER_SIZE`].
pub const MAX_CORE_PACKET_LEN: usize = MAX_BUFFER_SIZE - 5;

fn map_err<T, E>(r: Result<T, E>) -> Result<T, BslError<E>> {
    r.map_err(BslError::Transport)
}

/// Assemble and transmit an outbound frame.
///
/// `cmd` is the command byte, `address` is 0, 3 or 4 address bytes (a0, a1,
/// a2[, a3]) and `payload` is the command's data, if any.
pub fn emit<T: ByteTransport>(
    transport: &mut T,
    cmd: u8,
    address: &[u8],
    payload: &[u8],
) -> Result<(), BslError<T::Error>> {
    let len = 1 + address.len() + payload.len();
    if len > MAX_CORE_PACKET_LEN {
        return Err(BslError::PacketTooLarge { len });
    }

    log::trace!(
        "emit cmd {:#04X}, address = {:?}, payload len = {}",
        cmd,
        address,
        payload.len()
    );

    map_err(transport.send_byte(HEADER))?;
    map_err(transport.send_byte((len & 0xFF) as u8))?;
    map_err(transport.send_byte(((len >> 8) & 0xFF) as u8))?;

    let mut crc = Crc::new();

    map_err(transport.send_byte(cmd))?;
    crc.update(cmd);

    for &byte in address {
        map_err(transport.send_byte(byte))?;
        crc.update(byte);
    }

    for &byte in payload {
        map_err(transport.send_byte(byte))?;
        crc.update(byte);
    }

    let result = crc.finish();
    map_err(transport.send_byte((result & 0xFF) as u8))?;
    map_err(transport.send_byte(((result >> 8) & 0xFF) as u8))?;

    Ok(())
}

/// Receive and validate an inbound frame, writing its core packet into
/// `dst` and returning how many bytes were written.
///
/// This never imposes a timeout itself — it assumes the transport blocks
/// until a byte is available. Only the initial ACK byte (see
/// [`crate::session::Bsl::receive_ack`]) is time-bounded.
pub fn receive<T: ByteTransport>(
    transport: &mut T,
    dst: &mut [u8],
) -> Result<usize, BslError<T::Error>> {
    let header = map_err(transport.recv_byte())?;
    if header != HEADER {
        log::trace!("inbound frame header incorrect: {:#04X}", header);
        return Err(BslError::HeaderIncorrect);
    }

    let len_lo = map_err(transport.recv_byte())? as usize;
    let len_hi = map_err(transport.recv_byte())? as usize;
    let len = len_lo | (len_hi << 8);
    log::trace!("inbound frame declares core packet len = {}", len);

    if len > dst.len() {
        return Err(BslError::PacketSizeExceedsBuffer {
            len,
            cap: dst.len(),
        });
    }
    if len == 0 {
        return Err(BslError::EmptyPacket);
    }

    let mut crc = Crc::new();
    for slot in &mut dst[..len] {
        let byte = map_err(transport.recv_byte())?;
        *slot = byte;
        crc.update(byte);
    }

    let crc_lo = map_err(transport.recv_byte())? as u16;
    let crc_hi = map_err(transport.recv_byte())? as u16;
    let received_crc = crc_lo | (crc_hi << 8);

    if received_crc != crc.finish() {
        log::trace!(
            "inbound frame checksum incorrect: received {:#06X}, computed {:#06X}",
            received_crc,
            crc.finish()
        );
        return Err(BslError::ChecksumIncorrect);
    }

    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;

    #[test]
    fn emit_erase_segment_matches_wire_layout() {
        let mut t = MockTransport::new();
        emit(&mut t, 0x12, &[0x00, 0xF0, 0x00], &[]).unwrap();
        assert_eq!(
            t.sent,
            vec![0x80, 0x04, 0x00, 0x12, 0x00, 0xF0, 0x00, 0xCE, 0x61]
        );
    }

    #[test]
    fn emit_change_baud_rate_matches_wire_layout() {
        let mut t = MockTransport::new();
        emit(&mut t, 0x52, &[], &[0x06]).unwrap();
        assert_eq!(t.sent, vec![0x80, 0x02, 0x00, 0x52, 0x06, 0x14, 0x15]);
    }

    #[test]
    fn emit_reboot_reset_matches_wire_layout() {
        let mut t = MockTransport::new();
        emit(&mut t, 0x25, &[], &[]).unwrap();
        assert_eq!(t.sent, vec![0x80, 0x01, 0x00, 0x25, 0x37, 0x95]);
    }

    #[test]
    fn emit_rejects_oversized_packet() {
        let mut t = MockTransport::new();
        let big = [0u8; 300];
        let err = emit(&mut t, 0x10, &[0, 0, 0], &big).unwrap_err();
        assert!(matches!(err, BslError::PacketTooLarge { .. }));
    }

    #[test]
    fn emit_then_receive_round_trips() {
        let mut t = MockTransport::new();
        emit(&mut t, 0x16, &[0x00, 0x80, 0x00], &[0x00, 0x01]).unwrap();

        // Feed the bytes we just "sent" back in as if they were a response.
        let sent = t.sent.clone();
        let mut rx = MockTransport::new();
        rx.queue(&sent);

        let mut buf = [0u8; 16];
        let len = receive(&mut rx, &mut buf).unwrap();
        assert_eq!(&buf[..len], &[0x16, 0x00, 0x80, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn receive_rejects_bad_header() {
        let mut t = MockTransport::new();
        t.queue(&[0x00, 0x01, 0x00, 0xAA, 0x00, 0x00]);
        let mut buf = [0u8; 8];
        assert!(matches!(
            receive(&mut t, &mut buf),
            Err(BslError::HeaderIncorrect)
        ));
    }

    #[test]
    fn receive_rejects_checksum_mismatch() {
        let mut t = MockTransport::new();
        emit(&mut t, 0x25, &[], &[]).unwrap();
        let mut sent = t.sent.clone();
        // Flip a bit in the core packet without updating the CRC.
        let cmd_index = 3;
        sent[cmd_index] ^= 0x01;

        let mut rx = MockTransport::new();
        rx.queue(&sent);
        let mut buf = [0u8; 8];
        assert!(matches!(
            receive(&mut rx, &mut buf),
            Err(BslError::ChecksumIncorrect)
        ));
    }

    #[test]
    fn receive_rejects_zero_length_packet() {
        let mut t = MockTransport::new();
        t.queue(&[0x80, 0x00, 0x00]);
        let mut buf = [0u8; 8];
        assert!(matches!(receive(&mut t, &mut buf), Err(BslError::EmptyPacket)));
    }

    #[test]
    fn receive_rejects_packet_larger_than_buffer() {
        let mut t = MockTransport::new();
        t.queue(&[0x80, 0x10, 0x00]); // claims 16 bytes
        let mut buf = [0u8; 4];
        assert!(matches!(
            receive(&mut t, &mut buf),
            Err(BslError::PacketSizeExceedsBuffer { len: 16, cap: 4 })
        ));
    }
}
