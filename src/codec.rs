//! Little-endian helpers for the sensor wire format.

/// Decodes a little-endian two's-complement 16-bit value.
pub fn decode_i16(bytes: &[u8; 2]) -> i16 {
    i16::from_le_bytes(*bytes)
}

/// Decodes a little-endian unsigned 16-bit value.
pub fn decode_u16(bytes: &[u8; 2]) -> u16 {
    u16::from_le_bytes(*bytes)
}

/// Encodes an unsigned 16-bit value as the 2 bytes written on the wire.
pub fn encode_u16(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

/// Encodes an unsigned 32-bit value; used for the firmware length sent to the bootloader.
pub fn encode_u32(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian() {
        assert_eq!(decode_u16(&[0x40, 0x00]), 64);
        assert_eq!(decode_u16(&[0x00, 0x80]), 0x8000);
        assert_eq!(decode_i16(&[0x80, 0x00]), 128);
        assert_eq!(decode_i16(&[0xE0, 0xFF]), -32);
        assert_eq!(decode_i16(&[0x00, 0x80]), i16::MIN);
        assert_eq!(decode_i16(&[0xFF, 0x7F]), i16::MAX);
    }

    #[test]
    fn u16_round_trips_every_value() {
        for value in 0..=u16::MAX {
            let bytes = encode_u16(value);
            assert_eq!(decode_u16(&bytes), value);
            assert_eq!(encode_u16(decode_u16(&bytes)), bytes);
        }
    }

    #[test]
    fn i16_scaling_recovers_raw_value() {
        for raw in [i16::MIN, -1024, -1, 0, 1, 64, 128, i16::MAX] {
            let decoded = decode_i16(&raw.to_le_bytes());
            assert_eq!(decoded, raw);
            let degrees = decoded as f32 / 32.0;
            assert!((degrees * 32.0 - raw as f32).abs() < 1.0 / 32.0);
        }
    }

    #[test]
    fn encodes_firmware_length() {
        assert_eq!(encode_u32(0x0001_2345), [0x45, 0x23, 0x01, 0x00]);
    }
}
