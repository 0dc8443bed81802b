use crate::codec::{decode_i16, decode_u16};
use crate::constants::{PACKET_SIZE, SAMPLE_SCALE};
use crate::Sample;

/// A command or response frame on the command/response channel.
pub type Packet = [u8; PACKET_SIZE];

/// Commands understood by the sensor. Sent as byte 0 of a command packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    Run = 0,
    SetSampleRate = 1,
    Reset = 2,
    EnterDfu = 3,
    SetAddress = 4,
    EnableInterrupt = 5,
    GetFwVersion = 6,
    Calibrate = 7,
    SetAxesEnabled = 8,
    Shutdown = 9,
    GetDeviceId = 10,
}

impl Command {
    /// Returns a zeroed packet carrying this command.
    pub fn packet(self) -> Packet {
        let mut packet = [0u8; PACKET_SIZE];
        packet[0] = self as u8;
        packet
    }
}

/// Identifies how the payload of a packet read from the sensor is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResponseTag {
    Sample = 0,
    FwVersion = 1,
    DeviceId = 2,
}

impl TryFrom<u8> for ResponseTag {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ResponseTag::Sample),
            1 => Ok(ResponseTag::FwVersion),
            2 => Ok(ResponseTag::DeviceId),
            other => Err(other),
        }
    }
}

/// A decoded packet read from the sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response {
    /// Angles in degrees for both axes.
    Sample(Sample),
    /// Version of the firmware running on the sensor.
    FwVersion(u16),
    /// Device type code.
    DeviceId(u8),
}

impl Response {
    /// Decodes a packet, returning `None` if the tag is not a known response.
    pub fn parse(packet: &Packet) -> Option<Response> {
        match ResponseTag::try_from(packet[0]).ok()? {
            ResponseTag::Sample => {
                let flat = decode_i16(&[packet[1], packet[2]]) as f32 / SAMPLE_SCALE;
                let perp = decode_i16(&[packet[3], packet[4]]) as f32 / SAMPLE_SCALE;
                Some(Response::Sample(Sample { flat, perp }))
            }
            ResponseTag::FwVersion => {
                Some(Response::FwVersion(decode_u16(&[packet[1], packet[2]])))
            }
            ResponseTag::DeviceId => Some(Response::DeviceId(packet[1])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_packets_carry_opcode_in_first_byte() {
        assert_eq!(Command::Run.packet(), [0, 0, 0, 0, 0]);
        assert_eq!(Command::EnterDfu.packet(), [3, 0, 0, 0, 0]);
        assert_eq!(Command::GetDeviceId.packet(), [10, 0, 0, 0, 0]);
    }

    #[test]
    fn parses_sample() {
        let response = Response::parse(&[0x00, 0x40, 0x00, 0x80, 0x00]);
        assert_eq!(
            response,
            Some(Response::Sample(Sample {
                flat: 2.0,
                perp: 4.0
            }))
        );
    }

    #[test]
    fn parses_negative_sample() {
        let response = Response::parse(&[0x00, 0xE0, 0xFF, 0xF0, 0xFF]);
        assert_eq!(
            response,
            Some(Response::Sample(Sample {
                flat: -1.0,
                perp: -0.5
            }))
        );
    }

    #[test]
    fn parses_firmware_version_and_device_id() {
        assert_eq!(
            Response::parse(&[0x01, 0x05, 0x00, 0xAA, 0xBB]),
            Some(Response::FwVersion(5))
        );
        assert_eq!(
            Response::parse(&[0x02, 0x02, 0x00, 0x00, 0x00]),
            Some(Response::DeviceId(2))
        );
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(Response::parse(&[0x07, 0, 0, 0, 0]), None);
        assert_eq!(ResponseTag::try_from(0xFF), Err(0xFF));
    }
}
