// PACKET_SIZE is the fixed length of every command written to, and every
// status or sample packet read from, the sensor.
pub const PACKET_SIZE: usize = 5;

// MAX_DEVICES is the number of sensors that can share one bus.
pub const MAX_DEVICES: usize = 10;

// DEFAULT_ADDRESS is the bus address a sensor answers on out of the factory.
pub const DEFAULT_ADDRESS: u8 = 0x13;

// BOOTLOADER_ADDRESS is the bus address the sensor listens on after it has
// rebooted into its bootloader.
pub const BOOTLOADER_ADDRESS: u8 = 0x12;

// AXIS_0 enables the flat axis (sample[0]).
pub const AXIS_0: u8 = 0x01;

// AXIS_1 enables the perpendicular axis (sample[1]).
pub const AXIS_1: u8 = 0x02;

// DEVICE_TYPE_ONE_AXIS is the device type reported by the single axis part.
pub const DEVICE_TYPE_ONE_AXIS: u8 = 1;

// DEVICE_TYPE_TWO_AXIS is the device type this driver expects.
pub const DEVICE_TYPE_TWO_AXIS: u8 = 2;

// SAMPLE_SCALE converts the raw fixed-point readings to degrees.
pub const SAMPLE_SCALE: f32 = 32.0;

// BOOTLOADER_ACK is the byte the bootloader answers with once it has accepted
// the firmware length or a block.
pub const BOOTLOADER_ACK: u8 = b's';

// DFU_BLOCK_SIZE is the bootloader page size. Each page goes out as two
// half-page bus writes.
pub const DFU_BLOCK_SIZE: usize = 64;

// DFU_HALF_BLOCK is the largest single write the bootloader accepts.
pub const DFU_HALF_BLOCK: usize = DFU_BLOCK_SIZE / 2;

// ACK_ATTEMPTS is the default number of one-byte reads spent waiting for a
// bootloader acknowledgment.
pub const ACK_ATTEMPTS: u16 = 250;

// RESPONSE_DELAY_MS is how long the sensor needs to prepare a reply after a
// query command.
pub const RESPONSE_DELAY_MS: u32 = 2;

// POWER_ON_DELAY_MS is the time the sensor needs after a hardware reset
// before it answers on the bus.
pub const POWER_ON_DELAY_MS: u32 = 2000;

// INIT_SETTLE_MS is the pause between the identity check and the rest of init.
pub const INIT_SETTLE_MS: u32 = 2;

// WAKE_DELAY_MS is the time the sensor needs to reinitialize after a wake reset.
pub const WAKE_DELAY_MS: u32 = 100;

// DFU_RESET_DELAY_MS is the time the sensor needs to reboot into its bootloader.
pub const DFU_RESET_DELAY_MS: u32 = 100;

// DFU_REINIT_DELAY_MS is the time the sensor needs to start the new firmware.
pub const DFU_REINIT_DELAY_MS: u32 = 200;

// RESET_PULSE_MS is how long the reset line is held low.
pub const RESET_PULSE_MS: u32 = 10;
