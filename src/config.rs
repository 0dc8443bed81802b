use crate::firmware::FirmwareSource;
use crate::transport::AckTimeout;

/// Sample rate of the sensor in free run mode.
///
/// The discriminant is the value programmed into the sensor.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[repr(u16)]
pub enum SampleRate {
    Hz1 = 16384,
    Hz10 = 1638,
    Hz20 = 819,
    Hz50 = 327,
    Hz100 = 163,
    Hz200 = 81,
    Hz333 = 49,
    Hz500 = 32,
}

/// Calibration steps, performed in order.
///
/// - `First`: both axes at 0 degrees.
/// - `Flat`: flat axis (sample[0]) bent between 45 and 255 degrees, 90
///   recommended, perpendicular axis at 0.
/// - `Perp`: perpendicular axis (sample[1]) bent between 45 and 255 degrees,
///   flat axis at 0.
/// - `Clear`: drops the stored calibration.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[repr(u8)]
pub enum CalibrationStep {
    First = 0,
    Flat = 1,
    Perp = 2,
    Clear = 3,
}

/// Configuration settings for the sensor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Config {
    /// Sample rate programmed at the end of init.
    pub sample_rate: SampleRate,
    /// Whether init compares the sensor's firmware against `firmware` and
    /// updates it when it is older.
    pub check_firmware: bool,
    /// The image pushed by the firmware update.
    pub firmware: FirmwareSource,
    /// Bound on each bootloader acknowledgment wait.
    pub ack_timeout: AckTimeout,
}

impl Config {
    /// Creates a new `Config` with the given sample rate and all other
    /// settings at their defaults.
    pub fn new(sample_rate: SampleRate) -> Config {
        Config {
            sample_rate,
            ..Config::default()
        }
    }
    /// Sets the sample rate programmed at init.
    pub fn sample_rate(mut self, sample_rate: SampleRate) -> Self {
        self.sample_rate = sample_rate;
        self
    }
    /// Enables or disables the firmware check at init.
    pub fn check_firmware(mut self, check_firmware: bool) -> Self {
        self.check_firmware = check_firmware;
        self
    }
    /// Sets the firmware image used for updates.
    pub fn firmware(mut self, firmware: FirmwareSource) -> Self {
        self.firmware = firmware;
        self
    }
    pub fn ack_timeout(mut self, ack_timeout: AckTimeout) -> Self {
        self.ack_timeout = ack_timeout;
        self
    }
}

/// Provides default configuration values.
impl Default for Config {
    /// The default configuration samples at 100 Hz and skips the firmware check.
    fn default() -> Config {
        Config {
            sample_rate: SampleRate::Hz100,
            check_firmware: false,
            firmware: FirmwareSource::None,
            ack_timeout: AckTimeout::default(),
        }
    }
}
