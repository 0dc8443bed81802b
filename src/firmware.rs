/// A firmware image linked into the application, together with its version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareImage {
    pub version: u16,
    pub data: &'static [u8],
}

impl FirmwareImage {
    pub const fn new(version: u16, data: &'static [u8]) -> Self {
        Self { version, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether a sensor running `device_version` should be updated to this image.
    pub fn is_newer_than(&self, device_version: u16) -> bool {
        device_version < self.version
    }
}

/// Which firmware image, if any, the firmware update pushes to the sensor.
///
/// Selected at runtime so one build can carry the images of several
/// hardware generations and pick the one matching the attached part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirmwareSource {
    #[default]
    None,
    Image(FirmwareImage),
}

impl FirmwareSource {
    pub fn image(&self) -> Option<&FirmwareImage> {
        match self {
            FirmwareSource::None => None,
            FirmwareSource::Image(image) => Some(image),
        }
    }
}
