use core::fmt;

/// Errors returned by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// General failure of the init sequence, e.g. a firmware update that did
    /// not complete.
    General,
    /// A caller supplied value is outside its valid domain.
    BadParameter,
    /// A bus write or read did not transfer the expected number of bytes.
    Io,
    /// The attached part is not a two axis sensor, or no firmware image is
    /// configured for an update.
    DeviceIdMismatch,
    /// The bootloader did not acknowledge within the attempt budget.
    Timeout,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::General => f.write_str("general error"),
            Error::BadParameter => f.write_str("bad parameter"),
            Error::Io => f.write_str("bus transfer failed"),
            Error::DeviceIdMismatch => f.write_str("device id mismatch"),
            Error::Timeout => f.write_str("timed out waiting for acknowledgment"),
        }
    }
}
