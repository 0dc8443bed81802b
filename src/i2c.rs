//! [`Transport`] over an `embedded-hal-async` I2C bus.
//!
//! Reads and writes address the currently selected device. The reset line
//! is active low and the sensor holds the data-ready line low while a packet
//! is waiting, so a packet that became pending while the host was busy is
//! still picked up.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::{self, I2c};
use embedded_io_async::{ErrorKind, ErrorType, Read, Write};

use crate::address::AddressTable;
use crate::constants::RESET_PULSE_MS;
use crate::error::Error;
use crate::transport::Transport;

/// An I2C bus error surfaced through the byte channel.
#[derive(Debug)]
pub struct BusError<E>(pub E);

impl<E: core::fmt::Debug> embedded_io_async::Error for BusError<E> {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// The lines the sensor is wired to.
///
/// * `I2C`: The bus, shared with any other sensors.
/// * `RST`: The reset line.
/// * `DRDY`: The data-ready line.
/// * `D`: The delay source.
pub struct I2cTransport<I2C, RST, DRDY, D> {
    i2c: I2C,
    reset: RST,
    data_ready: DRDY,
    delay: D,
    addresses: AddressTable,
    signal_enabled: bool,
}

impl<I2C, RST, DRDY, D> I2cTransport<I2C, RST, DRDY, D> {
    pub fn new(i2c: I2C, reset: RST, data_ready: DRDY, delay: D) -> Self {
        Self {
            i2c,
            reset,
            data_ready,
            delay,
            addresses: AddressTable::new(),
            signal_enabled: false,
        }
    }

    /// Gives back the bus and the lines.
    pub fn release(self) -> (I2C, RST, DRDY, D) {
        (self.i2c, self.reset, self.data_ready, self.delay)
    }
}

impl<I2C: i2c::ErrorType, RST, DRDY, D> ErrorType for I2cTransport<I2C, RST, DRDY, D> {
    type Error = BusError<I2C::Error>;
}

impl<I2C: I2c, RST, DRDY, D> Read for I2cTransport<I2C, RST, DRDY, D> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.i2c
            .read(self.addresses.current(), buf)
            .await
            .map_err(BusError)?;
        Ok(buf.len())
    }
}

impl<I2C: I2c, RST, DRDY, D> Write for I2cTransport<I2C, RST, DRDY, D> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.i2c
            .write(self.addresses.current(), buf)
            .await
            .map_err(BusError)?;
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<I2C, RST, DRDY, D> Transport for I2cTransport<I2C, RST, DRDY, D>
where
    I2C: I2c,
    RST: OutputPin,
    DRDY: Wait,
    D: DelayNs,
{
    fn set_signal_enabled(&mut self, enabled: bool) {
        self.signal_enabled = enabled;
    }

    fn signal_enabled(&self) -> bool {
        self.signal_enabled
    }

    async fn reset(&mut self) -> Result<(), Error> {
        self.reset.set_low().map_err(|_| Error::Io)?;
        self.delay.delay_ms(RESET_PULSE_MS).await;
        self.reset.set_high().map_err(|_| Error::Io)
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms).await;
    }

    async fn wait_for_data_ready(&mut self) -> Result<(), Error> {
        self.data_ready
            .wait_for_low()
            .await
            .map_err(|_| Error::Io)
    }

    fn addresses(&self) -> &AddressTable {
        &self.addresses
    }

    fn addresses_mut(&mut self) -> &mut AddressTable {
        &mut self.addresses
    }
}
