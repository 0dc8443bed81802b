use embedded_io_async::{Read, Write};
use log::debug;

use crate::address::AddressTable;
use crate::constants::ACK_ATTEMPTS;
use crate::error::Error;

/// Bound on how long the firmware update waits for a bootloader
/// acknowledgment.
///
/// The wait gives up with `Error::Timeout` after `attempts` one-byte reads.
/// `poll_interval_ms` is slept between attempts; zero busy-polls the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AckTimeout {
    pub attempts: u16,
    pub poll_interval_ms: u32,
}

impl Default for AckTimeout {
    fn default() -> Self {
        Self {
            attempts: ACK_ATTEMPTS,
            poll_interval_ms: 0,
        }
    }
}

/// The bus the sensor sits on.
///
/// The byte channel is `embedded_io_async::Read + Write`: one `write_all` or
/// `read_exact` call must map to one bus transaction against the currently
/// selected address. Everything else the driver needs from the hardware,
/// the reset line, the data-ready line, and delays, comes through the
/// methods below.
#[allow(async_fn_in_trait)]
pub trait Transport: Read + Write {
    /// Enables or disables delivery of data-ready notifications. While
    /// disabled, [`Ads::read_sample`](crate::Ads::read_sample) does not read.
    fn set_signal_enabled(&mut self, enabled: bool);

    /// Whether data-ready notifications are currently delivered.
    fn signal_enabled(&self) -> bool;

    /// Pulses the sensor's reset line.
    async fn reset(&mut self) -> Result<(), Error>;

    /// Blocks for `ms` milliseconds.
    async fn delay_ms(&mut self, ms: u32);

    /// Resolves once a packet is waiting to be read, including one that
    /// became pending before the call.
    async fn wait_for_data_ready(&mut self) -> Result<(), Error>;

    fn addresses(&self) -> &AddressTable;

    fn addresses_mut(&mut self) -> &mut AddressTable;

    /// Selects the device subsequent transactions target.
    fn select(&mut self, device: u8) -> Result<(), Error> {
        self.addresses_mut().select(device)
    }

    /// Records a new bus address for `device` and selects it.
    fn update_address(&mut self, device: u8, address: u8) -> Result<(), Error> {
        self.addresses_mut().update(device, address)
    }

    fn current_address(&self) -> u8 {
        self.addresses().current()
    }

    fn set_address(&mut self, address: u8) {
        self.addresses_mut().set_current(address)
    }

    /// Waits for the bootloader to answer with `expected`.
    ///
    /// The default polls one byte at a time. Transports with an interrupt
    /// driven or otherwise smarter wait can override this, as long as the
    /// wait stays bounded by `timeout` and ends in `Error::Timeout`.
    async fn wait_for_ack(&mut self, expected: u8, timeout: AckTimeout) -> Result<(), Error> {
        let mut ack = [0u8; 1];
        for attempt in 0..timeout.attempts {
            ack[0] = 0;
            if self.read_exact(&mut ack).await.is_ok() && ack[0] == expected {
                debug!("Acknowledgment received after {} attempts", attempt + 1);
                return Ok(());
            }
            if timeout.poll_interval_ms > 0 {
                self.delay_ms(timeout.poll_interval_ms).await;
            }
        }
        Err(Error::Timeout)
    }
}
