#![cfg_attr(not(test), no_std)]

use embedded_io_async::{Read, Write};
use log::debug;

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

pub mod codec;

mod packet;
pub use packet::*;

mod address;
pub use address::*;

mod transport;
pub use transport::*;

mod firmware;
pub use firmware::*;

mod dfu;

pub mod i2c;

/// One reading of both axes, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Axis 0, the flat axis.
    pub flat: f32,
    /// Axis 1, the perpendicular axis.
    pub perp: f32,
}

impl From<Sample> for [f32; 2] {
    fn from(sample: Sample) -> Self {
        [sample.flat, sample.perp]
    }
}

/// A two axis angular displacement sensor.
///
/// The driver owns its transport and the single callback samples are
/// delivered to. Samples arrive asynchronously: whenever the data-ready line
/// fires, the packet read from the sensor is handed to
/// [`handle_data_ready`](Ads::handle_data_ready), or [`read_sample`](Ads::read_sample)
/// can be awaited to wait for the line and read the packet in one go.
///
/// # Type Parameters
///
/// * `T`: The bus the sensor sits on, see [`Transport`].
/// * `F`: The sample callback.
pub struct Ads<T, F> {
    transport: T,
    config: Config,
    on_sample: F,
}

impl<T, F> Ads<T, F>
where
    T: Transport,
    F: FnMut(Sample),
{
    /// Creates a new `Ads` sensor instance.
    ///
    /// Nothing is sent to the sensor until [`init`](Ads::init) is called.
    ///
    /// # Arguments
    ///
    /// * `transport`: The bus the sensor sits on.
    /// * `config`: The configuration applied by `init`.
    /// * `on_sample`: Called with every sample the sensor reports.
    pub fn new(transport: T, config: Config, on_sample: F) -> Self {
        Self {
            transport,
            config,
            on_sample,
        }
    }

    /// Initializes the sensor according to the provided configuration.
    ///
    /// This involves:
    /// - Resetting the sensor and enabling the data-ready signal.
    /// - Checking that the attached part is a two axis sensor.
    /// - If `check_firmware` is set and the sensor runs older firmware than
    ///   the configured image, updating it.
    /// - Programming the sample rate.
    ///
    /// The first failing step aborts the sequence. A failed firmware update
    /// is reported as `Error::General`.
    pub async fn init(&mut self) -> Result<(), Error> {
        self.transport.reset().await.map_err(|e| {
            log::error!("Failed to reset sensor during init: {:?}", e);
            e
        })?;
        self.transport.delay_ms(POWER_ON_DELAY_MS).await;
        self.transport.set_signal_enabled(true);

        self.get_device_id().await.map_err(|e| {
            log::error!("Device identification failed during init: {:?}", e);
            e
        })?;

        self.transport.delay_ms(INIT_SETTLE_MS).await;

        if self.config.check_firmware && self.dfu_check().await? {
            self.dfu_reset().await?;
            self.transport.delay_ms(DFU_RESET_DELAY_MS).await;
            self.dfu_update().await.map_err(|e| {
                log::error!("Firmware update failed during init: {:?}", e);
                Error::General
            })?;
            self.transport.delay_ms(DFU_REINIT_DELAY_MS).await;
        }

        self.set_sample_rate(self.config.sample_rate)
            .await
            .map_err(|e| {
                log::error!(
                    "Failed to set sample rate to {:?} during init: {:?}",
                    self.config.sample_rate,
                    e
                );
                e
            })?;

        debug!("ADS init sequence complete.");
        Ok(())
    }

    /// Places the sensor in free run (`true`) or suspend (`false`) mode.
    pub async fn run(&mut self, active: bool) -> Result<(), Error> {
        debug!("Setting free run to {}", active);
        let mut command = Command::Run.packet();
        command[1] = u8::from(active);
        self.write(&command).await
    }

    /// Sets the sample rate used in free run mode.
    pub async fn set_sample_rate(&mut self, rate: SampleRate) -> Result<(), Error> {
        debug!("Setting sample rate to {:?}", rate);
        let mut command = Command::SetSampleRate.packet();
        command[1..3].copy_from_slice(&codec::encode_u16(rate as u16));
        self.write(&command).await
    }

    /// Enables or disables the sensor's data-ready interrupt line.
    pub async fn enable_interrupt(&mut self, enabled: bool) -> Result<(), Error> {
        debug!("Setting data-ready interrupt to {}", enabled);
        let mut command = Command::EnableInterrupt.packet();
        command[1] = u8::from(enabled);
        self.write(&command).await
    }

    /// Enables individual axes. Both axes are enabled at reset.
    ///
    /// `mask` is a combination of [`AXIS_0`] and [`AXIS_1`]; an axis whose
    /// bit is clear is disabled.
    ///
    /// # Returns
    ///
    /// * `Err(Error::BadParameter)` if `mask` enables neither axis.
    /// * `Err(Error::Io)` if the command could not be written.
    pub async fn set_axes_enabled(&mut self, mask: u8) -> Result<(), Error> {
        if mask & (AXIS_0 | AXIS_1) == 0 {
            log::error!("Axis mask {:#04x} enables no axis", mask);
            return Err(Error::BadParameter);
        }
        debug!("Setting enabled axes to {:#04x}", mask);
        let mut command = Command::SetAxesEnabled.packet();
        command[1] = mask;
        self.write(&command).await
    }

    /// Runs one calibration step. The sensor does the math.
    ///
    /// # Arguments
    ///
    /// * `step`: The [`CalibrationStep`] to perform.
    /// * `degrees`: The angle the sensor is bent at for `Flat` and `Perp`.
    pub async fn calibrate(&mut self, step: CalibrationStep, degrees: u8) -> Result<(), Error> {
        debug!("Calibration step {:?} at {} degrees", step, degrees);
        let mut command = Command::Calibrate.packet();
        command[1] = step as u8;
        command[2] = degrees;
        self.write(&command).await
    }

    /// Shuts the sensor down. It draws about 50 nA afterwards and only
    /// answers again after [`wake`](Ads::wake).
    pub async fn shutdown(&mut self) -> Result<(), Error> {
        debug!("Shutting down sensor");
        self.write(&Command::Shutdown.packet()).await
    }

    /// Wakes the sensor from shutdown by resetting it, then waits for it to
    /// reinitialize.
    pub async fn wake(&mut self) -> Result<(), Error> {
        debug!("Waking sensor");
        self.transport.reset().await?;
        self.transport.delay_ms(WAKE_DELAY_MS).await;
        Ok(())
    }

    /// Programs a new bus address into the selected sensor and records it
    /// for `device`, which becomes the selected device.
    ///
    /// Use this to put several sensors on one bus.
    ///
    /// # Returns
    ///
    /// * `Err(Error::BadParameter)` if `device` is out of range. Nothing is
    ///   sent in that case.
    /// * `Err(Error::Io)` if the command could not be written.
    pub async fn update_device_address(&mut self, device: u8, address: u8) -> Result<(), Error> {
        if usize::from(device) >= MAX_DEVICES {
            log::error!("Device {} out of range (0-{})", device, MAX_DEVICES - 1);
            return Err(Error::BadParameter);
        }
        debug!("Moving device {} to address {:#04x}", device, address);
        let mut command = Command::SetAddress.packet();
        command[1] = address;
        self.write(&command).await?;
        self.transport.update_address(device, address)
    }

    /// Selects which sensor subsequent operations talk to.
    pub fn select_device(&mut self, device: u8) -> Result<(), Error> {
        self.transport.select(device).map_err(|e| {
            log::warn!("Cannot select device {}: {:?}", device, e);
            e
        })
    }

    /// Checks that the attached part is a two axis sensor.
    ///
    /// The sensor should not be in free run when this is called.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the sensor reports the two axis device type.
    /// * `Err(Error::DeviceIdMismatch)` for any other reply.
    /// * `Err(Error::Io)` if the query could not be written or read.
    pub async fn get_device_id(&mut self) -> Result<(), Error> {
        debug!("Querying device id");
        let buffer = self.query(Command::GetDeviceId).await?;
        match Response::parse(&buffer) {
            Some(Response::DeviceId(DEVICE_TYPE_TWO_AXIS)) => {
                debug!("Two axis sensor identified");
                Ok(())
            }
            Some(Response::DeviceId(other)) => {
                log::warn!("Unexpected device type {}", other);
                Err(Error::DeviceIdMismatch)
            }
            _ => {
                log::warn!("get_device_id: Unexpected reply: {:02X?}", buffer);
                Err(Error::DeviceIdMismatch)
            }
        }
    }

    /// Reads the version of the firmware running on the sensor.
    ///
    /// Returns `Ok(None)` if the sensor answers with anything other than a
    /// firmware version packet.
    pub async fn firmware_version(&mut self) -> Result<Option<u16>, Error> {
        debug!("Querying firmware version");
        let buffer = self.query(Command::GetFwVersion).await?;
        match Response::parse(&buffer) {
            Some(Response::FwVersion(version)) => {
                debug!("Firmware version: {}", version);
                Ok(Some(version))
            }
            _ => {
                log::warn!("firmware_version: Unexpected reply: {:02X?}", buffer);
                Ok(None)
            }
        }
    }

    /// Handles one packet read after the data-ready line fired.
    ///
    /// Sample packets are decoded and passed to the callback; any other
    /// packet is not an asynchronous response and is ignored.
    pub fn handle_data_ready(&mut self, packet: &Packet) -> Option<Sample> {
        match Response::parse(packet) {
            Some(Response::Sample(sample)) => {
                (self.on_sample)(sample);
                Some(sample)
            }
            _ => {
                debug!("Ignoring non-sample packet {:02X?}", packet);
                None
            }
        }
    }

    /// Waits for the data-ready line, reads the pending packet and hands it
    /// to [`handle_data_ready`](Ads::handle_data_ready).
    ///
    /// Returns `Ok(None)` without touching the bus while data-ready delivery
    /// is disabled, which it is until [`init`](Ads::init) enables it.
    pub async fn read_sample(&mut self) -> Result<Option<Sample>, Error> {
        if !self.transport.signal_enabled() {
            debug!("Data-ready delivery disabled, not reading a sample");
            return Ok(None);
        }
        self.transport.wait_for_data_ready().await?;
        let buffer = self.read().await?;
        Ok(self.handle_data_ready(&buffer))
    }

    /// Returns the configuration `init` applies.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a reference to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a mutable reference to the underlying transport.
    ///
    /// Selecting another address through it bypasses the driver's checks.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the driver and gives the transport back.
    pub fn release(self) -> T {
        self.transport
    }

    // Sends a query and reads the reply with data-ready delivery disabled,
    // so a sample read cannot consume the reply. Delivery is re-enabled
    // whatever the outcome.
    async fn query(&mut self, command: Command) -> Result<Packet, Error> {
        self.transport.set_signal_enabled(false);
        let result = self.exchange(&command.packet()).await;
        self.transport.set_signal_enabled(true);
        result
    }

    async fn exchange(&mut self, command: &Packet) -> Result<Packet, Error> {
        self.write(command).await?;
        self.transport.delay_ms(RESPONSE_DELAY_MS).await;
        self.read().await
    }

    // Writes one command packet to the selected device.
    async fn write(&mut self, command: &Packet) -> Result<(), Error> {
        debug!("Executing command: {:02X?}", command);
        self.transport
            .write_all(command)
            .await
            .map_err(|_| Error::Io)?;
        self.transport.flush().await.map_err(|_| Error::Io)?;
        Ok(())
    }

    // Reads one packet from the selected device.
    async fn read(&mut self) -> Result<Packet, Error> {
        let mut buffer = [0u8; PACKET_SIZE];
        self.transport
            .read_exact(&mut buffer)
            .await
            .map_err(|_| Error::Io)?;
        debug!("Read packet: {:02X?}", buffer);
        Ok(buffer)
    }
}
