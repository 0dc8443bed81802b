//! Firmware update through the sensor's bootloader.
//!
//! The update is a synchronous handshake: the bootloader is told the image
//! length, then receives the image one 64 byte page at a time and
//! acknowledges each page before the next one is sent. A missing
//! acknowledgment aborts the transfer; it has to be restarted from the
//! beginning.

use core::ops::{Deref, DerefMut};

use embedded_io_async::Write;
use log::debug;

use crate::codec::{decode_u16, encode_u32};
use crate::constants::{BOOTLOADER_ACK, BOOTLOADER_ADDRESS, DFU_BLOCK_SIZE, DFU_HALF_BLOCK};
use crate::error::Error;
use crate::packet::{Command, ResponseTag};
use crate::transport::{AckTimeout, Transport};
use crate::{Ads, Sample};

impl<T, F> Ads<T, F>
where
    T: Transport,
    F: FnMut(Sample),
{
    /// Checks whether the configured firmware image is newer than the
    /// firmware on the sensor.
    ///
    /// A reply that is not a firmware version, or having no image
    /// configured, means no update is needed.
    pub async fn dfu_check(&mut self) -> Result<bool, Error> {
        debug!("Checking sensor firmware version");
        let buffer = self.query(Command::GetFwVersion).await?;
        if buffer[0] != ResponseTag::FwVersion as u8 {
            log::warn!("dfu_check: Unexpected reply: {:02X?}", buffer);
            return Ok(false);
        }
        let device_version = decode_u16(&[buffer[1], buffer[2]]);

        let Some(image) = self.config.firmware.image() else {
            log::warn!("No firmware image configured, skipping update check");
            return Ok(false);
        };
        let outdated = image.is_newer_than(device_version);
        debug!(
            "Sensor firmware {}, image {}, update needed: {}",
            device_version, image.version, outdated
        );
        Ok(outdated)
    }

    /// Reboots the sensor into its bootloader.
    pub async fn dfu_reset(&mut self) -> Result<(), Error> {
        debug!("Resetting sensor into bootloader");
        self.write(&Command::EnterDfu.packet()).await
    }

    /// Writes the configured firmware image to the bootloader.
    ///
    /// The sensor must have been rebooted into its bootloader with
    /// [`dfu_reset`](Ads::dfu_reset) first. The transport is pointed at the
    /// bootloader address for the duration of the transfer and restored on
    /// every exit path.
    ///
    /// # Returns
    ///
    /// * `Err(Error::DeviceIdMismatch)` if no firmware image is configured.
    ///   The bus is not touched in that case.
    /// * `Err(Error::Timeout)` if the bootloader stops acknowledging.
    /// * `Err(Error::Io)` if a write fails.
    pub async fn dfu_update(&mut self) -> Result<(), Error> {
        let Some(image) = self.config.firmware.image().copied() else {
            log::error!("No firmware image configured for update");
            return Err(Error::DeviceIdMismatch);
        };
        let ack_timeout = self.config.ack_timeout;

        debug!(
            "Updating sensor to firmware {} ({} bytes)",
            image.version,
            image.len()
        );
        let mut bootloader = BootloaderSession::open(&mut self.transport, BOOTLOADER_ADDRESS);
        let result = transfer(&mut *bootloader, image.data, ack_timeout).await;
        drop(bootloader);

        result.map_err(|e| {
            log::error!("Firmware transfer aborted: {:?}", e);
            e
        })
    }
}

// Points the transport at the bootloader for as long as it lives, and back
// at the saved address when dropped.
struct BootloaderSession<'a, T: Transport> {
    transport: &'a mut T,
    saved: u8,
}

impl<'a, T: Transport> BootloaderSession<'a, T> {
    fn open(transport: &'a mut T, bootloader: u8) -> Self {
        let saved = transport.current_address();
        transport.set_address(bootloader);
        debug!(
            "Switched from {:#04x} to bootloader at {:#04x}",
            saved, bootloader
        );
        Self { transport, saved }
    }
}

impl<T: Transport> Deref for BootloaderSession<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.transport
    }
}

impl<T: Transport> DerefMut for BootloaderSession<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.transport
    }
}

impl<T: Transport> Drop for BootloaderSession<'_, T> {
    fn drop(&mut self) {
        self.transport.set_address(self.saved);
        debug!("Restored address {:#04x}", self.saved);
    }
}

async fn transfer<T: Transport>(
    transport: &mut T,
    image: &[u8],
    ack_timeout: AckTimeout,
) -> Result<(), Error> {
    let len = u32::try_from(image.len()).map_err(|_| Error::BadParameter)?;
    send(transport, &encode_u32(len)).await?;
    transport.wait_for_ack(BOOTLOADER_ACK, ack_timeout).await?;

    let mut blocks = image.chunks_exact(DFU_BLOCK_SIZE);
    for (index, block) in (&mut blocks).enumerate() {
        let (first, second) = block.split_at(DFU_HALF_BLOCK);
        send(transport, first).await?;
        send(transport, second).await?;
        transport
            .wait_for_ack(BOOTLOADER_ACK, ack_timeout)
            .await
            .map_err(|e| {
                log::error!("Block {} not acknowledged", index);
                e
            })?;
    }

    let remainder = blocks.remainder();
    if remainder.len() > DFU_HALF_BLOCK {
        let (first, second) = remainder.split_at(DFU_HALF_BLOCK);
        send(transport, first).await?;
        send(transport, second).await?;
    } else if !remainder.is_empty() {
        send(transport, remainder).await?;
    }
    transport.wait_for_ack(BOOTLOADER_ACK, ack_timeout).await?;

    debug!("Firmware transfer complete");
    Ok(())
}

async fn send<T: Transport>(transport: &mut T, bytes: &[u8]) -> Result<(), Error> {
    transport.write_all(bytes).await.map_err(|_| Error::Io)?;
    transport.flush().await.map_err(|_| Error::Io)
}
