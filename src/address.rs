use crate::constants::{DEFAULT_ADDRESS, MAX_DEVICES};
use crate::error::Error;

/// Bus addresses of the sensors sharing one bus, indexed by device number.
///
/// Slot 0 starts out at the factory default address; the other slots are
/// filled in as devices get re-addressed. The current address is the one
/// every bus transaction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressTable {
    slots: [Option<u8>; MAX_DEVICES],
    current: u8,
}

impl AddressTable {
    /// Creates a table holding only the default device.
    pub fn new() -> Self {
        let mut slots = [None; MAX_DEVICES];
        slots[0] = Some(DEFAULT_ADDRESS);
        Self {
            slots,
            current: DEFAULT_ADDRESS,
        }
    }

    /// Makes `device` the target of subsequent transactions.
    ///
    /// Fails with `Error::BadParameter`, leaving the current address alone,
    /// if the index is out of range or the slot was never configured.
    pub fn select(&mut self, device: u8) -> Result<(), Error> {
        let address = self
            .slots
            .get(usize::from(device))
            .copied()
            .flatten()
            .ok_or(Error::BadParameter)?;
        self.current = address;
        Ok(())
    }

    /// Stores a new address for `device` and makes it current.
    pub fn update(&mut self, device: u8, address: u8) -> Result<(), Error> {
        let slot = self
            .slots
            .get_mut(usize::from(device))
            .ok_or(Error::BadParameter)?;
        *slot = Some(address);
        self.current = address;
        Ok(())
    }

    /// Address of a configured device, if any.
    pub fn get(&self, device: u8) -> Option<u8> {
        self.slots.get(usize::from(device)).copied().flatten()
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    // Overrides the current address without touching the slots. Only the
    // firmware update uses this, to talk to the bootloader.
    pub fn set_current(&mut self, address: u8) {
        self.current = address;
    }
}

impl Default for AddressTable {
    fn default() -> Self {
        Self::new()
    }
}
