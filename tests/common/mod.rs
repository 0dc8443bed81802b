//! Common test utilities and shared imports

// Shared across test files; not every item is used in every file.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use ads_two_axis_nostd_rs::{AddressTable, Error, Sample, Transport};
use embedded_io_async::{ErrorKind, ErrorType, Read, Write};

/// Something the driver did to the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write { address: u8, bytes: Vec<u8> },
    Read { address: u8, len: usize },
    Signal(bool),
    Delay(u32),
    Reset,
    DataReady,
}

/// A transport that records every operation and answers reads from a
/// queue of canned replies. A read with nothing queued fails.
pub struct MockTransport {
    pub addresses: AddressTable,
    pub signal: bool,
    pub events: Vec<Event>,
    pub replies: VecDeque<Vec<u8>>,
    pub fail_writes: bool,
    /// Writes fail once this many have gone through.
    pub fail_writes_after: Option<usize>,
    pub fail_reset: bool,
    /// Reads record themselves and then never complete.
    pub stall_reads: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            addresses: AddressTable::new(),
            signal: false,
            events: Vec::new(),
            replies: VecDeque::new(),
            fail_writes: false,
            fail_writes_after: None,
            fail_reset: false,
            stall_reads: false,
        }
    }

    /// Starts with data-ready delivery enabled, as it is after `init`.
    pub fn with_signal(mut self) -> Self {
        self.signal = true;
        self
    }

    /// Queues the bytes returned by the next read.
    pub fn reply(mut self, bytes: &[u8]) -> Self {
        self.replies.push_back(bytes.to_vec());
        self
    }

    /// Queues `count` bootloader acknowledgments.
    pub fn acks(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.replies.push_back(vec![b's']);
        }
        self
    }

    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Write { address, bytes } => Some((*address, bytes.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn write_lengths(&self) -> Vec<usize> {
        self.writes().iter().map(|(_, bytes)| bytes.len()).collect()
    }

    pub fn signals(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Signal(enabled) => Some(*enabled),
                _ => None,
            })
            .collect()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Delay(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }

    pub fn reads(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::Read { .. }))
            .count()
    }
}

impl ErrorType for MockTransport {
    type Error = ErrorKind;
}

impl Read for MockTransport {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.events.push(Event::Read {
            address: self.addresses.current(),
            len: buf.len(),
        });
        if self.stall_reads {
            std::future::pending::<()>().await;
        }
        let reply = self.replies.pop_front().ok_or(ErrorKind::TimedOut)?;
        let n = reply.len().min(buf.len());
        if n == 0 {
            return Err(ErrorKind::Other);
        }
        buf[..n].copy_from_slice(&reply[..n]);
        Ok(n)
    }
}

impl Write for MockTransport {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let budget_spent = self
            .fail_writes_after
            .is_some_and(|limit| self.writes().len() >= limit);
        if self.fail_writes || budget_spent {
            return Err(ErrorKind::Other);
        }
        self.events.push(Event::Write {
            address: self.addresses.current(),
            bytes: buf.to_vec(),
        });
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Transport for MockTransport {
    fn set_signal_enabled(&mut self, enabled: bool) {
        self.signal = enabled;
        self.events.push(Event::Signal(enabled));
    }

    fn signal_enabled(&self) -> bool {
        self.signal
    }

    async fn reset(&mut self) -> Result<(), Error> {
        if self.fail_reset {
            return Err(Error::Io);
        }
        self.events.push(Event::Reset);
        Ok(())
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.events.push(Event::Delay(ms));
    }

    async fn wait_for_data_ready(&mut self) -> Result<(), Error> {
        self.events.push(Event::DataReady);
        Ok(())
    }

    fn addresses(&self) -> &AddressTable {
        &self.addresses
    }

    fn addresses_mut(&mut self) -> &mut AddressTable {
        &mut self.addresses
    }
}

/// A sample callback that keeps everything it is called with.
pub fn collector() -> (Rc<RefCell<Vec<Sample>>>, impl FnMut(Sample)) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, move |sample| sink.borrow_mut().push(sample))
}

/// A callback for tests that never expect a sample.
pub fn ignore(_: Sample) {}
