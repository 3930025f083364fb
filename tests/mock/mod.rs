//! Recording SPI bus and select pin shared by the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, ErrorKind, SpiBus};
use myrtio_spi_leds::{BusConfig, ConfigureBus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Configure(BusConfig),
    Select,
    Deselect,
    Write(Vec<u8>),
    Flush,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

impl spi::Error for MockError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl digital::Error for MockError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

pub type Events = Rc<RefCell<Vec<Event>>>;

pub fn events() -> Events {
    Rc::new(RefCell::new(Vec::new()))
}

/// Bytes of every write, concatenated in bus order
pub fn written(events: &Events) -> Vec<u8> {
    events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            Event::Write(bytes) => Some(bytes.clone()),
            _ => None,
        })
        .flatten()
        .collect()
}

pub struct MockBus {
    events: Events,
    writes: usize,
    fail_write: Option<usize>,
    fail_configure: bool,
}

impl MockBus {
    pub fn new(events: &Events) -> Self {
        Self {
            events: Rc::clone(events),
            writes: 0,
            fail_write: None,
            fail_configure: false,
        }
    }

    /// Fail the write with the given zero-based index
    pub fn failing_write(mut self, index: usize) -> Self {
        self.fail_write = Some(index);
        self
    }

    pub fn failing_configure(mut self) -> Self {
        self.fail_configure = true;
        self
    }
}

impl spi::ErrorType for MockBus {
    type Error = MockError;
}

impl SpiBus<u8> for MockBus {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let index = self.writes;
        self.writes += 1;
        if self.fail_write == Some(index) {
            return Err(MockError);
        }
        self.events.borrow_mut().push(Event::Write(words.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.write(&words.to_vec())?;
        words.fill(0);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.events.borrow_mut().push(Event::Flush);
        Ok(())
    }
}

impl ConfigureBus for MockBus {
    fn configure(&mut self, config: &BusConfig) -> Result<(), Self::Error> {
        if self.fail_configure {
            return Err(MockError);
        }
        self.events.borrow_mut().push(Event::Configure(*config));
        Ok(())
    }
}

pub struct MockPin {
    events: Events,
    fail: bool,
}

impl MockPin {
    pub fn new(events: &Events) -> Self {
        Self {
            events: Rc::clone(events),
            fail: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl digital::ErrorType for MockPin {
    type Error = MockError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(MockError);
        }
        self.events.borrow_mut().push(Event::Select);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(MockError);
        }
        self.events.borrow_mut().push(Event::Deselect);
        Ok(())
    }
}
