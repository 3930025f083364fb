#![no_std]

pub mod apa102;
pub mod bus;
pub mod color;
pub mod error;
pub mod frame;
pub mod ws2812b;

pub use apa102::{Apa102, Apa102Config, Apa102Frame};
pub use bus::{BusConfig, ConfigureBus, ConfiguredBus, DriverError, Unwired};
pub use color::Rgb;
pub use error::{Error, FrameError};
pub use frame::{WireFrame, frame_len};
pub use ws2812b::{Ws2812b, Ws2812bFrame};

pub use smart_leds::SmartLedsWrite;
