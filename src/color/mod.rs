mod order;

use smart_leds::RGB8;
pub use order::{bgr_bytes, color_word, rgb_from_word};

pub type Rgb = RGB8;
