//! Binary physical format (version 3) of location references.

mod bits;
mod encoding;
mod reader;

pub use reader::{parse_base64, parse_binary};
