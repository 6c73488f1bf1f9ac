pub mod core;
pub mod detect;
pub mod export;
pub mod layout;
pub mod pipeline;
pub mod translit;

pub use core::config::Config;
pub use core::model::{Glyph, Transliteration};
pub use pipeline::Pipeline;
