mod compositor;
mod error;
pub mod style;
pub mod transition;
pub mod view;

pub use compositor::*;
pub use error::{Error, Result};
