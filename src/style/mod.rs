mod color;
mod computed_style;
mod layout_state;
mod scroll_style;

pub use color::*;
pub use computed_style::*;
pub use layout_state::*;
pub use scroll_style::*;
