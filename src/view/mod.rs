pub mod decoration;
pub mod node;
pub mod scroll;

pub use decoration::BoxDecorationTree;
pub use node::*;
pub use scroll::{
    MovementMode, ScrollPhase, ScrollView, ScrollViewport, ScrollbarController, ScrollbarGeometry,
};
