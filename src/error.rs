use thiserror::Error;

use crate::view::NodeKey;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The handle refers to a drawable that has been removed from the arena.
    #[error("stale drawable node: {0:?}")]
    StaleNode(NodeKey),

    /// Reparenting would make the node its own ancestor.
    #[error("drawable {0:?} cannot be parented under itself or a descendant")]
    CyclicHierarchy(NodeKey),

    #[error("stale element handle")]
    StaleElement,

    #[error("element is not a scroll container")]
    NotScrollable,

    #[error("unknown {property} keyword: {value:?}")]
    UnknownKeyword {
        property: &'static str,
        value: String,
    },
}

impl Error {
    pub(crate) fn unknown_keyword(property: &'static str, value: &str) -> Self {
        Self::UnknownKeyword {
            property,
            value: value.to_owned(),
        }
    }
}
