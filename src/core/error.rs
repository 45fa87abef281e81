use super::node::NodeId;
use thiserror::Error;

/// Crate-wide error type. Scene-construction problems are reported here,
/// before any render worker starts; they are unrecoverable mid-render.
#[derive(Debug, Error)]
pub enum Error {
    #[error("transform is not invertible")]
    NonInvertibleTransform,

    #[error("node {0} already has a parent")]
    NodeAlreadyParented(NodeId),

    #[error("node {0} is not a group")]
    NotAGroup(NodeId),

    #[error("node {0} is not a primitive and has no surface of its own")]
    NotAPrimitive(NodeId),

    #[error("attaching node {child} under {parent} would create a cycle")]
    StructuralCycle { parent: NodeId, child: NodeId },

    #[error("invalid camera configuration: {0}")]
    InvalidCamera(&'static str),

    #[error("render cancelled")]
    RenderCancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
