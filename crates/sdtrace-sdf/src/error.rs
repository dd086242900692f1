//! Capacity errors raised while flattening a scene

use crate::layout::PrimitiveType;
use thiserror::Error;

/// The scene does not fit the fixed-capacity wire format.
///
/// Packing stops at the first overflow; nothing is truncated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackError {
    /// A list has more children than a segment has slots
    #[error("scene too large for backend: list has {count} children, a segment holds {max}")]
    TooManyChildren { count: usize, max: usize },

    /// More lists than segments
    #[error("scene too large for backend: more than {max} lists")]
    TooManySegments { max: usize },

    /// More primitives of one type than its body array holds
    #[error("scene too large for backend: more than {max} {kind} bodies")]
    TooManyBodies { kind: PrimitiveType, max: usize },

    /// Lists nested deeper than the kernel's traversal stack
    #[error("scene too large for backend: lists nested more than {max} deep")]
    TooDeep { max: usize },

    /// More lights than the uniform block carries
    #[error("scene too large for backend: {count} lights, at most {max} supported")]
    TooManyLights { count: usize, max: usize },
}
