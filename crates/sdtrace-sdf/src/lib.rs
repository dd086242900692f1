//! sdtrace SDF - flattened scene format for the compute backend
//!
//! A compute kernel has no recursion and no pointers, so the scene tree is
//! packed into fixed-capacity arrays it can walk with an explicit stack.
//! This crate owns that wire format and the WGSL kernel that consumes it,
//! without touching the GPU itself.
//!
//! ## Key Types
//!
//! - [`PackedScene`] - Flattened body and tree-node arrays built by [`pack`]
//! - [`BodyRecord`] / [`TreeNode`] - Fixed-width records uploaded as-is
//! - [`FrameUniforms`] - Per-frame settings, camera and lights
//! - [`build_kernel`] - Complete WGSL source with the layout constants baked in
//!
//! ## Example
//!
//! ```rust
//! use sdtrace_core::prelude::*;
//! use sdtrace_sdf::pack;
//!
//! let mut root = List::new(Mode::Union);
//! root.append(death_star(Vec3::ZERO, 5.0, Vec3::ONE));
//!
//! let packed = pack(&root).unwrap();
//! assert_eq!(packed.segment_count(), 2);
//! assert_eq!(packed.evaluate(Vec3::ZERO), root.evaluate(Vec3::ZERO));
//! ```

mod error;
mod kernel;
mod layout;
mod pack;
mod uniforms;

pub use error::PackError;
pub use kernel::{WORKGROUP_SIZE, build_kernel, kernel_source, workgroup_count};
pub use layout::{
    BodyRecord, LIST_TAG, MAX_BODIES_PER_TYPE, MAX_LIGHTS, MAX_SEGMENTS, MAX_STACK_DEPTH,
    PRIMITIVE_TYPES, PrimitiveType, SEGMENT_SLOTS, TreeNode, mode_from_tag, mode_tag,
};
pub use pack::{PackedScene, pack};
pub use uniforms::{FrameUniforms, LightUniform};
