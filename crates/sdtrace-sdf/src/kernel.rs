//! WGSL kernel source
//!
//! The kernel body lives in `shaders/trace.wgsl`; the wire-layout
//! constants are generated from the Rust definitions so the two sides
//! cannot drift apart.

use crate::layout::{
    LIST_TAG, MAX_BODIES_PER_TYPE, MAX_LIGHTS, MAX_STACK_DEPTH, PrimitiveType, SEGMENT_SLOTS,
    mode_tag,
};
use sdtrace_core::sdf::Mode;
use std::fmt::Write;

/// Edge length of the square compute workgroup
pub const WORKGROUP_SIZE: u32 = 8;

/// The kernel body without the layout constants
pub fn kernel_source() -> &'static str {
    include_str!("shaders/trace.wgsl")
}

/// Workgroups needed to cover a `width` x `height` image
pub fn workgroup_count(width: u32, height: u32) -> (u32, u32) {
    (
        width.div_ceil(WORKGROUP_SIZE),
        height.div_ceil(WORKGROUP_SIZE),
    )
}

fn constants() -> String {
    let mut code = String::new();
    let mut constant = |name: &str, value: usize| {
        // Writing to a String cannot fail
        let _ = writeln!(code, "const {name}: u32 = {value}u;");
    };

    constant("MAX_BODIES_PER_TYPE", MAX_BODIES_PER_TYPE);
    constant("SEGMENT_SLOTS", SEGMENT_SLOTS);
    constant("MAX_STACK_DEPTH", MAX_STACK_DEPTH);
    constant("MAX_LIGHTS", MAX_LIGHTS);
    constant("LIST_TAG", LIST_TAG as usize);

    constant("TYPE_SPHERE", PrimitiveType::Sphere.tag() as usize);
    constant("TYPE_BOX", PrimitiveType::Box.tag() as usize);
    constant("TYPE_CROSS", PrimitiveType::Cross.tag() as usize);

    constant("MODE_UNION", mode_tag(Mode::Union) as usize);
    constant("MODE_COMPLEMENT", mode_tag(Mode::Complement) as usize);
    constant("MODE_INTERSECTION", mode_tag(Mode::Intersection) as usize);
    constant("MODE_DIFFERENCE", mode_tag(Mode::Difference) as usize);
    code
}

/// Complete kernel source, ready for `create_shader_module`
pub fn build_kernel() -> String {
    format!("{}\n{}", constants(), kernel_source())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_prepended() {
        let source = build_kernel();
        assert!(source.starts_with("const MAX_BODIES_PER_TYPE: u32 = 1024u;"));
        assert!(source.contains("const LIST_TAG: u32 = 3u;"));
        assert!(source.contains("const MODE_DIFFERENCE: u32 = 3u;"));
        assert!(source.contains("@workgroup_size(8, 8, 1)"));
    }

    #[test]
    fn workgroups_cover_partial_tiles() {
        assert_eq!(workgroup_count(800, 600), (100, 75));
        assert_eq!(workgroup_count(801, 1), (101, 1));
        assert_eq!(workgroup_count(0, 0), (0, 0));
    }
}
