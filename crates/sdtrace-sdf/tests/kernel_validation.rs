//! Validate the generated WGSL without a GPU

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use sdtrace_sdf::build_kernel;

#[test]
fn kernel_parses_and_validates() {
    let source = build_kernel();
    let module = naga::front::wgsl::parse_str(&source)
        .unwrap_or_else(|e| panic!("wgsl parse: {}", e.emit_to_string(&source)));

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .unwrap_or_else(|e| panic!("wgsl validate: {e:?}"));
}

#[test]
fn kernel_exposes_compute_entry_point() {
    let module = naga::front::wgsl::parse_str(&build_kernel()).unwrap();
    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.name == "main")
        .unwrap();
    assert_eq!(entry.stage, naga::ShaderStage::Compute);
    assert_eq!(entry.workgroup_size, [8, 8, 1]);
}
