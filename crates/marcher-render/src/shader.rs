//! WGSL program assembly
//!
//! The prelude declares the uniform layout, the shape code constants and
//! the fixed vertex stage. An evaluator only provides `fs_main`.

/// Uniform declarations and the corner-selecting vertex stage
pub const PRELUDE: &str = include_str!("shaders/prelude.wgsl");

/// Entry point the evaluator must define
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Entry point defined by the prelude
pub const VERTEX_ENTRY: &str = "vs_main";

/// Concatenate the prelude with an evaluator's fragment stage
pub fn build_program(fragment_source: &str) -> String {
    let mut program = String::with_capacity(PRELUDE.len() + fragment_source.len() + 1);
    program.push_str(PRELUDE);
    program.push('\n');
    program.push_str(fragment_source);
    program
}

/// Fragment stage that passes the source image through
///
/// Useful as a smoke test for the quad and bindings.
pub const PASSTHROUGH_FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(source_texture, source_sampler, in.uv);
}
"#;
