//! GPU tests for the raymarching effect
//!
//! Each test requests a headless adapter, falling back to a software
//! adapter, and returns early only when the machine has neither.

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use glam::Vec3;
use marcher_render::scene::{CameraState, CombineOp, ShapeKind, ShapeNode};
use marcher_render::{
    Camera, FallbackReason, FrameOutcome, RaymarchEffect, RenderError, device, init_headless,
    shader,
};
use std::sync::Arc;

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

fn effect() -> Option<RaymarchEffect> {
    match pollster::block_on(init_headless()) {
        Ok((device, queue)) => Some(RaymarchEffect::new(device, queue, FORMAT)),
        Err(e) => {
            eprintln!("Skipping GPU test: {}", e);
            None
        }
    }
}

/// Width chosen so rows need padding on readback
fn gradient(width: u32, height: u32) -> image::RgbaImage {
    image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x * 13) as u8, (y * 29) as u8, ((x + y) * 7) as u8, 255])
    })
}

fn square_camera() -> CameraState {
    camera_at(Vec3::new(0.0, 0.0, 5.0))
}

fn camera_at(position: Vec3) -> CameraState {
    let mut camera = Camera::look_at(position, Vec3::ZERO);
    camera.aspect = 1.0;
    camera.state()
}

/// Evaluator that writes the view ray as a color
const RAY_COLOR_FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(normalize(in.ray) * 0.5 + 0.5, 1.0);
}
"#;

#[test]
fn missing_evaluator_copies_source_exactly() {
    let Some(effect) = effect() else { return };
    let source = gradient(13, 7);

    let (output, outcome) = effect
        .render_to_image(&source, &square_camera())
        .expect("Frame should render");

    assert_eq!(outcome, FrameOutcome::Copied(FallbackReason::NoEvaluator));
    assert_eq!(output.as_raw(), source.as_raw());
}

#[test]
fn degenerate_camera_copies_source() {
    let Some(mut effect) = effect() else { return };
    effect
        .set_evaluator(shader::PASSTHROUGH_FRAGMENT)
        .expect("Passthrough should compile");
    let source = gradient(9, 9);

    let camera = CameraState {
        aspect: 0.0,
        ..square_camera()
    };
    let (output, outcome) = effect.render_to_image(&source, &camera).unwrap();

    assert_eq!(outcome, FrameOutcome::Copied(FallbackReason::DegenerateCamera));
    assert_eq!(output.as_raw(), source.as_raw());
}

#[test]
fn rejected_evaluator_falls_back_to_copy() {
    let Some(mut effect) = effect() else { return };

    let result = effect.set_evaluator("this is not wgsl");
    assert!(matches!(result, Err(RenderError::EvaluatorRejected(_))));
    assert!(!effect.has_evaluator());

    let source = gradient(5, 3);
    let (output, outcome) = effect.render_to_image(&source, &square_camera()).unwrap();
    assert_eq!(outcome, FrameOutcome::Copied(FallbackReason::NoEvaluator));
    assert_eq!(output.as_raw(), source.as_raw());
}

#[test]
fn passthrough_evaluator_reports_registered_shapes() {
    let Some(mut effect) = effect() else { return };
    effect.set_evaluator(shader::PASSTHROUGH_FRAGMENT).unwrap();

    let a = Arc::new(ShapeNode::new(ShapeKind::Sphere, CombineOp::Union));
    let b = Arc::new(
        ShapeNode::new(ShapeKind::Box, CombineOp::Subtraction).with_position(Vec3::X),
    );
    a.attach(effect.registry());
    b.attach(effect.registry());

    let source = gradient(16, 8);
    let (output, outcome) = effect.render_to_image(&source, &square_camera()).unwrap();

    assert_eq!(outcome, FrameOutcome::Raymarched { shape_count: 2 });
    // Sampling at texel centers reproduces the source, upright
    for (out, src) in output.pixels().zip(source.pixels()) {
        for channel in 0..4 {
            assert!(out.0[channel].abs_diff(src.0[channel]) <= 1);
        }
    }

    b.detach(effect.registry());
    let (_, outcome) = effect.render_to_image(&source, &square_camera()).unwrap();
    assert_eq!(outcome, FrameOutcome::Raymarched { shape_count: 1 });
}

#[test]
fn interpolated_rays_follow_corner_order() {
    let Some(mut effect) = effect() else { return };
    effect.set_evaluator(RAY_COLOR_FRAGMENT).unwrap();

    let source = image::RgbaImage::new(32, 32);
    let (output, _) = effect.render_to_image(&source, &square_camera()).unwrap();

    // Center looks straight down -Z
    let center = output.get_pixel(16, 16).0;
    assert!(center[0].abs_diff(128) <= 8);
    assert!(center[1].abs_diff(128) <= 8);
    assert!(center[2] < 8);

    // Top-left rays point left and up, bottom-right rays right and down
    let top_left = output.get_pixel(0, 0).0;
    assert!(top_left[0] < 100 && top_left[1] > 156);
    let bottom_right = output.get_pixel(31, 31).0;
    assert!(bottom_right[0] > 156 && bottom_right[1] < 100);
}

#[test]
fn mismatched_targets_are_rejected() {
    let Some(effect) = effect() else { return };
    let device = effect.device();

    let make = |width: u32| {
        device.create_texture(&wgpu::TextureDescriptor {
            label: None,
            size: wgpu::Extent3d {
                width,
                height: 4,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
    };
    let source = make(4);
    let destination = make(8);

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    let result = effect.render_image(&mut encoder, &source, &destination, &square_camera());

    assert!(matches!(
        result,
        Err(RenderError::TargetSizeMismatch {
            source_size: (4, 4),
            destination_size: (8, 4),
        })
    ));
}

#[test]
fn frames_sharing_an_encoder_keep_their_own_cameras() {
    let Some(mut effect) = effect() else { return };
    effect.set_evaluator(RAY_COLOR_FRAGMENT).unwrap();

    let source = device::upload_image(
        effect.device(),
        effect.queue(),
        &image::RgbaImage::new(8, 8),
        FORMAT,
        wgpu::TextureUsages::TEXTURE_BINDING,
        "Shared Source",
    )
    .unwrap();

    let make_destination = || {
        effect.device().create_texture(&wgpu::TextureDescriptor {
            label: None,
            size: source.size(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    };
    let front = make_destination();
    let back = make_destination();

    let mut encoder = effect
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    effect
        .render_image(&mut encoder, &source, &front, &camera_at(Vec3::new(0.0, 0.0, 5.0)))
        .unwrap();
    effect
        .render_image(&mut encoder, &source, &back, &camera_at(Vec3::new(0.0, 0.0, -5.0)))
        .unwrap();
    effect.queue().submit(std::iter::once(encoder.finish()));

    // Looking down -Z from the front, +Z from behind
    let front = device::read_image(effect.device(), effect.queue(), &front).unwrap();
    let back = device::read_image(effect.device(), effect.queue(), &back).unwrap();
    assert!(front.get_pixel(4, 4).0[2] < 32);
    assert!(back.get_pixel(4, 4).0[2] > 224);
}
