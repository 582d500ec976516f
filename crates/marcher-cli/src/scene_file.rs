//! JSON scene files
//!
//! A scene file lists shapes in compositing order along with the camera,
//! light, background and effect settings. Missing fields use defaults.

use anyhow::{Context, Result};
use glam::Vec3;
use marcher_render::{Camera, EffectConfig};
use marcher_scene::{CombineOp, DirectionalLight, ShapeKind, ShapeNode, SharedShapeRegistry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Camera placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            position: camera.position.to_array(),
            target: camera.target.to_array(),
            fov_degrees: camera.fov_degrees,
        }
    }
}

/// One shape entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeEntry {
    pub kind: ShapeKind,
    #[serde(default)]
    pub op: CombineOp,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

/// A complete scene description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub camera: CameraSettings,
    /// Direction the light travels; unset uses the effect's fallback
    pub light_direction: Option<[f32; 3]>,
    /// Background color at the top of the source image (RGB, 0-1)
    pub background_top: [f32; 3],
    /// Background color at the bottom of the source image (RGB, 0-1)
    pub background_bottom: [f32; 3],
    pub shapes: Vec<ShapeEntry>,
    pub effect: EffectConfig,
}

impl Default for SceneFile {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            light_direction: None,
            background_top: [0.3, 0.5, 0.8],
            background_bottom: [0.7, 0.8, 0.9],
            shapes: Vec::new(),
            effect: EffectConfig::default(),
        }
    }
}

impl SceneFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse scene file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize scene")?;
        fs::write(path, json).context("Failed to write scene file")
    }

    /// A small scene using every shape kind and operator
    pub fn demo() -> Self {
        let shape = |kind, op, position: [f32; 3], scale| ShapeEntry {
            kind,
            op,
            position,
            scale,
        };

        Self {
            light_direction: Some([-0.5, -1.0, -0.3]),
            shapes: vec![
                shape(ShapeKind::Box, CombineOp::Union, [0.0, 0.0, 0.0], 1.6),
                shape(ShapeKind::Sphere, CombineOp::Intersection, [0.0, 0.0, 0.0], 2.1),
                shape(ShapeKind::Capsule, CombineOp::Subtraction, [0.0, 0.0, 0.0], 1.2),
                shape(ShapeKind::Torus, CombineOp::Union, [0.0, -0.9, 0.0], 3.0),
                shape(ShapeKind::Sphere, CombineOp::Union, [1.8, 0.2, -0.5], 0.8),
            ],
            ..Self::default()
        }
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        let mut camera = Camera::look_at(
            Vec3::from_array(self.camera.position),
            Vec3::from_array(self.camera.target),
        );
        camera.fov_degrees = self.camera.fov_degrees;
        camera.aspect = aspect;
        camera
    }

    pub fn light(&self) -> Option<DirectionalLight> {
        self.light_direction
            .map(|direction| DirectionalLight::new(Vec3::from_array(direction)))
    }

    /// Create a node per shape and attach them in file order
    ///
    /// The registry only holds weak handles; keep the returned nodes alive
    /// for as long as they should render.
    pub fn attach_shapes(&self, registry: &SharedShapeRegistry) -> Vec<Arc<ShapeNode>> {
        self.shapes
            .iter()
            .map(|entry| {
                let node = Arc::new(
                    ShapeNode::new(entry.kind, entry.op)
                        .with_position(Vec3::from_array(entry.position))
                        .with_scale(entry.scale),
                );
                node.attach(registry);
                node
            })
            .collect()
    }

    /// Vertical gradient used as the pass's source image
    pub fn background_image(&self, width: u32, height: u32) -> image::RgbaImage {
        let top = Vec3::from_array(self.background_top);
        let bottom = Vec3::from_array(self.background_bottom);
        let span = height.saturating_sub(1).max(1) as f32;

        image::RgbaImage::from_fn(width, height, |_, y| {
            let color = top.lerp(bottom, y as f32 / span).clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
            image::Rgba([
                color.x.round() as u8,
                color.y.round() as u8,
                color.z.round() as u8,
                255,
            ])
        })
    }
}
