//! Effect configuration

use glam::Vec3;
use marcher_scene::DEFAULT_LIGHT_DIRECTION;
use serde::{Deserialize, Serialize};

/// Settings for a [`RaymarchEffect`](crate::RaymarchEffect)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Light direction used when no light is bound
    pub fallback_light_direction: [f32; 3],
    /// Color the destination is cleared to before the evaluator draws (RGBA, 0-1)
    pub clear_color: [f32; 4],
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            fallback_light_direction: DEFAULT_LIGHT_DIRECTION.to_array(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl EffectConfig {
    pub fn fallback_light(&self) -> Vec3 {
        Vec3::from_array(self.fallback_light_direction)
    }

    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::expect_used)]
    fn test_missing_fields_use_defaults() {
        let config: EffectConfig =
            serde_json::from_str(r#"{ "clear_color": [0.2, 0.3, 0.4, 1.0] }"#)
                .expect("Partial config should parse");

        assert_eq!(config.fallback_light(), Vec3::NEG_Y);
        assert_eq!(config.clear_color, [0.2, 0.3, 0.4, 1.0]);
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        let result = serde_json::from_str::<EffectConfig>(r#"{ "clear_color": "red" }"#);
        assert!(result.is_err());
    }
}
