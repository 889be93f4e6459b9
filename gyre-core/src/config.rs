//! Application configuration, loaded from JSON

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::CameraConfig;
use crate::input::InputConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError
{
  #[error("failed to read config file {path}: {source}")]
  Io
  {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("invalid config value `{field}`: {reason}")]
  Invalid
  {
    field: &'static str,
    reason: String,
  },
}

//
// ──────────────────────────────────────────────────────────────
//   Sections
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig
{
  pub title: String,
  pub width: u32,
  pub height: u32,
}

impl Default for WindowConfig
{
  fn default() -> Self
  {
    Self { title: "Gyre".to_string(), width: 1280, height: 720 }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig
{
  /// Direction the light travels, world space; normalised per frame
  pub light_direction: Vec3,
  pub clear_color: [f64; 4],
  /// Draw the device/camera overlay
  pub show_hud: bool,
}

impl Default for RenderConfig
{
  fn default() -> Self
  {
    Self { light_direction: Vec3::new(-0.5, -1.0, -0.7), clear_color: [0.02, 0.02, 0.03, 1.0], show_hud: true }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GyreConfig
{
  pub window: WindowConfig,
  pub input: InputConfig,
  pub camera: CameraConfig,
  pub render: RenderConfig,
}

//
// ──────────────────────────────────────────────────────────────
//   Loading
// ──────────────────────────────────────────────────────────────
//

impl GyreConfig
{
  pub fn load(path: &Path) -> Result<Self, ConfigError>
  {
    let text =
      std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    Self::from_json(&text)
  }

  pub fn from_json(text: &str) -> Result<Self, ConfigError>
  {
    let config: Self = serde_json::from_str(text)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError>
  {
    let input = &self.input;
    let camera = &self.camera;

    check(
      "input.stick_inner_radius",
      (0.0..1.0).contains(&input.stick_inner_radius),
      "must be in [0, 1)",
    )?;
    check("input.button_threshold", (0.0..=1.0).contains(&input.button_threshold), "must be in [0, 1]")?;

    check_positive("camera.rotation_acceleration", camera.rotation_acceleration)?;
    check_positive("camera.max_rotation_speed", camera.max_rotation_speed)?;
    check("camera.rotation_damping", camera.rotation_damping >= 0.0, "must not be negative")?;
    check("camera.zoom_speed", camera.zoom_speed >= 0.0, "must not be negative")?;
    check_positive("camera.min_distance", camera.min_distance)?;
    check("camera.max_distance", camera.max_distance >= camera.min_distance, "must be >= min_distance")?;
    check("camera.near", camera.near > 0.0 && camera.far > camera.near, "need 0 < near < far")?;
    check("camera.fovy_degrees", camera.fovy_degrees > 0.0 && camera.fovy_degrees < 180.0, "must be in (0, 180)")?;
    check_positive("camera.max_frame_delta", camera.max_frame_delta)?;

    check("window.width", self.window.width > 0 && self.window.height > 0, "window must have a size")?;

    Ok(())
  }
}

fn check(field: &'static str, ok: bool, reason: &str) -> Result<(), ConfigError>
{
  if ok
  {
    Ok(())
  }
  else
  {
    Err(ConfigError::Invalid { field, reason: reason.to_string() })
  }
}

// NaN fails `> 0.0`, so this also rejects non-finite garbage
fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError>
{
  check(field, value > 0.0 && value.is_finite(), "must be a positive number")
}
