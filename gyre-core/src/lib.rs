//! Gyre core: device input normalisation, input smoothing and camera
//! integration for a real-time render loop.
//!
//! Per frame the platform layer calls, in order:
//!
//! 1. [`frame::FrameClock::tick`] for the elapsed time,
//! 2. [`input::InputNormalizer::poll`] to snapshot every device,
//! 3. [`camera::CameraIntegrator::update`] to advance the camera,
//! 4. [`camera::CameraIntegrator::view_matrix`] and [`frame::FrameData::new`]
//!    to hand the transforms to the draw layer.
//!
//! Nothing here touches a window, GPU or gamepad driver; platform input
//! arrives as [`input::InputEvent`]s and [`input::GamepadSource`] queries.

pub mod camera;
pub mod config;
pub mod frame;
pub mod input;
pub mod math;

pub use camera::{CameraConfig, CameraIntegrator};
pub use config::{ConfigError, GyreConfig};
pub use frame::{FrameClock, FrameData, ModelConstants};
pub use input::{InputConfig, InputNormalizer, InputSender, InputState};
