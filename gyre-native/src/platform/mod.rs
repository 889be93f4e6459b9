//! Translation from winit / gilrs into gyre-core input events

pub mod gamepad;
pub mod keyboard;

pub use gamepad::GamepadBackend;
