mod core;
mod cube;
mod depth;
mod hud;
mod uniform;

pub use self::core::{Renderer, RendererError};
pub use hud::HudStats;
