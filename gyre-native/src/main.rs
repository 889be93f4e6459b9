mod app;
mod platform;
mod renderer;

use std::path::PathBuf;

use anyhow::Context;
use gyre_core::GyreConfig;

fn main() -> anyhow::Result<()>
{
  // RUST_LOG overrides; wgpu_hal is very chatty at info
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info,wgpu_hal=off,naga=warn")).init();

  let config = match std::env::args_os().nth(1).map(PathBuf::from)
  {
    Some(path) =>
    {
      GyreConfig::load(&path).with_context(|| format!("loading config from {}", path.display()))?
    }
    None => GyreConfig::default(),
  };

  app::run(config)
}
