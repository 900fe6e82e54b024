//! Facet studio: a test scene of procedural objects, an optional glTF
//! model and a point light, inspected from the keyboard.
//!
//! F1 camera, F2 light, F3 model nodes, F4 object materials.
//! Space pauses, `-`/`=` change the speed, Escape quits.

mod config;
mod controls;
mod factory;
mod studio;

use anyhow::Result;
use facet_engine::device::GpuInit;
use facet_engine::gfx::GraphicsConfig;
use facet_engine::logging::{init_logging, LoggingConfig};
use facet_engine::window::{Runtime, RuntimeConfig};

use config::{Command, StudioConfig, USAGE};
use studio::Studio;

fn main() -> Result<()> {
    let config = match StudioConfig::parse(std::env::args().skip(1))? {
        Command::Run(config) => config,
        Command::Help => {
            println!("{USAGE}");
            return Ok(());
        }
    };
    init_logging(LoggingConfig {
        filter: config.log_filter.clone(),
        ..LoggingConfig::default()
    });
    log::info!("starting studio with {config:?}");

    let gpu = if config.vsync {
        GpuInit::default()
    } else {
        GpuInit::default().without_vsync()
    };
    let runtime = RuntimeConfig {
        title: "facet studio".to_string(),
        gpu,
        graphics: GraphicsConfig {
            shader_dir: Some(config.shader_dir.clone()),
            ..GraphicsConfig::default()
        },
        ..RuntimeConfig::default()
    };

    Runtime::run(runtime, Studio::new(config))
}
