mod renderer;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use danmaku_core::{Engine, config};
use danmaku_protocol::Settings;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: danmaku <comments.json> [settings.json]");
        std::process::exit(1);
    }

    let script = script::load(&PathBuf::from(&args[1]))?;
    let settings = match args.get(2) {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings from {path}"))?;
            config::from_json(&json)?
        }
        None => Settings::default(),
    };

    let palette = settings.palette.clone();
    let engine = Engine::with_settings(settings)?;
    renderer::run(engine, &script, &palette)
}
