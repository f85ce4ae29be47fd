use anyhow::{Context, Result};
use log::{info, warn, LevelFilter};
use simple_logger::SimpleLogger;
use std::collections::BTreeMap;
use std::path::PathBuf;
use voxbox::{EngineConfig, VoxelEngine};

fn load_config() -> Result<EngineConfig> {
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        return EngineConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    match EngineConfig::default_path() {
        Some(path) => EngineConfig::load_or_create(&path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            warn!("No config directory available, using defaults");
            Ok(EngineConfig::default())
        }
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the global max level does the filtering
    // so the config can adjust it once loaded.
    SimpleLogger::new().with_level(LevelFilter::Trace).init()?;
    log::set_max_level(LevelFilter::Info);

    let config = load_config()?;
    log::set_max_level(config.level_filter()?);

    let engine = VoxelEngine::new(config).context("Engine initialization failed")?;
    let observer = engine.observer();
    info!(
        "Observer at {} with view distance {}",
        observer.position, observer.view_distance
    );

    // Headless frame: report the draw set a renderer would receive.
    let visible = engine.visible_blocks();
    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in visible.iter() {
        *by_type.entry(entry.block.block_type.as_str()).or_default() += 1;
    }

    info!("{} blocks visible", visible.len());
    for (block_type, count) in by_type {
        info!("  {block_type}: {count}");
    }

    Ok(())
}
