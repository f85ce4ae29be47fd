use crate::{
    config::{ConfigError, EngineConfig},
    core::{World, WorldError},
    render::{CacheStats, Observer, VisibilityCache, VisibilityEngine, VisibleBlock},
};
use glam::Vec3;
use log::info;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("World error: {0}")]
    World(#[from] WorldError),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Owns the world and the observer, and hands a host renderer the blocks
/// to draw each frame.
///
/// Edits go through [`VoxelEngine::world_mut`] between frames; the
/// exclusive borrow keeps them from overlapping a visibility scan. The
/// config is only read at construction; the observer moves through
/// [`VoxelEngine::set_observer`].
pub struct VoxelEngine {
    world: World,
    observer: Observer,
    visibility: VisibilityEngine,
    cache: Option<VisibilityCache>,
    config: EngineConfig,
}

impl VoxelEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let world = World::new(config.world.size, config.world.seed, config.world.name.clone())?;
        let observer = Observer::new(
            Vec3::from_array(config.render.observer),
            config.render.view_distance,
        );
        let visibility = VisibilityEngine::new(config.render.parallel);
        let cache = config.render.cache.then(VisibilityCache::new);

        info!(
            "Engine ready: world '{}', view distance {}, parallel {}, cache {}",
            world.name(),
            observer.view_distance,
            visibility.is_parallel(),
            cache.is_some()
        );

        Ok(Self {
            world,
            observer,
            visibility,
            cache,
            config,
        })
    }

    /// The config the engine was built from.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn observer(&self) -> Observer {
        self.observer
    }

    pub fn set_observer(&mut self, observer: Observer) {
        self.observer = observer;
    }

    /// The draw set for the current world and observer.
    pub fn visible_blocks(&self) -> Arc<[VisibleBlock]> {
        let Observer {
            position,
            view_distance,
        } = self.observer;

        match &self.cache {
            Some(cache) => cache.visible_blocks(&self.visibility, &self.world, position, view_distance),
            None => self.visibility.compute(&self.world, position, view_distance).into(),
        }
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(VisibilityCache::stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Block;

    fn small_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.world.size = 1;
        config.world.name = "t".to_string();
        config.render.view_distance = 3.0;
        config.render.observer = [8.0, 8.0, 2.0];
        config
    }

    #[test]
    fn test_engine_frame() {
        let engine = VoxelEngine::new(small_config()).unwrap();
        assert_eq!(engine.world().name(), "t");
        assert_eq!(engine.visible_blocks().len(), 21);
    }

    #[test]
    fn test_engine_observer_and_edits() {
        let mut engine = VoxelEngine::new(small_config()).unwrap();
        engine.set_observer(Observer::new(Vec3::new(8.0, 8.0, 5.0), 3.0));
        assert!(engine.visible_blocks().is_empty());

        engine.world_mut().set_block(8, 8, 4, Block::dirt()).unwrap();
        let visible = engine.visible_blocks();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].position, glam::IVec3::new(8, 8, 4));

        engine.visible_blocks();
        assert_eq!(
            engine.cache_stats(),
            Some(CacheStats { hits: 1, misses: 2 })
        );
    }

    #[test]
    fn test_observer_moves_independently_of_config() {
        let mut engine = VoxelEngine::new(small_config()).unwrap();
        let initial = engine.config().clone();

        engine.set_observer(Observer::new(Vec3::new(8.0, 8.0, 1.0), 1.0));
        let visible = engine.visible_blocks();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].position, glam::IVec3::new(8, 8, 0));

        // The config still describes the start-up pose
        assert_eq!(engine.config(), &initial);
        assert_eq!(engine.config().render.observer, [8.0, 8.0, 2.0]);
        assert_eq!(engine.observer().view_distance, 1.0);

        let mut rebuilt_config = engine.config().clone();
        rebuilt_config.render.view_distance = 0.5;
        assert_eq!(engine.visible_blocks().len(), 1);
        assert_eq!(VoxelEngine::new(rebuilt_config).unwrap().visible_blocks().len(), 0);
    }

    #[test]
    fn test_engine_without_cache() {
        let mut config = small_config();
        config.render.cache = false;
        config.render.parallel = false;
        let engine = VoxelEngine::new(config).unwrap();
        assert_eq!(engine.visible_blocks().len(), 21);
        assert!(engine.cache_stats().is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config();
        config.world.size = 0;
        assert!(matches!(
            VoxelEngine::new(config),
            Err(EngineError::Config(ConfigError::Invalid(_)))
        ));
    }
}
