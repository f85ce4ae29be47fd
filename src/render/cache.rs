use crate::core::{World, WorldRevision};
use crate::render::visibility::{VisibilityEngine, VisibleBlock};
use glam::Vec3;
use log::trace;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameKey {
    revision: WorldRevision,
    observer: [u32; 3],
    view_distance: u32,
}

impl FrameKey {
    fn new(world: &World, observer: Vec3, view_distance: f32) -> Self {
        Self {
            revision: world.revision(),
            observer: observer.to_array().map(f32::to_bits),
            view_distance: view_distance.to_bits(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    last: Option<(FrameKey, Arc<[VisibleBlock]>)>,
    stats: CacheStats,
}

/// Remembers the last visibility result.
///
/// Reused only when the world revision, the observer position and the view
/// distance all match bit for bit; any world mutation changes the revision.
#[derive(Debug, Default)]
pub struct VisibilityCache {
    state: Mutex<CacheState>,
}

impl VisibilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible_blocks(
        &self,
        engine: &VisibilityEngine,
        world: &World,
        observer: Vec3,
        view_distance: f32,
    ) -> Arc<[VisibleBlock]> {
        let key = FrameKey::new(world, observer, view_distance);
        let mut state = self.state.lock();

        let cached = state
            .last
            .as_ref()
            .filter(|(cached_key, _)| *cached_key == key)
            .map(|(_, blocks)| Arc::clone(blocks));

        if let Some(blocks) = cached {
            state.stats.hits += 1;
            trace!("Visibility cache hit ({} blocks)", blocks.len());
            return blocks;
        }

        let blocks: Arc<[VisibleBlock]> = engine.compute(world, observer, view_distance).into();
        state.last = Some((key, Arc::clone(&blocks)));
        state.stats.misses += 1;
        blocks
    }

    pub fn clear(&self) {
        self.state.lock().last = None;
    }

    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }
}
