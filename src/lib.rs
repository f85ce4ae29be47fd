pub mod config;
pub mod core;
pub mod engine;
pub mod render;

// Re-export commonly used types
pub use crate::config::{ConfigError, EngineConfig, RenderConfig, WorldConfig};
pub use crate::core::{
    Block, Chunk, ChunkCoord, ChunkError, World, WorldError, WorldRevision, CHUNK_DEPTH,
    CHUNK_HEIGHT, CHUNK_WIDTH,
};
pub use crate::engine::{EngineError, VoxelEngine};
pub use crate::render::{
    compute_visible_blocks, is_occluded, Observer, VisibilityCache, VisibilityEngine, VisibleBlock,
};
