//! Core voxel data model
pub mod block;
pub mod chunk;
pub mod chunk_coord;
pub mod world;

// Selective re-exports
pub use block::Block;
pub use chunk::{Chunk, ChunkError, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_VOLUME, CHUNK_WIDTH};
pub use chunk_coord::ChunkCoord;
pub use world::{World, WorldError, WorldRevision};
