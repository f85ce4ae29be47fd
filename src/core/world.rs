use crate::core::block::Block;
use crate::core::chunk::{Chunk, ChunkError};
use crate::core::chunk_coord::ChunkCoord;
use log::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("Chunk error: {0}")]
    Chunk(#[from] ChunkError),
    #[error("Chunk ({x}, {y}) out of world bounds (size {size})")]
    OutOfBounds { x: i32, y: i32, size: i32 },
    #[error("Invalid world configuration: size must be positive, got {0}")]
    InvalidWorldConfiguration(i32),
}

static NEXT_WORLD_ID: AtomicU64 = AtomicU64::new(0);

/// Stamp identifying one observable state of one world.
///
/// Every mutating accessor on [`World`] produces a new stamp, and two
/// distinct worlds (clones included) never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldRevision {
    world_id: u64,
    generation: u64,
}

/// A `size x size` grid of chunks tiling the horizontal plane.
#[derive(Debug)]
pub struct World {
    chunks: Vec<Chunk>,
    size: i32,
    seed: u64,
    name: String,
    id: u64,
    generation: u64,
}

impl Clone for World {
    fn clone(&self) -> Self {
        Self {
            chunks: self.chunks.clone(),
            size: self.size,
            seed: self.seed,
            name: self.name.clone(),
            id: NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed),
            generation: 0,
        }
    }
}

impl World {
    pub fn new(size: i32, seed: u64, name: impl Into<String>) -> Result<Self, WorldError> {
        if size <= 0 {
            return Err(WorldError::InvalidWorldConfiguration(size));
        }

        let name = name.into();
        let chunk_count = (size as usize) * (size as usize);
        let chunks = (0..chunk_count).map(|_| Chunk::new()).collect();

        info!("Created world '{}' with {}x{} chunks", name, size, size);

        Ok(Self {
            chunks,
            size,
            seed,
            name,
            id: NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed),
            generation: 0,
        })
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Reserved for a terrain generator; nothing reads it yet.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn revision(&self) -> WorldRevision {
        WorldRevision {
            world_id: self.id,
            generation: self.generation,
        }
    }

    pub fn chunk_at(&self, chunk_x: i32, chunk_y: i32) -> Result<&Chunk, WorldError> {
        let index = self.chunk_index(chunk_x, chunk_y)?;
        Ok(&self.chunks[index])
    }

    /// Mutable chunk access. Counts as a mutation whether or not the caller
    /// ends up changing anything.
    pub fn chunk_at_mut(&mut self, chunk_x: i32, chunk_y: i32) -> Result<&mut Chunk, WorldError> {
        let index = self.chunk_index(chunk_x, chunk_y)?;
        self.generation += 1;
        Ok(&mut self.chunks[index])
    }

    /// Replaces a chunk wholesale and returns the previous one.
    pub fn set_chunk(&mut self, chunk_x: i32, chunk_y: i32, chunk: Chunk) -> Result<Chunk, WorldError> {
        let slot = self.chunk_at_mut(chunk_x, chunk_y)?;
        Ok(std::mem::replace(slot, chunk))
    }

    /// World block x/y to `(chunk_x, chunk_y, local_x, local_y)`, using
    /// floored division and modulo.
    pub fn block_world_to_local(world_x: i32, world_y: i32) -> (i32, i32, i32, i32) {
        let (chunk, local) = ChunkCoord::from_world_block(world_x, world_y);
        (chunk.x(), chunk.y(), local.x, local.y)
    }

    pub fn block_at(&self, world_x: i32, world_y: i32, world_z: i32) -> Result<Option<&Block>, WorldError> {
        let (chunk_x, chunk_y, local_x, local_y) = Self::block_world_to_local(world_x, world_y);
        Ok(self.chunk_at(chunk_x, chunk_y)?.block_at(local_x, local_y, world_z)?)
    }

    pub fn set_block(
        &mut self,
        world_x: i32,
        world_y: i32,
        world_z: i32,
        block: impl Into<Arc<Block>>,
    ) -> Result<Option<Arc<Block>>, WorldError> {
        let (chunk_x, chunk_y, local_x, local_y) = Self::block_world_to_local(world_x, world_y);
        self.chunk_at_mut(chunk_x, chunk_y)?
            .set_block(local_x, local_y, world_z, block)
            .map_err(WorldError::from)
    }

    pub fn remove_block(
        &mut self,
        world_x: i32,
        world_y: i32,
        world_z: i32,
    ) -> Result<Option<Arc<Block>>, WorldError> {
        let (chunk_x, chunk_y, local_x, local_y) = Self::block_world_to_local(world_x, world_y);
        self.chunk_at_mut(chunk_x, chunk_y)?
            .remove_block(local_x, local_y, world_z)
            .map_err(WorldError::from)
    }

    /// All chunks with their grid coordinates, x outer and y inner.
    pub fn chunks(&self) -> impl Iterator<Item = (ChunkCoord, &Chunk)> + '_ {
        self.chunks
            .iter()
            .enumerate()
            .map(move |(index, chunk)| (self.coord_of(index), chunk))
    }

    pub(crate) fn chunk_slice(&self) -> &[Chunk] {
        &self.chunks
    }

    pub(crate) fn coord_of(&self, index: usize) -> ChunkCoord {
        let index = index as i32;
        ChunkCoord::new(index / self.size, index % self.size)
    }

    fn chunk_index(&self, chunk_x: i32, chunk_y: i32) -> Result<usize, WorldError> {
        if !(0..self.size).contains(&chunk_x) || !(0..self.size).contains(&chunk_y) {
            return Err(WorldError::OutOfBounds {
                x: chunk_x,
                y: chunk_y,
                size: self.size,
            });
        }
        Ok((chunk_x * self.size + chunk_y) as usize)
    }
}
