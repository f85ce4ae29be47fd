use crate::core::block::Block;
use glam::IVec3;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("Block position ({x}, {y}, {z}) out of chunk bounds")]
    OutOfBounds { x: i32, y: i32, z: i32 },
}

pub const CHUNK_WIDTH: i32 = 16;
pub const CHUNK_DEPTH: i32 = 16;
pub const CHUNK_HEIGHT: i32 = 256;
pub const CHUNK_VOLUME: usize = (CHUNK_WIDTH * CHUNK_DEPTH * CHUNK_HEIGHT) as usize;

/// A 16x16x256 column of optional blocks. `None` is air.
///
/// Cells are laid out x-major, then y, with z (height) contiguous, so a
/// linear walk over the storage visits columns bottom to top. Cells hold
/// shared immutable blocks, so equal blocks placed many times cost one
/// pointer per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    blocks: Vec<Option<Arc<Block>>>,
    block_count: usize,
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunk {
    /// A chunk floored with dirt at z = 0 and air everywhere above.
    pub fn new() -> Self {
        let mut chunk = Self::empty();
        let dirt = Block::shared_dirt();
        for x in 0..CHUNK_WIDTH {
            for y in 0..CHUNK_DEPTH {
                let index = Self::index(x, y, 0);
                chunk.blocks[index] = Some(Arc::clone(&dirt));
            }
        }
        chunk.block_count = (CHUNK_WIDTH * CHUNK_DEPTH) as usize;
        chunk
    }

    pub fn empty() -> Self {
        Self {
            blocks: vec![None; CHUNK_VOLUME],
            block_count: 0,
        }
    }

    #[inline]
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_WIDTH).contains(&x)
            && (0..CHUNK_DEPTH).contains(&y)
            && (0..CHUNK_HEIGHT).contains(&z)
    }

    /// Whether the cell holds a block. Anything outside the chunk is not solid.
    #[inline]
    pub fn solid_at(&self, x: i32, y: i32, z: i32) -> bool {
        Self::in_bounds(x, y, z) && self.blocks[Self::index(x, y, z)].is_some()
    }

    pub fn block_at(&self, x: i32, y: i32, z: i32) -> Result<Option<&Block>, ChunkError> {
        let index = Self::checked_index(x, y, z)?;
        Ok(self.blocks[index].as_deref())
    }

    /// Overwrites one cell and returns what was there before. Accepts either
    /// an owned `Block` or an `Arc<Block>` to share with other cells.
    pub fn set_block(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        block: impl Into<Arc<Block>>,
    ) -> Result<Option<Arc<Block>>, ChunkError> {
        let index = Self::checked_index(x, y, z)?;
        let old_block = self.blocks[index].replace(block.into());

        if old_block.is_none() {
            self.block_count += 1;
        }

        Ok(old_block)
    }

    pub fn remove_block(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
    ) -> Result<Option<Arc<Block>>, ChunkError> {
        let index = Self::checked_index(x, y, z)?;
        let removed = self.blocks[index].take();

        if removed.is_some() {
            self.block_count -= 1;
        }

        Ok(removed)
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }

    pub fn is_empty(&self) -> bool {
        self.block_count == 0
    }

    /// Present blocks with their local positions, in storage order.
    pub fn blocks(&self) -> impl Iterator<Item = (IVec3, &Block)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.as_deref().map(|block| (Self::position(index), block)))
    }

    /// Unchecked read used by the visibility scan, which only walks valid cells.
    #[inline]
    pub(crate) fn cell(&self, x: i32, y: i32, z: i32) -> Option<&Arc<Block>> {
        self.blocks[Self::index(x, y, z)].as_ref()
    }

    fn checked_index(x: i32, y: i32, z: i32) -> Result<usize, ChunkError> {
        if !Self::in_bounds(x, y, z) {
            return Err(ChunkError::OutOfBounds { x, y, z });
        }
        Ok(Self::index(x, y, z))
    }

    #[inline]
    fn index(x: i32, y: i32, z: i32) -> usize {
        ((x * CHUNK_DEPTH + y) * CHUNK_HEIGHT + z) as usize
    }

    fn position(index: usize) -> IVec3 {
        let index = index as i32;
        IVec3::new(
            index / (CHUNK_DEPTH * CHUNK_HEIGHT),
            (index / CHUNK_HEIGHT) % CHUNK_DEPTH,
            index % CHUNK_HEIGHT,
        )
    }
}
