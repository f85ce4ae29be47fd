use crate::core::chunk::{CHUNK_DEPTH, CHUNK_WIDTH};
use glam::{IVec2, IVec3};
use std::cmp::Ordering;

/// Address of a chunk on the horizontal world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkCoord(pub IVec2);

impl PartialOrd for ChunkCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChunkCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.0.x.cmp(&other.0.x) {
            Ordering::Equal => self.0.y.cmp(&other.0.y),
            ord => ord,
        }
    }
}

impl ChunkCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self(IVec2::new(x, y))
    }

    pub fn x(&self) -> i32 {
        self.0.x
    }

    pub fn y(&self) -> i32 {
        self.0.y
    }

    /// World block position of this chunk's local (0, 0, 0).
    pub fn origin(&self) -> IVec3 {
        IVec3::new(self.0.x * CHUNK_WIDTH, self.0.y * CHUNK_DEPTH, 0)
    }

    pub fn to_world_pos(&self, local: IVec3) -> IVec3 {
        self.origin() + local
    }

    /// Splits a horizontal world block position into its chunk and the
    /// local offset inside it. Negative positions floor towards the
    /// lower chunk, so the local part is always in `0..16`.
    pub fn from_world_block(world_x: i32, world_y: i32) -> (Self, IVec2) {
        let chunk = Self::new(world_x.div_euclid(CHUNK_WIDTH), world_y.div_euclid(CHUNK_DEPTH));
        let local = IVec2::new(world_x.rem_euclid(CHUNK_WIDTH), world_y.rem_euclid(CHUNK_DEPTH));
        (chunk, local)
    }
}

impl From<IVec2> for ChunkCoord {
    fn from(vec: IVec2) -> Self {
        Self(vec)
    }
}

impl From<ChunkCoord> for IVec2 {
    fn from(coord: ChunkCoord) -> Self {
        coord.0
    }
}
