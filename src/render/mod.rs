//! Draw-set selection for a host renderer. Meshing and GPU submission live
//! with the host; this module only decides which blocks get drawn.
pub mod cache;
pub mod visibility;

pub use cache::{CacheStats, VisibilityCache};
pub use visibility::{
    compute_visible_blocks, in_view_range, is_block_in_sight, is_occluded, visible_blocks_in_chunk,
    BlockFace, Observer, VisibilityEngine, VisibleBlock,
};
