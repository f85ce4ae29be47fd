//! Per-frame visibility: which blocks an observer has to draw.
//!
//! A block is drawn when it is present, not fully enclosed by solid
//! neighbours inside its own chunk, and within the view distance of the
//! observer. The query is a pure function of the world and the observer,
//! recomputed from scratch on every call.

use crate::core::{Block, Chunk, ChunkCoord, World, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH};
use glam::{IVec3, Vec3};
use log::debug;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFace {
    North,
    South,
    East,
    West,
    Top,
    Bottom,
}

impl BlockFace {
    pub const ALL: [Self; 6] = [
        Self::Top,
        Self::Bottom,
        Self::North,
        Self::South,
        Self::East,
        Self::West,
    ];

    /// Step to the neighbouring cell across this face. z is up.
    pub fn offset(&self) -> IVec3 {
        match self {
            Self::North => IVec3::new(0, 1, 0),
            Self::South => IVec3::new(0, -1, 0),
            Self::East => IVec3::new(1, 0, 0),
            Self::West => IVec3::new(-1, 0, 0),
            Self::Top => IVec3::new(0, 0, 1),
            Self::Bottom => IVec3::new(0, 0, -1),
        }
    }
}

/// Observer pose as far as visibility cares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub position: Vec3,
    pub view_distance: f32,
}

impl Observer {
    pub fn new(position: Vec3, view_distance: f32) -> Self {
        Self {
            position,
            view_distance,
        }
    }
}

/// A block to draw and where, in world block coordinates. The block is
/// shared with the chunk cell it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleBlock {
    pub block: Arc<Block>,
    pub position: IVec3,
}

/// True when all six neighbours inside the same chunk are solid.
/// Cells past the chunk edge never count as solid.
pub fn is_occluded(chunk: &Chunk, x: i32, y: i32, z: i32) -> bool {
    let cell = IVec3::new(x, y, z);
    BlockFace::ALL.iter().all(|face| {
        let n = cell + face.offset();
        chunk.solid_at(n.x, n.y, n.z)
    })
}

/// Distance is measured to the block's integer position, not its centre.
#[inline]
pub fn in_view_range(observer: Vec3, position: IVec3, view_distance: f32) -> bool {
    observer.distance(position.as_vec3()) <= view_distance
}

pub fn is_block_in_sight(
    observer: Vec3,
    position: IVec3,
    view_distance: f32,
    chunk: &Chunk,
    x: i32,
    y: i32,
    z: i32,
) -> bool {
    !is_occluded(chunk, x, y, z) && in_view_range(observer, position, view_distance)
}

pub fn visible_blocks_in_chunk(
    chunk: &Chunk,
    coord: ChunkCoord,
    observer: Vec3,
    view_distance: f32,
) -> Vec<VisibleBlock> {
    let mut visible = Vec::new();
    if !chunk_in_range(coord, observer, view_distance) || chunk.is_empty() {
        return visible;
    }

    let origin = coord.origin();
    // Layers further than the view distance vertically can't pass the range
    // test. One layer of slack on each side keeps float rounding out of it.
    let z_min = ((observer.z - view_distance).floor() as i32).saturating_sub(1).max(0);
    let z_max = ((observer.z + view_distance).ceil() as i32)
        .saturating_add(1)
        .min(CHUNK_HEIGHT - 1);

    for x in 0..CHUNK_WIDTH {
        for y in 0..CHUNK_DEPTH {
            for z in z_min..=z_max {
                let Some(block) = chunk.cell(x, y, z) else {
                    continue;
                };
                let position = origin + IVec3::new(x, y, z);
                if is_block_in_sight(observer, position, view_distance, chunk, x, y, z) {
                    visible.push(VisibleBlock {
                        block: Arc::clone(block),
                        position,
                    });
                }
            }
        }
    }

    visible
}

/// Every block in the world that has to be drawn this frame, ordered by
/// chunk (x outer, y inner) and then by local x, y, z.
pub fn compute_visible_blocks(world: &World, observer: Vec3, view_distance: f32) -> Vec<VisibleBlock> {
    VisibilityEngine::sequential().compute(world, observer, view_distance)
}

/// Runs the visibility query, optionally fanning chunks out over rayon.
/// Both modes return identical, identically ordered results.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityEngine {
    parallel: bool,
}

impl VisibilityEngine {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    pub fn sequential() -> Self {
        Self::new(false)
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn compute(&self, world: &World, observer: Vec3, view_distance: f32) -> Vec<VisibleBlock> {
        // NaN and negative distances admit nothing
        if view_distance.is_nan() || view_distance < 0.0 {
            return Vec::new();
        }

        let start = Instant::now();
        let chunks = world.chunk_slice();

        let visible: Vec<VisibleBlock> = if self.parallel {
            chunks
                .par_iter()
                .enumerate()
                .map(|(index, chunk)| {
                    visible_blocks_in_chunk(chunk, world.coord_of(index), observer, view_distance)
                })
                .collect::<Vec<_>>()
                .into_iter()
                .flatten()
                .collect()
        } else {
            chunks
                .iter()
                .enumerate()
                .flat_map(|(index, chunk)| {
                    visible_blocks_in_chunk(chunk, world.coord_of(index), observer, view_distance)
                })
                .collect()
        };

        debug!(
            "Visibility: {} blocks from {} chunks in {:?} (parallel: {})",
            visible.len(),
            chunks.len(),
            start.elapsed(),
            self.parallel
        );

        visible
    }
}

/// Whether any cell of the chunk column could be within range. Padded by
/// one block so it never rejects a block the exact test would accept.
fn chunk_in_range(coord: ChunkCoord, observer: Vec3, view_distance: f32) -> bool {
    let min = coord.origin().as_vec3();
    let extent = IVec3::new(CHUNK_WIDTH - 1, CHUNK_DEPTH - 1, CHUNK_HEIGHT - 1);
    let max = min + extent.as_vec3();
    let closest = observer.clamp(min, max);
    observer.distance(closest) <= view_distance + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stone() -> Block {
        Block::new(2, "Stone", "stone", false, 2, false, 0.6)
    }

    fn fill(chunk: &mut Chunk, min: IVec3, max: IVec3) {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    chunk.set_block(x, y, z, stone()).unwrap();
                }
            }
        }
    }

    fn positions(visible: &[VisibleBlock]) -> Vec<IVec3> {
        visible.iter().map(|v| v.position).collect()
    }

    #[test]
    fn test_observer_out_of_range() {
        let world = World::new(1, 0, "t").unwrap();
        let visible = compute_visible_blocks(&world, Vec3::new(8.0, 8.0, 5.0), 3.0);
        assert!(visible.is_empty());
    }

    #[test]
    fn test_observer_near_default_floor() {
        let world = World::new(1, 0, "t").unwrap();
        let visible = compute_visible_blocks(&world, Vec3::new(8.0, 8.0, 2.0), 3.0);

        assert_eq!(visible.len(), 21);
        for entry in &visible {
            assert_eq!(*entry.block, Block::dirt());
            assert_eq!(entry.position.z, 0);
            let dx = entry.position.x - 8;
            let dy = entry.position.y - 8;
            assert!(dx * dx + dy * dy <= 5);
        }
    }

    #[test]
    fn test_enclosed_block_is_occluded() {
        let mut chunk = Chunk::empty();
        fill(&mut chunk, IVec3::new(4, 4, 4), IVec3::new(6, 6, 6));

        assert!(is_occluded(&chunk, 5, 5, 5));
        assert!(!is_occluded(&chunk, 4, 5, 5));

        let visible = visible_blocks_in_chunk(&chunk, ChunkCoord::new(0, 0), Vec3::splat(5.0), 1000.0);
        assert_eq!(visible.len(), 26);
        assert!(!positions(&visible).contains(&IVec3::new(5, 5, 5)));
    }

    #[test]
    fn test_transparent_neighbours_occlude() {
        let glass = Arc::new(Block::new(20, "Glass", "glass", false, 0, true, 0.4));
        let mut chunk = Chunk::empty();
        chunk.set_block(5, 5, 5, Block::dirt()).unwrap();
        for face in BlockFace::ALL {
            let n = IVec3::new(5, 5, 5) + face.offset();
            chunk.set_block(n.x, n.y, n.z, Arc::clone(&glass)).unwrap();
        }

        assert!(is_occluded(&chunk, 5, 5, 5));

        let visible = visible_blocks_in_chunk(&chunk, ChunkCoord::new(0, 0), Vec3::splat(5.0), 10.0);
        assert_eq!(visible.len(), 6);
        assert!(!positions(&visible).contains(&IVec3::new(5, 5, 5)));
        assert!(visible.iter().all(|entry| entry.block.is_transparent()));
        assert!(visible.iter().all(|entry| Arc::ptr_eq(&entry.block, &glass)));
    }

    #[test]
    fn test_single_missing_neighbour_exposes() {
        let mut chunk = Chunk::empty();
        fill(&mut chunk, IVec3::new(4, 4, 4), IVec3::new(6, 6, 6));

        for face in BlockFace::ALL {
            let mut opened = chunk.clone();
            let n = IVec3::new(5, 5, 5) + face.offset();
            opened.remove_block(n.x, n.y, n.z).unwrap();
            assert!(!is_occluded(&opened, 5, 5, 5), "{face:?} opened but still occluded");
        }
    }

    #[test]
    fn test_chunk_edges_are_exposed() {
        let mut chunk = Chunk::empty();
        fill(&mut chunk, IVec3::new(0, 0, 0), IVec3::new(15, 15, 255));

        assert!(is_occluded(&chunk, 7, 7, 100));
        assert!(!is_occluded(&chunk, 7, 7, 255));
        assert!(!is_occluded(&chunk, 7, 7, 0));
        assert!(!is_occluded(&chunk, 0, 7, 100));
        assert!(!is_occluded(&chunk, 15, 7, 100));
        assert!(!is_occluded(&chunk, 7, 0, 100));
        assert!(!is_occluded(&chunk, 7, 15, 100));
    }

    #[test]
    fn test_top_layer_exposed_upwards_only() {
        let mut chunk = Chunk::empty();
        fill(&mut chunk, IVec3::new(6, 6, 254), IVec3::new(8, 8, 255));
        assert!(!is_occluded(&chunk, 7, 7, 255));

        let visible = visible_blocks_in_chunk(&chunk, ChunkCoord::new(0, 0), Vec3::new(7.0, 7.0, 300.0), 50.0);
        assert!(positions(&visible).contains(&IVec3::new(7, 7, 255)));
    }

    #[test]
    fn test_chunks_do_not_occlude_each_other() {
        let mut world = World::new(2, 0, "t").unwrap();

        let mut left = Chunk::empty();
        fill(&mut left, IVec3::new(13, 4, 4), IVec3::new(15, 6, 6));
        let mut right = Chunk::empty();
        fill(&mut right, IVec3::new(0, 4, 4), IVec3::new(2, 6, 6));
        world.set_chunk(0, 0, left).unwrap();
        world.set_chunk(1, 0, right).unwrap();

        assert!(!is_occluded(world.chunk_at(0, 0).unwrap(), 15, 5, 5));
        assert!(!is_occluded(world.chunk_at(1, 0).unwrap(), 0, 5, 5));

        let visible = compute_visible_blocks(&world, Vec3::new(16.0, 5.0, 5.0), 100.0);
        let positions = positions(&visible);
        assert!(positions.contains(&IVec3::new(15, 5, 5)));
        assert!(positions.contains(&IVec3::new(16, 5, 5)));
        assert!(!positions.contains(&IVec3::new(14, 5, 5)));
        assert!(!positions.contains(&IVec3::new(17, 5, 5)));
    }

    #[test]
    fn test_range_is_monotonic() {
        let mut world = World::new(2, 0, "t").unwrap();
        for z in 1..20 {
            world.set_block(10 + z % 7, 12, z, stone()).unwrap();
        }
        let observer = Vec3::new(12.5, 11.0, 6.0);

        let mut previous: Vec<IVec3> = Vec::new();
        for step in 0..40 {
            let current = positions(&compute_visible_blocks(&world, observer, step as f32 * 0.75));
            assert!(previous.iter().all(|pos| current.contains(pos)));
            previous = current;
        }
    }

    #[test]
    fn test_distance_uses_block_position() {
        let world = World::new(1, 0, "t").unwrap();
        let visible = compute_visible_blocks(&world, Vec3::new(3.0, 3.0, 0.0), 0.0);
        assert_eq!(positions(&visible), vec![IVec3::new(3, 3, 0)]);
    }

    #[test]
    fn test_degenerate_view_distance() {
        let world = World::new(1, 0, "t").unwrap();
        let observer = Vec3::new(8.0, 8.0, 0.0);
        assert!(compute_visible_blocks(&world, observer, -1.0).is_empty());
        assert!(compute_visible_blocks(&world, observer, f32::NAN).is_empty());
        assert_eq!(compute_visible_blocks(&world, observer, f32::INFINITY).len(), 256);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut world = World::new(3, 0, "t").unwrap();
        let mut tower = Chunk::new();
        fill(&mut tower, IVec3::new(2, 2, 0), IVec3::new(9, 9, 12));
        world.set_chunk(1, 2, tower).unwrap();

        let observer = Vec3::new(20.0, 30.0, 4.0);
        let sequential = VisibilityEngine::sequential().compute(&world, observer, 25.0);
        let parallel = VisibilityEngine::new(true).compute(&world, observer, 25.0);

        assert!(!sequential.is_empty());
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_output_order() {
        let world = World::new(2, 0, "t").unwrap();
        let visible = compute_visible_blocks(&world, Vec3::new(16.0, 16.0, 0.0), 2.0);
        let positions = positions(&visible);
        assert_eq!(positions.first(), Some(&IVec3::new(15, 15, 0)));
        assert_eq!(positions.last(), Some(&IVec3::new(18, 16, 0)));
    }
}
