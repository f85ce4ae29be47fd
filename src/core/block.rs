use once_cell::sync::Lazy;
use std::sync::Arc;

/// Template for the block every fresh chunk is floored with.
static DIRT: Lazy<Arc<Block>> = Lazy::new(|| {
    Arc::new(Block {
        id: 1,
        name: "Dirt".to_string(),
        block_type: "dirt".to_string(),
        interact: false,
        drop_id: 1,
        transparent: false,
        friction: 0.5,
    })
});

/// A single voxel type and its physical properties.
///
/// Blocks are plain values: two blocks with equal fields are interchangeable.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: u32,
    pub name: String,
    pub block_type: String,
    pub interact: bool,
    pub drop_id: u32,
    pub transparent: bool,
    pub friction: f32,
}

impl Block {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        block_type: impl Into<String>,
        interact: bool,
        drop_id: u32,
        transparent: bool,
        friction: f32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            block_type: block_type.into(),
            interact,
            drop_id,
            transparent,
            friction,
        }
    }

    pub fn dirt() -> Self {
        Block::clone(&DIRT)
    }

    /// The Dirt template itself; every call returns the same instance.
    pub fn shared_dirt() -> Arc<Block> {
        Arc::clone(&DIRT)
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    pub fn is_interactive(&self) -> bool {
        self.interact
    }
}
