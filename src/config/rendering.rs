use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub view_distance: f32,
    /// Spread the visibility scan across chunks on the rayon pool.
    pub parallel: bool,
    /// Reuse the previous frame's draw set while nothing has changed.
    pub cache: bool,
    /// Starting observer position in world block space.
    pub observer: [f32; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            view_distance: 32.0,
            parallel: true,
            cache: true,
            observer: [8.0, 8.0, 2.0],
        }
    }
}
