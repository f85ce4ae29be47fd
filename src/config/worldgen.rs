use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub size: i32,
    /// Carried for a future generator, unused today.
    pub seed: u64,
    pub name: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 4,
            seed: 0,
            name: "world".to_string(),
        }
    }
}
