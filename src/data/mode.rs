use serde::{Deserialize, Serialize};

/// Which of the two layouts the scene is heading toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneMode {
    /// Dispersed sphere cloud
    #[default]
    Scattered,
    /// Cone-shaped tree
    Assembled,
}

impl SceneMode {
    pub fn from_assembled(assembled: bool) -> Self {
        if assembled {
            SceneMode::Assembled
        } else {
            SceneMode::Scattered
        }
    }

    pub fn is_assembled(self) -> bool {
        self == SceneMode::Assembled
    }

    pub fn toggled(self) -> Self {
        match self {
            SceneMode::Scattered => SceneMode::Assembled,
            SceneMode::Assembled => SceneMode::Scattered,
        }
    }

    /// Value the assembly factor settles on in this mode
    pub fn target_factor(self) -> f32 {
        match self {
            SceneMode::Scattered => 0.0,
            SceneMode::Assembled => 1.0,
        }
    }
}
