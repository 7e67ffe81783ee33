use std::{ops::Deref, sync::Arc};

use log::info;

use super::setup::SceneConfig;

/// Smallest helix turn count the interactive controls will go down to.
pub const MIN_TURNS: f64 = 0.25;

/// An immutable, cheaply shared view of a scene configuration.
///
/// Every edit produces a new snapshot; holders of the old one keep seeing it
/// unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSnapshot(Arc<SceneConfig>);

impl SceneSnapshot {
    pub fn new(config: SceneConfig) -> Self {
        SceneSnapshot(Arc::new(config))
    }

    pub fn config(&self) -> &SceneConfig {
        &self.0
    }

    pub fn same_as(&self, other: &SceneSnapshot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Add `delta` turns to every helix, never going below `MIN_TURNS`.
    pub fn step_turns(&self, delta: f64) -> Self {
        let next = self.0.map_helices(|h| h.with_turns((h.turns + delta).max(MIN_TURNS)));
        info!("Helix turns now {:?}", next.helices().map(|h| h.turns).collect::<Vec<_>>());
        SceneSnapshot::new(next)
    }

    pub fn toggle_chirality(&self) -> Self {
        SceneSnapshot::new(self.0.map_helices(|h| h.with_clockwise(!h.clockwise)))
    }

    pub fn toggle_shadows(&self) -> Self {
        let next = self.0.with_shadows(!self.0.shadows);
        info!("Shadows {}", if next.shadows { "on" } else { "off" });
        SceneSnapshot::new(next)
    }
}

impl Deref for SceneSnapshot {
    type Target = SceneConfig;

    fn deref(&self) -> &SceneConfig {
        &self.0
    }
}

impl From<SceneConfig> for SceneSnapshot {
    fn from(config: SceneConfig) -> Self {
        SceneSnapshot::new(config)
    }
}
