use std::collections::{HashMap, HashSet};

use log::debug;

// Lengths closer than this share tessellated geometry.
const KEY_RESOLUTION: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Tube,
    Sphere,
}

/// Identifies a tessellated primitive by shape and size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrimitiveKey {
    pub kind: PrimitiveKind,
    radius: i64,
    length: i64,
    pub radial_segments: u32,
}

fn quantize(x: f64) -> i64 {
    (x / KEY_RESOLUTION).round() as i64
}

impl PrimitiveKey {
    pub fn tube(radius: f64, length: f64, radial_segments: u32) -> Self {
        PrimitiveKey {
            kind: PrimitiveKind::Tube,
            radius: quantize(radius),
            length: quantize(length),
            radial_segments,
        }
    }

    pub fn sphere(radius: f64, radial_segments: u32) -> Self {
        PrimitiveKey {
            kind: PrimitiveKind::Sphere,
            radius: quantize(radius),
            length: 0,
            radial_segments,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius as f64 * KEY_RESOLUTION
    }

    pub fn length(&self) -> f64 {
        self.length as f64 * KEY_RESOLUTION
    }
}

/// Builds each distinct primitive once and hands out the stored value after.
pub struct GeometryCache<T> {
    entries: HashMap<PrimitiveKey, T>,
    // Keys asked for since the last prune.
    used: HashSet<PrimitiveKey>,
    n_built: usize,
}

impl<T> Default for GeometryCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            used: HashSet::new(),
            n_built: 0,
        }
    }
}

impl<T: Clone> GeometryCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_insert_with<F>(&mut self, key: PrimitiveKey, build: F) -> T
    where
        F: FnOnce(&PrimitiveKey) -> T,
    {
        self.used.insert(key);
        if let Some(v) = self.entries.get(&key) {
            return v.clone();
        }
        debug!("Building primitive {:?}", key);
        let v = build(&key);
        self.n_built += 1;
        self.entries.insert(key, v.clone());
        v
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of times a primitive had to be built.
    pub fn n_built(&self) -> usize {
        self.n_built
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.used.clear();
    }

    /// Drop every entry not asked for since the previous prune, returning how
    /// many went.
    pub fn prune_unused(&mut self) -> usize {
        let before = self.entries.len();
        let used = std::mem::take(&mut self.used);
        self.entries.retain(|k, _| used.contains(k));
        let dropped = before - self.entries.len();
        if dropped > 0 {
            debug!("Dropped {} unused primitives", dropped);
        }
        dropped
    }
}
