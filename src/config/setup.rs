use std::{error::Error, fs::File, io::Read, path::Path};

use log::info;
use nalgebra::Point3;

use crate::{
    error::GeometryResult,
    geometry::{
        capsule::{compose_capsule_with_segments, CapsuleEnds},
        helix::{build_helix, HelixParams},
        tube::Tube,
        DEFAULT_RADIAL_SEGMENTS,
    },
    scene::{Scene, SceneNode},
};

fn default_radial_segments() -> u32 {
    DEFAULT_RADIAL_SEGMENTS
}

fn default_shadows() -> bool {
    true
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct TubeConfig {
    pub top: Point3<f64>,
    pub bottom: Point3<f64>,
    pub radius_top: f64,
    pub radius_bottom: f64,
    #[serde(default = "default_radial_segments")]
    pub radial_segments: u32,
    #[serde(default)]
    pub open_ended: bool,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct CapsuleConfig {
    pub top: Point3<f64>,
    pub bottom: Point3<f64>,
    pub radius: f64,
    #[serde(flatten)]
    pub ends: CapsuleEnds,
    #[serde(default = "default_radial_segments")]
    pub radial_segments: u32,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum ObjectConfig {
    Tube(TubeConfig),
    Capsule(CapsuleConfig),
    Helix(HelixParams),
}

impl ObjectConfig {
    pub fn to_node(&self, label: String) -> GeometryResult<SceneNode> {
        match self {
            ObjectConfig::Tube(t) => {
                let tube = Tube::between(t.top, t.bottom, t.radius_top, t.radius_bottom)?
                    .with_radial_segments(t.radial_segments)?
                    .open_ended(t.open_ended);
                Ok(tube.into())
            }
            ObjectConfig::Capsule(c) => Ok(compose_capsule_with_segments(
                c.top,
                c.bottom,
                c.radius,
                c.ends,
                c.radial_segments,
            )?
            .to_node(label)),
            ObjectConfig::Helix(params) => Ok(build_helix(params)?.to_node(label)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ObjectConfig::Tube(_) => "tube",
            ObjectConfig::Capsule(_) => "capsule",
            ObjectConfig::Helix(_) => "helix",
        }
    }
}

/// Everything a scene file describes.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct SceneConfig {
    #[serde(default = "default_shadows")]
    pub shadows: bool,
    pub objects: Vec<ObjectConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            shadows: true,
            objects: vec![ObjectConfig::Helix(HelixParams::default())],
        }
    }
}

impl SceneConfig {
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, Box<dyn Error>> {
        let config: SceneConfig = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    pub fn build_scene(&self) -> GeometryResult<Scene> {
        let nodes = self
            .objects
            .iter()
            .enumerate()
            .map(|(i, o)| o.to_node(format!("{}-{}", o.kind(), i)))
            .collect::<GeometryResult<Vec<_>>>()?;
        Ok(Scene { nodes })
    }

    pub fn helices(&self) -> impl Iterator<Item = &HelixParams> {
        self.objects.iter().filter_map(|o| match o {
            ObjectConfig::Helix(p) => Some(p),
            _ => None,
        })
    }

    /// A copy with every helix passed through `f`.
    pub fn map_helices<F>(&self, f: F) -> Self
    where
        F: Fn(HelixParams) -> HelixParams,
    {
        let objects = self
            .objects
            .iter()
            .map(|o| match o {
                ObjectConfig::Helix(p) => ObjectConfig::Helix(f(*p)),
                other => other.clone(),
            })
            .collect();
        SceneConfig {
            objects,
            ..self.clone()
        }
    }

    pub fn with_shadows(&self, shadows: bool) -> Self {
        SceneConfig {
            shadows,
            ..self.clone()
        }
    }

    pub fn print(&self) {
        info!(
            "Scene: {} objects, shadows {}",
            self.objects.len(),
            if self.shadows { "on" } else { "off" }
        );
        for (i, object) in self.objects.iter().enumerate() {
            match object {
                ObjectConfig::Tube(t) => println!(
                    "{i}: tube {} -> {}, radius {} -> {}",
                    t.bottom, t.top, t.radius_bottom, t.radius_top
                ),
                ObjectConfig::Capsule(c) => println!(
                    "{i}: capsule {} -> {}, radius {}{}{}",
                    c.bottom,
                    c.top,
                    c.radius,
                    if c.ends.open_top { ", open top" } else { "" },
                    if c.ends.open_bottom { ", open bottom" } else { "" },
                ),
                ObjectConfig::Helix(h) => println!(
                    "{i}: helix radius {}, tube radius {}, {} turns over height {}, {} samples, {}",
                    h.radius,
                    h.tube_radius,
                    h.turns,
                    h.height,
                    h.n_samples(),
                    if h.clockwise {
                        "clockwise"
                    } else {
                        "counterclockwise"
                    }
                ),
            }
        }
    }
}
