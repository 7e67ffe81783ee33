use std::error::Error;

use bevy::{
    diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin},
    prelude::*,
};
use clap::Parser;
use tubechain::{
    config::{setup::SceneConfig, snapshot::SceneSnapshot},
    view::{
        common::{add_axis_arrows, close_on_esc},
        pan_orbit_camera::{add_camera, pan_orbit_camera_update},
        scene::{
            add_light, add_materials, handle_scene_keys, rebuild_scene, MeshCache,
            SceneViewState,
        },
    },
};

#[derive(Debug, clap::Parser)]
#[command(
    name = "view_scene",
    about = "View a scene of tubes, capsules and helices..."
)]
struct ViewCli {
    /// YAML scene file. Without one a single default helix is shown.
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    #[arg(long = "no-shadows")]
    pub no_shadows: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = ViewCli::parse();

    let mut config = match &args.config {
        Some(path) => SceneConfig::parse(path)?,
        None => SceneConfig::default(),
    };
    if args.no_shadows {
        config.shadows = false;
    }
    config.print();
    // Fail before opening a window if the scene cannot be built.
    config.build_scene()?;

    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins((
            LogDiagnosticsPlugin::default(),
            FrameTimeDiagnosticsPlugin,
        ))
        .insert_resource(SceneViewState::new(SceneSnapshot::new(config)))
        .insert_resource(MeshCache::default())
        .add_systems(Startup, (add_camera, add_light, add_materials, add_axis_arrows))
        .add_systems(Update, pan_orbit_camera_update)
        .add_systems(Update, (handle_scene_keys, rebuild_scene).chain())
        .add_systems(Update, close_on_esc)
        .run();
    Ok(())
}
