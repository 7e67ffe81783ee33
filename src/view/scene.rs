use bevy::{color::palettes::css, pbr::NotShadowCaster, prelude::*, render::mesh::SphereKind};

use super::common::{placement_transform, point3_to_gvec3};
use crate::{
    config::snapshot::SceneSnapshot,
    geometry::{cache::GeometryCache, sphere::Sphere, tube::Tube},
    scene::{Group, NodeVisitor, ShadowVisitor},
};

/// Helix turns added or removed per key press.
pub const TURN_STEP: f64 = 0.25;

// Resources.

/// The snapshot to show, and the one currently on screen.
#[derive(Resource)]
pub struct SceneViewState {
    pub current: SceneSnapshot,
    pub rendered: Option<SceneSnapshot>,
}

impl SceneViewState {
    pub fn new(snapshot: SceneSnapshot) -> Self {
        Self {
            current: snapshot,
            rendered: None,
        }
    }

    pub fn is_stale(&self) -> bool {
        match &self.rendered {
            Some(r) => !r.same_as(&self.current),
            None => true,
        }
    }

    pub fn mark_fresh(&mut self) {
        self.rendered = Some(self.current.clone());
    }
}

#[derive(Resource, Default)]
pub struct MeshCache(pub GeometryCache<Handle<Mesh>>);

#[derive(Resource)]
pub struct SceneMaterials {
    pub tube: Handle<StandardMaterial>,
    pub cap: Handle<StandardMaterial>,
}

// Components.

/// Top-level entity of the rendered scene; despawned on rebuild.
#[derive(Component)]
pub struct RenderedRoot;

#[derive(Component)]
pub struct SceneLight;

pub fn add_materials(mut commands: Commands, mut materials: ResMut<Assets<StandardMaterial>>) {
    commands.insert_resource(SceneMaterials {
        tube: materials.add(StandardMaterial {
            base_color: Color::from(css::STEEL_BLUE),
            perceptual_roughness: 0.6,
            ..default()
        }),
        cap: materials.add(StandardMaterial {
            base_color: Color::from(css::ORANGE),
            perceptual_roughness: 0.6,
            ..default()
        }),
    });
}

pub fn add_light(mut commands: Commands, view_state: Res<SceneViewState>) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: view_state.current.shadows,
            illuminance: bevy::pbr::light_consts::lux::OVERCAST_DAY,
            ..default()
        },
        Transform::from_xyz(200.0, 400.0, 300.0).looking_at(Vec3::ZERO, Vec3::Y),
        SceneLight,
    ));
}

pub fn tube_mesh(tube: &Tube) -> Mesh {
    let length = tube.length() as f32;
    if tube.is_cylinder() {
        let builder = Cylinder::new(tube.radius_top as f32, length)
            .mesh()
            .resolution(tube.radial_segments);
        if tube.open_ended {
            builder.without_caps().build()
        } else {
            builder.build()
        }
    } else {
        ConicalFrustum {
            radius_top: tube.radius_top as f32,
            radius_bottom: tube.radius_bottom as f32,
            height: length,
        }
        .mesh()
        .resolution(tube.radial_segments)
        .build()
    }
}

pub fn sphere_mesh(sphere: &Sphere) -> Mesh {
    bevy::math::primitives::Sphere::new(sphere.radius as f32)
        .mesh()
        .kind(SphereKind::Uv {
            sectors: sphere.width_segments,
            stacks: sphere.height_segments,
        })
        .build()
}

/// Spawns one entity per scene node, parenting primitives under their groups.
struct SpawnVisitor<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a mut Assets<Mesh>,
    cache: &'a mut GeometryCache<Handle<Mesh>>,
    materials: &'a SceneMaterials,
    shadows: ShadowVisitor,
    parents: Vec<Entity>,
}

impl SpawnVisitor<'_, '_, '_> {
    fn attach(&mut self, entity: Entity) {
        match self.parents.last() {
            Some(&parent) => {
                self.commands.entity(parent).add_child(entity);
            }
            None => {
                self.commands.entity(entity).insert(RenderedRoot);
            }
        }
    }

    fn spawn_primitive(
        &mut self,
        mesh: Handle<Mesh>,
        material: Handle<StandardMaterial>,
        transform: Transform,
        casts_shadow: bool,
    ) {
        let mut entity = self
            .commands
            .spawn((Mesh3d(mesh), MeshMaterial3d(material), transform));
        if !casts_shadow {
            entity.insert(NotShadowCaster);
        }
        let id = entity.id();
        self.attach(id);
    }
}

impl NodeVisitor for SpawnVisitor<'_, '_, '_> {
    fn visit_tube(&mut self, tube: &Tube) {
        let mesh = match tube.primitive_key() {
            Some(key) => {
                let meshes = &mut *self.meshes;
                self.cache
                    .get_or_insert_with(key, |_| meshes.add(tube_mesh(tube)))
            }
            None => self.meshes.add(tube_mesh(tube)),
        };
        let casts = self.shadows.should_cast(tube);
        self.shadows.visit_tube(tube);
        self.spawn_primitive(
            mesh,
            self.materials.tube.clone(),
            placement_transform(&tube.placement),
            casts,
        );
    }

    fn visit_sphere(&mut self, sphere: &Sphere) {
        let meshes = &mut *self.meshes;
        let mesh = self
            .cache
            .get_or_insert_with(sphere.primitive_key(), |_| meshes.add(sphere_mesh(sphere)));
        let casts = self.shadows.should_cast(sphere);
        self.shadows.visit_sphere(sphere);
        self.spawn_primitive(
            mesh,
            self.materials.cap.clone(),
            Transform::from_translation(point3_to_gvec3(&sphere.centre)),
            casts,
        );
    }

    fn enter_group(&mut self, group: &Group) {
        let id = self
            .commands
            .spawn((
                Name::new(group.label.clone()),
                Transform::default(),
                Visibility::default(),
            ))
            .id();
        self.attach(id);
        self.parents.push(id);
    }

    fn leave_group(&mut self, _group: &Group) {
        self.parents.pop();
    }
}

/// Replaces the rendered scene whenever the snapshot has changed.
pub fn rebuild_scene(
    mut commands: Commands,
    mut view_state: ResMut<SceneViewState>,
    mut cache: ResMut<MeshCache>,
    mut meshes: ResMut<Assets<Mesh>>,
    materials: Res<SceneMaterials>,
    roots: Query<Entity, With<RenderedRoot>>,
    mut lights: Query<&mut DirectionalLight, With<SceneLight>>,
) {
    if !view_state.is_stale() {
        return;
    }
    let snapshot = view_state.current.clone();
    view_state.mark_fresh();

    let scene = match snapshot.build_scene() {
        Ok(scene) => scene,
        Err(e) => {
            warn!("Keeping previous scene, could not build new one: {}", e);
            return;
        }
    };

    for root in roots.iter() {
        commands.entity(root).despawn_recursive();
    }
    for mut light in lights.iter_mut() {
        light.shadows_enabled = snapshot.shadows;
    }

    let mut visitor = SpawnVisitor {
        commands: &mut commands,
        meshes: &mut meshes,
        cache: &mut cache.0,
        materials: &materials,
        shadows: ShadowVisitor::new(snapshot.shadows),
        parents: vec![],
    };
    scene.accept(&mut visitor);
    let shadows = visitor.shadows;
    // Handles for sizes the new scene no longer uses would pin their meshes.
    cache.0.prune_unused();
    info!(
        "Rebuilt scene: {} shadow casters, {} non-casters, {} shared meshes built so far",
        shadows.casters,
        shadows.non_casters,
        cache.0.n_built()
    );
}

/// `+`/`-` step helix turns, `C` flips chirality, `S` toggles shadows.
pub fn handle_scene_keys(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut view_state: ResMut<SceneViewState>,
) {
    let current = &view_state.current;
    let next = if keyboard_input.any_just_pressed([KeyCode::Equal, KeyCode::NumpadAdd]) {
        Some(current.step_turns(TURN_STEP))
    } else if keyboard_input.any_just_pressed([KeyCode::Minus, KeyCode::NumpadSubtract]) {
        Some(current.step_turns(-TURN_STEP))
    } else if keyboard_input.just_pressed(KeyCode::KeyC) {
        Some(current.toggle_chirality())
    } else if keyboard_input.just_pressed(KeyCode::KeyS) {
        Some(current.toggle_shadows())
    } else {
        None
    };
    if let Some(next) = next {
        view_state.current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::setup::SceneConfig,
        geometry::{
            cache::PrimitiveKey,
            helix::{build_helix, HelixParams},
        },
    };
    use nalgebra::Point3;

    #[test]
    fn test_staleness() {
        let mut state = SceneViewState::new(SceneSnapshot::new(SceneConfig::default()));
        assert!(state.is_stale());
        state.mark_fresh();
        assert!(!state.is_stale());
        state.current = state.current.toggle_shadows();
        assert!(state.is_stale());
    }

    #[test]
    fn test_helix_shares_meshes() {
        let mut cache: GeometryCache<usize> = GeometryCache::new();
        let chain = build_helix(&HelixParams::default()).unwrap();
        for capsule in &chain {
            let tube_key = capsule.tube.primitive_key().unwrap();
            cache.get_or_insert_with(tube_key, |_| 0);
            for cap in capsule.caps() {
                cache.get_or_insert_with(cap.primitive_key(), |_| 1);
            }
        }
        assert_eq!(cache.n_built(), 2);
        assert_eq!(
            cache.get_or_insert_with(PrimitiveKey::sphere(5.0, 24), |_| 9),
            1
        );
    }

    #[test]
    fn test_turn_change_releases_old_tube_mesh() {
        let mut cache: GeometryCache<usize> = GeometryCache::new();
        let params = HelixParams::default();
        for key in build_helix(&params).unwrap().primitive_keys() {
            cache.get_or_insert_with(key, |_| 0);
        }
        cache.prune_unused();

        let more = params.with_turns(params.turns + TURN_STEP);
        for key in build_helix(&more).unwrap().primitive_keys() {
            cache.get_or_insert_with(key, |_| 1);
        }
        // The longer chain has a new segment length but the same caps.
        assert_eq!(cache.prune_unused(), 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_meshes_build() {
        let tube = Tube::between(Point3::new(0.0, 300.0, 0.0), Point3::origin(), 50.0, 0.0)
            .unwrap()
            .with_radial_segments(8)
            .unwrap();
        assert!(tube_mesh(&tube).count_vertices() > 0);
        let open = Tube::cylinder(Point3::new(0.0, 3.0, 0.0), Point3::origin(), 1.0)
            .unwrap()
            .open_ended(true);
        let closed = open.open_ended(false);
        assert!(tube_mesh(&open).count_vertices() < tube_mesh(&closed).count_vertices());
        let sphere = Sphere::matching_tube(Point3::origin(), 1.0, 8);
        assert!(sphere_mesh(&sphere).count_vertices() > 0);
    }
}
