use std::f32::consts::FRAC_PI_2;

use bevy::{
    color::palettes::css::{self},
    prelude::*,
};
use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::geometry::placement::TubePlacement;

pub fn close_on_esc(
    mut commands: Commands,
    focused_windows: Query<(Entity, &Window)>,
    input: Res<ButtonInput<KeyCode>>,
) {
    for (window, focus) in focused_windows.iter() {
        if !focus.focused {
            continue;
        }

        if input.just_pressed(KeyCode::Escape) {
            commands.entity(window).despawn();
        }
    }
}

pub fn vec3_to_gvec3(v: &Vector3<f64>) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

pub fn point3_to_gvec3(v: &Point3<f64>) -> Vec3 {
    vec3_to_gvec3(&v.coords)
}

pub fn quat_to_gquat(q: &UnitQuaternion<f64>) -> Quat {
    let c = q.quaternion().coords;
    Quat::from_xyzw(c.x as f32, c.y as f32, c.z as f32, c.w as f32).normalize()
}

/// Places a mesh built around the origin along +y onto the tube's segment.
pub fn placement_transform(placement: &TubePlacement) -> Transform {
    Transform::from_translation(vec3_to_gvec3(&placement.translation))
        .with_rotation(quat_to_gquat(&placement.unit_quaternion()))
}

#[derive(Component)]
pub struct ArrowMesh;

pub fn spawn_arrow(
    parent: &mut ChildBuilder,
    meshes: &mut ResMut<Assets<Mesh>>,
    material: Handle<StandardMaterial>,
) {
    let transform_mesh = Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2));
    let head_height = 0.5;
    let head: Handle<Mesh> = meshes.add(
        Cone {
            radius: 0.5,
            height: head_height,
        }
        .mesh()
        .resolution(16)
        .build(),
    );
    let cylinder_height = 2.0;
    let cylinder: Handle<Mesh> = meshes.add(
        Cylinder::new(0.3, cylinder_height)
            .mesh()
            .resolution(16)
            .build(),
    );

    parent.spawn((
        Mesh3d(head),
        MeshMaterial3d(material.clone()),
        // The cone's origin is at its centre, so push it past the shaft end.
        transform_mesh.with_translation(-Vec3::Z * (cylinder_height + head_height / 2.0)),
        ArrowMesh,
    ));
    parent.spawn((
        Mesh3d(cylinder),
        MeshMaterial3d(material),
        // The cylinder's origin is at its centre, so translate it forward
        // by half its length to make its origin be its base.
        transform_mesh.with_translation(-Vec3::Z * cylinder_height / 2.0),
        ArrowMesh,
    ));
}

pub fn add_axis_arrows(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (ax, color) in [
        (Vec3::X, Color::from(css::RED)),
        (Vec3::Y, Color::from(css::GREEN)),
        (Vec3::Z, Color::from(css::BLUE)),
    ] {
        commands
            .spawn((
                Transform::default()
                    .looking_to(ax, if ax == Vec3::Y { Vec3::Z } else { Vec3::Y })
                    .with_scale(Vec3::splat(10.0)),
                Visibility::default(),
            ))
            .with_children(|parent| {
                spawn_arrow(
                    parent,
                    &mut meshes,
                    materials.add(StandardMaterial::from(color)),
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::placement::compute_tube_placement;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_transform_matches_placement() {
        let top = Point3::new(200.0, 200.0, 200.0);
        let bottom = Point3::new(0.0, 0.0, 0.0);
        let placement = compute_tube_placement(top, bottom).unwrap();
        let transform = placement_transform(&placement);
        let half = placement.length as f32 / 2.0;
        let g_top = transform.transform_point(Vec3::new(0.0, half, 0.0));
        let g_bottom = transform.transform_point(Vec3::new(0.0, -half, 0.0));
        for (g, p) in [(g_top, top), (g_bottom, bottom)] {
            assert_abs_diff_eq!(g.x, p.x as f32, epsilon = 1e-2);
            assert_abs_diff_eq!(g.y, p.y as f32, epsilon = 1e-2);
            assert_abs_diff_eq!(g.z, p.z as f32, epsilon = 1e-2);
        }
    }
}
