//! Pyramid geometry and instance placement.
//!
//! A [`Scene`] knows where every pyramid goes and produces one [`DrawCommand`] per instance. All
//! commands point at the same mesh through a [`MeshId`]; the geometry is uploaded once.

use glam::{Mat4, Vec3};
use serde::Deserialize;

use crate::abs::PositionVertex;

pub const PYRAMID_VERTICES: [PositionVertex; 4] = [
    PositionVertex {
        position: Vec3::new(-1.0, -1.0, 0.0),
    },
    PositionVertex {
        position: Vec3::new(0.0, -1.0, 1.0),
    },
    PositionVertex {
        position: Vec3::new(1.0, -1.0, 0.0),
    },
    // apex
    PositionVertex {
        position: Vec3::new(0.0, 1.0, 0.0),
    },
];

#[rustfmt::skip]
pub const PYRAMID_INDICES: [u32; 12] = [
    0, 3, 1,
    1, 3, 2,
    2, 3, 0,
    0, 1, 2, // base
];

pub const ORBIT_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, -2.5),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

/// Degrees of rotation added per instance index.
pub const ORBIT_ROTATION_STEP: f32 = 2.0;
pub const ORBIT_ROTATION_AXIS: Vec3 = Vec3::new(1.0, 0.3, 0.5);
pub const ORBIT_SCALE: Vec3 = Vec3::new(0.8, 0.8, 1.0);

pub const SINGLE_POSITION: Vec3 = Vec3::new(0.0, 0.0, -2.5);
pub const SINGLE_SCALE: Vec3 = Vec3::new(0.4, 0.4, 1.0);

/// Which of the two demo layouts to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Ten rotated pyramids seen through the drag camera.
    #[default]
    Orbit,
    /// One pyramid, no camera.
    Single,
}

impl Variant {
    /// Whether the mouse drag camera drives the view matrix.
    pub fn has_camera(self) -> bool {
        matches!(self, Variant::Orbit)
    }
}

/// Handle to a mesh owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

/// A single draw call: which mesh, and where to put it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshId,
    pub model: Mat4,
}

pub struct Scene {
    pub variant: Variant,
    pub mesh: MeshId,
    positions: Vec<Vec3>,
}

impl Scene {
    pub fn new(variant: Variant, mesh: MeshId) -> Self {
        let positions = match variant {
            Variant::Orbit => ORBIT_POSITIONS.to_vec(),
            Variant::Single => vec![SINGLE_POSITION],
        };
        Self {
            variant,
            mesh,
            positions,
        }
    }

    pub fn instance_count(&self) -> usize {
        self.positions.len()
    }

    /// Model matrix of instance `index`.
    pub fn model_matrix(&self, index: usize) -> Mat4 {
        let position = self.positions[index];
        match self.variant {
            // scale, then rotate, then move into place
            Variant::Orbit => {
                Mat4::from_translation(position)
                    * Mat4::from_axis_angle(
                        ORBIT_ROTATION_AXIS.normalize(),
                        (ORBIT_ROTATION_STEP * index as f32).to_radians(),
                    )
                    * Mat4::from_scale(ORBIT_SCALE)
            }
            // translation happens first, so the offset is scaled too
            Variant::Single => Mat4::from_scale(SINGLE_SCALE) * Mat4::from_translation(position),
        }
    }

    pub fn draw_commands(&self) -> impl Iterator<Item = DrawCommand> + '_ {
        (0..self.positions.len()).map(|i| DrawCommand {
            mesh: self.mesh,
            model: self.model_matrix(i),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    const EPS: f32 = 1e-5;

    #[test]
    fn pyramid_has_four_triangles_over_four_vertices() {
        assert_eq!(PYRAMID_INDICES.len(), 4 * 3);
        assert!(PYRAMID_INDICES.iter().all(|&i| (i as usize) < PYRAMID_VERTICES.len()));
        for v in 0..PYRAMID_VERTICES.len() as u32 {
            assert!(PYRAMID_INDICES.contains(&v), "vertex {v} unused");
        }
        for triangle in PYRAMID_INDICES.chunks(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]];
            assert!(a != b && b != c && a != c, "degenerate triangle {triangle:?}");
        }
    }

    #[test]
    fn orbit_scene_has_ten_instances_sharing_one_mesh() {
        let scene = Scene::new(Variant::Orbit, MeshId(3));
        assert_eq!(scene.instance_count(), 10);
        let commands: Vec<_> = scene.draw_commands().collect();
        assert_eq!(commands.len(), 10);
        assert!(commands.iter().all(|c| c.mesh == MeshId(3)));
    }

    #[test]
    fn orbit_model_matrix_decomposes() {
        let scene = Scene::new(Variant::Orbit, MeshId(0));
        for (i, position) in ORBIT_POSITIONS.iter().enumerate() {
            let (scale, rotation, translation) =
                scene.model_matrix(i).to_scale_rotation_translation();
            assert!(scale.abs_diff_eq(ORBIT_SCALE, EPS), "instance {i}: scale {scale}");
            assert!(
                translation.abs_diff_eq(*position, EPS),
                "instance {i}: translation {translation}"
            );

            let expected = Quat::from_axis_angle(
                ORBIT_ROTATION_AXIS.normalize(),
                (2.0 * i as f32).to_radians(),
            );
            assert!(
                rotation.dot(expected).abs() > 1.0 - EPS,
                "instance {i}: rotation {rotation} != {expected}"
            );
        }
    }

    #[test]
    fn orbit_scale_is_applied_in_object_space() {
        let scene = Scene::new(Variant::Orbit, MeshId(0));
        // instance 0 has no rotation
        let apex = scene.model_matrix(0).transform_point3(Vec3::new(0.0, 1.0, 0.0));
        assert!(apex.abs_diff_eq(Vec3::new(0.0, 0.8, -2.5), EPS));
    }

    #[test]
    fn single_scene_scales_after_translating() {
        let scene = Scene::new(Variant::Single, MeshId(0));
        assert_eq!(scene.instance_count(), 1);
        assert!(!scene.variant.has_camera());

        let origin = scene.model_matrix(0).transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(SINGLE_POSITION * SINGLE_SCALE, EPS));
    }

    #[test]
    fn variant_names() {
        assert_eq!(serde_json::from_str::<Variant>("\"orbit\"").unwrap(), Variant::Orbit);
        assert_eq!(serde_json::from_str::<Variant>("\"single\"").unwrap(), Variant::Single);
        assert!(serde_json::from_str::<Variant>("\"spin\"").is_err());
        assert_eq!(Variant::default(), Variant::Orbit);
    }
}
