//! Orbit-drag camera.
//!
//! The [`Camera`] keeps an explicit orthonormal basis (direction, right, up) next to its yaw and
//! pitch, and builds its view matrix by hand from that basis. The [`DragController`] turns pointer
//! samples taken while the left mouse button is held into yaw/pitch offsets.

use glam::{Mat4, Vec2, Vec3, Vec4};

pub const WORLD_UP: Vec3 = Vec3::Y;
pub const MAX_PITCH: f32 = 89.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    direction: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Camera {
    /// Creates a camera at `position` looking at `target`.
    ///
    /// `yaw` and `pitch` are only used once the camera is first rotated; the initial basis comes
    /// from the target point.
    pub fn looking_at(position: Vec3, target: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            yaw,
            pitch,
            direction: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        };
        camera.rebuild_basis((target - position).normalize());
        camera
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Adds the offsets (in degrees) to yaw and pitch, clamps pitch and recomputes the basis.
    pub fn rotate(&mut self, yaw_offset: f32, pitch_offset: f32) {
        self.yaw += yaw_offset;
        self.pitch = (self.pitch + pitch_offset).clamp(-MAX_PITCH, MAX_PITCH);

        let yaw_rad = self.yaw.to_radians();
        let pitch_rad = self.pitch.to_radians();
        let direction = Vec3::new(
            yaw_rad.cos() * pitch_rad.cos(),
            pitch_rad.sin(),
            yaw_rad.sin() * pitch_rad.cos(),
        );
        self.rebuild_basis(direction.normalize());
    }

    fn rebuild_basis(&mut self, direction: Vec3) {
        self.direction = direction;
        self.right = direction.cross(WORLD_UP).normalize();
        self.up = self.right.cross(direction).normalize();
    }

    /// World to camera space: the rotation whose rows are right, up and -direction, applied after
    /// translating by -position.
    pub fn view(&self) -> Mat4 {
        let (r, u, d) = (self.right, self.up, self.direction);
        let rotation = Mat4::from_cols(
            Vec4::new(r.x, u.x, -d.x, 0.0),
            Vec4::new(r.y, u.y, -d.y, 0.0),
            Vec4::new(r.z, u.z, -d.z, 0.0),
            Vec4::W,
        );
        rotation * Mat4::from_translation(-self.position)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::looking_at(
            Vec3::new(1.0, 0.5, 2.0),
            Vec3::new(0.0, -0.3, -1.0),
            -90.0,
            -15.0,
        )
    }
}

/// Perspective projection parameters. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect_ratio, self.near, self.far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Tracks a drag gesture and feeds the pointer movement during it into a [`Camera`].
///
/// The first sample of every drag only primes the reference point, so releasing the button,
/// moving the pointer and pressing again never produces a jump.
#[derive(Debug, Clone)]
pub struct DragController {
    pub sensitivity: f32,
    dragging: bool,
    first_sample: bool,
    last: Vec2,
}

impl DragController {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            sensitivity,
            dragging: false,
            first_sample: true,
            last: Vec2::ZERO,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn press(&mut self) {
        self.dragging = true;
    }

    pub fn release(&mut self) {
        self.dragging = false;
        self.first_sample = true;
    }

    /// Feeds the current pointer position. Returns `true` if the camera was rotated.
    pub fn update(&mut self, pointer: Vec2, camera: &mut Camera) -> bool {
        if !self.dragging {
            self.first_sample = true;
            return false;
        }

        if self.first_sample {
            self.last = pointer;
            self.first_sample = false;
            return false;
        }

        // screen y grows downward
        let offset = Vec2::new(pointer.x - self.last.x, self.last.y - pointer.y) * self.sensitivity;
        self.last = pointer;

        camera.rotate(offset.x, offset.y);
        true
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;
    // near the pitch limit the basis is rebuilt from a short cross product
    const BASIS_EPS: f32 = 1e-4;

    fn assert_orthonormal(camera: &Camera) {
        let (d, r, u) = (camera.direction(), camera.right(), camera.up());
        assert!((d.length() - 1.0).abs() < BASIS_EPS, "direction length {}", d.length());
        assert!((r.length() - 1.0).abs() < BASIS_EPS, "right length {}", r.length());
        assert!((u.length() - 1.0).abs() < BASIS_EPS, "up length {}", u.length());
        assert!(d.dot(r).abs() < BASIS_EPS);
        assert!(d.dot(u).abs() < BASIS_EPS);
        assert!(r.dot(u).abs() < BASIS_EPS);
    }

    fn drag(controller: &mut DragController, camera: &mut Camera, path: &[(f32, f32)]) {
        controller.press();
        for &(x, y) in path {
            controller.update(Vec2::new(x, y), camera);
        }
        controller.release();
    }

    #[test]
    fn initial_basis_is_orthonormal() {
        let camera = Camera::default();
        assert_orthonormal(&camera);
        let expected = (Vec3::new(0.0, -0.3, -1.0) - Vec3::new(1.0, 0.5, 2.0)).normalize();
        assert!(camera.direction().abs_diff_eq(expected, EPS));
    }

    #[test]
    fn basis_stays_orthonormal_while_dragging() {
        let mut camera = Camera::default();
        let mut controller = DragController::default();
        controller.press();

        let mut x = 400.0_f32;
        let mut y = 300.0_f32;
        for i in 0..500 {
            // deterministic zig-zag with some large jumps
            let step = (i % 17) as f32 * 13.0 - 100.0;
            x += step;
            y -= step * 0.7 + if i % 50 == 0 { 4000.0 } else { 0.0 };
            controller.update(Vec2::new(x, y), &mut camera);
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::default();
        let mut controller = DragController::default();

        drag(&mut controller, &mut camera, &[(0.0, 0.0), (0.0, -100_000.0)]);
        assert_eq!(camera.pitch, MAX_PITCH);
        assert_orthonormal(&camera);

        drag(&mut controller, &mut camera, &[(0.0, 0.0), (0.0, 100_000.0)]);
        assert_eq!(camera.pitch, -MAX_PITCH);
        assert_orthonormal(&camera);

        camera.rotate(0.0, 1.0e9);
        assert_eq!(camera.pitch, MAX_PITCH);
    }

    #[test]
    fn horizontal_drag_changes_only_yaw() {
        let mut camera = Camera::default();
        let mut controller = DragController::new(0.1);

        drag(&mut controller, &mut camera, &[(400.0, 300.0), (450.0, 300.0)]);

        assert!((camera.yaw - (-85.0)).abs() < EPS, "yaw {}", camera.yaw);
        assert_eq!(camera.pitch, -15.0);
    }

    #[test]
    fn vertical_drag_upwards_raises_pitch() {
        let mut camera = Camera::default();
        let mut controller = DragController::new(0.1);

        drag(&mut controller, &mut camera, &[(400.0, 300.0), (400.0, 250.0)]);

        assert!((camera.pitch - (-10.0)).abs() < EPS, "pitch {}", camera.pitch);
        assert_eq!(camera.yaw, -90.0);
    }

    #[test]
    fn first_sample_of_a_drag_only_primes() {
        let mut camera = Camera::default();
        let before = camera.clone();
        let mut controller = DragController::default();

        controller.press();
        assert!(!controller.update(Vec2::new(123.0, 456.0), &mut camera));
        assert_eq!(camera, before);
        assert_eq!(camera.direction(), before.direction());
        assert_eq!(camera.view(), before.view());

        // the next sample at the same spot applies a zero delta
        assert!(controller.update(Vec2::new(123.0, 456.0), &mut camera));
        assert_eq!(camera.yaw, before.yaw);
        assert_eq!(camera.pitch, before.pitch);
    }

    #[test]
    fn restarting_a_drag_does_not_jump() {
        let mut camera = Camera::default();
        let mut controller = DragController::new(0.1);

        drag(&mut controller, &mut camera, &[(400.0, 300.0), (410.0, 300.0)]);
        let yaw_after_first = camera.yaw;

        // pointer moves a long way with the button up
        for x in [500.0, 700.0, 900.0] {
            assert!(!controller.update(Vec2::new(x, 300.0), &mut camera));
        }
        assert_eq!(camera.yaw, yaw_after_first);

        drag(&mut controller, &mut camera, &[(900.0, 300.0), (905.0, 300.0)]);
        assert!((camera.yaw - (yaw_after_first + 0.5)).abs() < EPS);
    }

    #[test]
    fn release_between_samples_re_primes() {
        let mut camera = Camera::default();
        let mut controller = DragController::new(0.1);

        controller.press();
        controller.update(Vec2::new(0.0, 0.0), &mut camera);
        controller.release();
        controller.press();
        controller.update(Vec2::new(1000.0, 1000.0), &mut camera);

        assert_eq!(camera.yaw, -90.0);
        assert_eq!(camera.pitch, -15.0);
    }

    #[test]
    fn idle_pointer_leaves_camera_untouched() {
        let mut camera = Camera::default();
        let mut controller = DragController::default();
        assert!(!controller.is_dragging());
        assert!(!controller.update(Vec2::new(10.0, 10.0), &mut camera));
        assert_eq!(camera, Camera::default());
    }

    #[test]
    fn view_matches_look_to() {
        let mut camera = Camera::default();
        let expected = Mat4::look_to_rh(camera.position, camera.direction(), WORLD_UP);
        assert!(camera.view().abs_diff_eq(expected, EPS));

        camera.rotate(37.0, 20.0);
        let expected = Mat4::look_to_rh(camera.position, camera.direction(), WORLD_UP);
        assert!(camera.view().abs_diff_eq(expected, EPS));
    }

    #[test]
    fn view_maps_position_to_origin_and_direction_to_neg_z() {
        let camera = Camera::default();
        let view = camera.view();
        assert!(view.transform_point3(camera.position).abs_diff_eq(Vec3::ZERO, EPS));
        let ahead = view.transform_point3(camera.position + camera.direction());
        assert!(ahead.abs_diff_eq(Vec3::NEG_Z, EPS));
    }

    #[test]
    fn view_without_movement_is_reproducible() {
        let a = Camera::default().view();
        let b = Camera::default().view();
        assert_eq!(a.to_cols_array(), b.to_cols_array());
    }

    #[test]
    fn projection_uses_aspect_ratio() {
        let projection = Projection::default();
        let wide = projection.matrix(800.0 / 600.0);
        let expected = Mat4::perspective_rh_gl(45.0_f32.to_radians(), 800.0 / 600.0, 0.1, 100.0);
        assert_eq!(wide, expected);
        assert_ne!(wide, projection.matrix(1.0));
    }
}
