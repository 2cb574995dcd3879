//! Per-frame application state.
//!
//! Everything the main loop mutates between frames lives in [`Demo`], which is passed by reference
//! into the update and draw steps. GPU resources are kept separately in the renderer.

use glam::{Mat4, Vec2};

use crate::camera::{Camera, DragController, Projection};
use crate::scene::{DrawCommand, MeshId, Scene, Variant};
use crate::settings::Settings;

pub struct Demo {
    pub scene: Scene,
    pub camera: Camera,
    pub drag: DragController,
    pub projection: Projection,
}

impl Demo {
    pub fn new(settings: &Settings, mesh: MeshId) -> Self {
        Self {
            scene: Scene::new(settings.variant, mesh),
            camera: Camera::default(),
            drag: DragController::new(settings.sensitivity),
            projection: settings.projection(),
        }
    }

    pub fn variant(&self) -> Variant {
        self.scene.variant
    }

    /// Feeds this frame's pointer position to the camera, if the variant has one.
    pub fn update(&mut self, pointer: Vec2) {
        if self.scene.variant.has_camera() {
            self.drag.update(pointer, &mut self.camera);
        }
    }

    pub fn view(&self) -> Mat4 {
        if self.scene.variant.has_camera() {
            self.camera.view()
        } else {
            Mat4::IDENTITY
        }
    }

    pub fn projection(&self, aspect_ratio: f32) -> Mat4 {
        self.projection.matrix(aspect_ratio)
    }

    pub fn draw_commands(&self) -> impl Iterator<Item = DrawCommand> + '_ {
        self.scene.draw_commands()
    }
}
