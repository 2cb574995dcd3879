//! Executes [`DrawCommand`]s against the GPU.

use std::sync::Arc;

use glam::Mat4;

use crate::abs::{Mesh, ShaderProgram, Vertex};
use crate::scene::{DrawCommand, MeshId};

/// Uniform locations of the `model`/`view`/`projection` triple, looked up once after linking.
struct MatrixUniforms {
    model: Option<glow::UniformLocation>,
    view: Option<glow::UniformLocation>,
    projection: Option<glow::UniformLocation>,
}

impl MatrixUniforms {
    fn lookup(program: &ShaderProgram) -> Self {
        let lookup = |name: &str| {
            let location = program.uniform_location(name);
            if location.is_none() {
                log::warn!("Shader program has no active uniform `{name}`");
            }
            location
        };
        Self {
            model: lookup("model"),
            view: lookup("view"),
            projection: lookup("projection"),
        }
    }
}

/// Owns the meshes and the shader program used to draw them.
pub struct Renderer {
    gl: Arc<glow::Context>,
    program: ShaderProgram,
    uniforms: MatrixUniforms,
    meshes: Vec<Mesh>,
}

impl Renderer {
    pub fn new(gl: &Arc<glow::Context>, program: ShaderProgram) -> Self {
        let uniforms = MatrixUniforms::lookup(&program);
        Self {
            gl: Arc::clone(gl),
            program,
            uniforms,
            meshes: Vec::new(),
        }
    }

    /// Uploads a mesh and returns the handle draw commands use to refer to it.
    pub fn add_mesh<V: Vertex>(
        &mut self,
        vertices: &[V],
        indices: &[u32],
    ) -> Result<MeshId, String> {
        let mesh = Mesh::new(&self.gl, vertices, indices, glow::TRIANGLES)?;
        self.meshes.push(mesh);
        Ok(MeshId(self.meshes.len() - 1))
    }

    /// Draws every command with the shared view and projection matrices.
    pub fn draw(
        &self,
        commands: impl IntoIterator<Item = DrawCommand>,
        view: &Mat4,
        projection: &Mat4,
    ) {
        self.program.use_program();

        for command in commands {
            let Some(mesh) = self.meshes.get(command.mesh.0) else {
                log::error!("Draw command refers to unknown mesh {:?}", command.mesh);
                continue;
            };

            self.program.set_uniform_at(self.uniforms.model.as_ref(), &command.model);
            self.program.set_uniform_at(self.uniforms.projection.as_ref(), projection);
            self.program.set_uniform_at(self.uniforms.view.as_ref(), view);

            mesh.draw();
        }

        self.program.unbind();
    }

    /// Total number of indices across all meshes.
    pub fn index_count(&self) -> usize {
        self.meshes.iter().map(Mesh::index_count).sum()
    }
}
