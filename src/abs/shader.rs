//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! This module also provides the [`Uniform`] trait for setting uniform variables in shader
//! programs.

use std::path::Path;
use std::sync::Arc;

use glam::Mat4;
use glow::HasContext;

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<glow::Context>, shader_type: u32, source: &str) -> Result<Self, String> {
        unsafe {
            let shader = gl.create_shader(shader_type)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(format!(
                    "Failed to compile {} shader: {}",
                    stage_name(shader_type),
                    log
                ));
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }

    /// Reads the file at `path` and compiles it as a shader of the given type.
    pub fn from_file(
        gl: &Arc<glow::Context>,
        shader_type: u32,
        path: impl AsRef<Path>,
    ) -> Result<Self, String> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::new(gl, shader_type, &source)
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

fn stage_name(shader_type: u32) -> &'static str {
    match shader_type {
        glow::VERTEX_SHADER => "vertex",
        glow::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Uploads the value to the given location of the currently bound program.
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation);
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_matrix_4_f32_slice(Some(location), false, self.as_ref());
        }
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        (*self).set_uniform(gl, location);
    }
}

/// Represents an OpenGL shader program composed of multiple shaders.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
}

impl ShaderProgram {
    /// Links a new shader program from the given shaders.
    pub fn new(gl: &Arc<glow::Context>, shaders: &[&Shader]) -> Result<Self, String> {
        unsafe {
            let program = gl.create_program()?;

            for shader in shaders {
                gl.attach_shader(program, shader.id);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(format!("Failed to link shader program: {log}"));
            }

            for shader in shaders {
                gl.detach_shader(program, shader.id);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: program,
            })
        }
    }

    /// Compiles and links a vertex/fragment pair given as source strings.
    pub fn from_sources(gl: &Arc<glow::Context>, vert: &str, frag: &str) -> Result<Self, String> {
        let vert = Shader::new(gl, glow::VERTEX_SHADER, vert)?;
        let frag = Shader::new(gl, glow::FRAGMENT_SHADER, frag)?;
        Self::new(gl, &[&vert, &frag])
    }

    /// Compiles and links a vertex/fragment pair read from two files.
    pub fn from_files(
        gl: &Arc<glow::Context>,
        vert_path: impl AsRef<Path>,
        frag_path: impl AsRef<Path>,
    ) -> Result<Self, String> {
        let vert = Shader::from_file(gl, glow::VERTEX_SHADER, vert_path)?;
        let frag = Shader::from_file(gl, glow::FRAGMENT_SHADER, frag_path)?;
        Self::new(gl, &[&vert, &frag])
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Unbinds any shader program.
    pub fn unbind(&self) {
        unsafe {
            self.gl.use_program(None);
        }
    }

    /// Looks up the location of a uniform variable. Returns `None` if the linked program has no
    /// active uniform with that name.
    pub fn uniform_location(&self, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(self.id, name) }
    }

    /// Sets a uniform variable at a previously looked up location. The program must be bound.
    pub fn set_uniform_at<T: Uniform>(&self, location: Option<&glow::UniformLocation>, value: T) {
        if let Some(location) = location {
            value.set_uniform(&self.gl, location);
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}
