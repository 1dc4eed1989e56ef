//! Phong shading program bindings on top of glium.
//!
//! The shading contract lives in [`shaders::Phong`] and talks to the GPU only
//! through the [`program::ShaderProgram`] capability, so it can be driven by
//! the glium backend in [`gl`] or by anything else that stores uniforms.

pub mod config;
pub mod gl;
pub mod mesh_tools;
pub mod program;
pub mod shaders;
pub mod version;
