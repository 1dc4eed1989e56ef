//! Ready-made shader programs.

mod phong;

pub use phong::{Phong, PhongFlags, PhongUniform};

/// Texture unit the ambient texture is bound to.
pub const AMBIENT_TEXTURE_UNIT: u32 = 0;

/// Texture unit the diffuse texture is bound to.
pub const DIFFUSE_TEXTURE_UNIT: u32 = 1;

/// Texture unit the specular texture is bound to.
pub const SPECULAR_TEXTURE_UNIT: u32 = 2;

/// GLSL source of the Phong vertex stage, without `#version` and defines.
pub const PHONG_VERTEX_SOURCE: &str = include_str!("phong.vert");

/// GLSL source of the Phong fragment stage, without `#version` and defines.
pub const PHONG_FRAGMENT_SOURCE: &str = include_str!("phong.frag");
