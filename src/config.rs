//! Viewer configuration read from TOML.

use crate::shaders::PhongFlags;
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use ultraviolet::Vec3;

/// Whole viewer configuration. Every section and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub material: MaterialConfig,
    pub mesh: MeshConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "glossy".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    /// Distance from the mesh center.
    pub distance: f32,

    /// Vertical field of view in degrees.
    pub fov: f32,

    /// Mesh rotation in radians per second.
    pub rotation_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            distance: 4.0,
            fov: 60.0,
            rotation_speed: 1.0,
        }
    }
}

/// Point light, in camera space.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        LightConfig {
            position: [5.0, 5.0, 7.0],
            color: [1.0, 1.0, 1.0],
        }
    }
}

impl LightConfig {
    pub fn position(&self) -> Vec3 {
        self.position.into()
    }

    pub fn color(&self) -> Vec3 {
        self.color.into()
    }
}

/// Material colors and textures. A channel with a texture ignores its color.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialConfig {
    pub ambient_color: [f32; 3],
    pub diffuse_color: [f32; 3],
    pub specular_color: [f32; 3],
    pub shininess: f32,
    pub ambient_texture: Option<PathBuf>,
    pub diffuse_texture: Option<PathBuf>,
    pub specular_texture: Option<PathBuf>,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        MaterialConfig {
            ambient_color: [0.0, 0.0, 0.0],
            diffuse_color: [0.8, 0.8, 0.8],
            specular_color: [1.0, 1.0, 1.0],
            shininess: 80.0,
            ambient_texture: None,
            diffuse_texture: None,
            specular_texture: None,
        }
    }
}

impl MaterialConfig {
    /// Flags of the program variant this material needs.
    pub fn flags(&self) -> PhongFlags {
        let mut flags = PhongFlags::empty();
        if self.ambient_texture.is_some() {
            flags |= PhongFlags::AMBIENT_TEXTURE;
        }
        if self.diffuse_texture.is_some() {
            flags |= PhongFlags::DIFFUSE_TEXTURE;
        }
        if self.specular_texture.is_some() {
            flags |= PhongFlags::SPECULAR_TEXTURE;
        }
        flags
    }

    pub fn ambient_color(&self) -> Vec3 {
        self.ambient_color.into()
    }

    pub fn diffuse_color(&self) -> Vec3 {
        self.diffuse_color.into()
    }

    pub fn specular_color(&self) -> Vec3 {
        self.specular_color.into()
    }

    fn resolve_textures(&mut self, base: &Path) {
        let mut textures = [
            &mut self.ambient_texture,
            &mut self.diffuse_texture,
            &mut self.specular_texture,
        ];
        for texture in textures.iter_mut() {
            if let Some(path) = &mut **texture {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshConfig {
    /// Shows the cube from the inside.
    pub inside_out: bool,
}

impl ViewerConfig {
    /// Parses a configuration. Texture paths are kept as written.
    pub fn from_toml(source: &str) -> Result<ViewerConfig> {
        let config = toml::from_str(source)?;
        Ok(config)
    }

    /// Reads a configuration file. Relative texture paths are resolved
    /// against the directory of the file.
    pub fn load(filename: impl AsRef<Path>) -> Result<ViewerConfig> {
        let filename = filename.as_ref();
        let source = read_to_string(filename)
            .with_context(|| format!("Failed to read {:?}", filename))?;
        let mut config = ViewerConfig::from_toml(&source)
            .with_context(|| format!("Failed to parse {:?}", filename))?;

        if let Some(base) = filename.parent() {
            config.material.resolve_textures(base);
        }
        Ok(config)
    }
}
