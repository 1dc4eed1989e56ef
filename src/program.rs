//! Render program capability used by the shader wrappers.

use std::collections::BTreeMap;

use ultraviolet::{Mat3, Mat4, Vec3};

/// Location of a uniform inside a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UniformLocation(pub i32);

/// A value written into a uniform slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformData {
    Float(f32),
    Int(i32),
    Vec3([f32; 3]),
    Mat3([[f32; 3]; 3]),
    Mat4([[f32; 4]; 4]),
}

impl From<f32> for UniformData {
    fn from(value: f32) -> UniformData {
        UniformData::Float(value)
    }
}

impl From<i32> for UniformData {
    fn from(value: i32) -> UniformData {
        UniformData::Int(value)
    }
}

impl From<Vec3> for UniformData {
    fn from(value: Vec3) -> UniformData {
        UniformData::Vec3(value.into())
    }
}

impl From<Mat3> for UniformData {
    fn from(value: Mat3) -> UniformData {
        let [x, y, z] = value.cols;
        UniformData::Mat3([x.into(), y.into(), z.into()])
    }
}

impl From<Mat4> for UniformData {
    fn from(value: Mat4) -> UniformData {
        UniformData::Mat4(value.into())
    }
}

/// Operations a linked shader program has to offer to the shader wrappers.
///
/// Uniform writes are immediate-mode: the wrapper never reads them back, so
/// implementations are free to store them however their API needs.
pub trait ShaderProgram {
    /// Handle of a texture that can be bound to a texture unit.
    type Texture: Clone;

    /// Looks up a uniform by its name in the shader source.
    /// Returns `None` when the program does not expose it (e.g. optimized out).
    fn uniform_location(&self, name: &str) -> Option<UniformLocation>;

    /// Writes a value into a uniform slot.
    fn set_uniform(&mut self, location: UniformLocation, value: UniformData);

    /// Binds textures to consecutive units starting at `first_unit` in one batch.
    /// `None` unbinds the unit.
    fn bind_textures(&mut self, first_unit: u32, textures: &[Option<Self::Texture>]);

    /// Binds a single texture.
    fn bind_texture(&mut self, unit: u32, texture: Option<Self::Texture>) {
        self.bind_textures(unit, &[texture]);
    }
}

/// Uniform values and texture bindings held on the CPU side of a program.
#[derive(Debug, Clone)]
pub struct UniformStorage<T> {
    values: BTreeMap<UniformLocation, UniformData>,
    textures: BTreeMap<u32, T>,
}

impl<T> Default for UniformStorage<T> {
    fn default() -> Self {
        UniformStorage {
            values: BTreeMap::new(),
            textures: BTreeMap::new(),
        }
    }
}

impl<T> UniformStorage<T> {
    pub fn new() -> UniformStorage<T> {
        Default::default()
    }

    /// Stores a uniform value, replacing the previous one.
    pub fn set(&mut self, location: UniformLocation, value: UniformData) {
        self.values.insert(location, value);
    }

    /// Returns the last value written to the location.
    pub fn get(&self, location: UniformLocation) -> Option<&UniformData> {
        self.values.get(&location)
    }

    /// Binds or unbinds a texture unit.
    pub fn bind(&mut self, unit: u32, texture: Option<T>) {
        match texture {
            Some(texture) => {
                self.textures.insert(unit, texture);
            }
            None => {
                self.textures.remove(&unit);
            }
        }
    }

    /// Returns the texture bound to the unit.
    pub fn texture(&self, unit: u32) -> Option<&T> {
        self.textures.get(&unit)
    }

    /// Iterates over all written values in location order.
    pub fn values(&self) -> impl Iterator<Item = (UniformLocation, &UniformData)> {
        self.values.iter().map(|(l, v)| (*l, v))
    }
}
