//! glium backend for the shader programs.

use crate::{
    program::{ShaderProgram, UniformData, UniformLocation, UniformStorage},
    shaders::{Phong, PhongFlags, PHONG_FRAGMENT_SOURCE, PHONG_VERTEX_SOURCE},
    version::{supported_version, Version},
};
use std::{collections::HashMap, convert::TryFrom, path::Path, rc::Rc};

use anyhow::Result;
use glium::{
    backend::Facade,
    implement_vertex,
    texture::{RawImage2d, Texture2d},
    uniforms::{UniformType, UniformValue, Uniforms},
    Api, Program,
};
use log::{debug, error, info};

/// Versions the Phong program is written for, most preferred first.
const DESKTOP_VERSIONS: [Version; 4] = [
    Version::GL320,
    Version::GL310,
    Version::GL300,
    Version::GL210,
];
const ES_VERSIONS: [Version; 2] = [Version::GLES300, Version::GLES200];

/// 頂点シェーダーに渡る頂点情報を表す。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}
implement_vertex!(PhongVertex, position, normal, uv);

/// A linked glium program with its uniform values kept on the CPU side.
///
/// glium takes uniforms at draw time, so writes are stored here and handed
/// over through the [`Uniforms`] implementation when drawing.
pub struct GliumProgram {
    program: Program,
    reflection: HashMap<UniformLocation, (String, UniformType)>,
    storage: UniformStorage<Rc<Texture2d>>,
}

impl GliumProgram {
    pub fn new(program: Program) -> GliumProgram {
        let reflection = program
            .uniforms()
            .map(|(name, uniform)| {
                let location = UniformLocation(uniform.location);
                (location, (name.clone(), uniform.ty))
            })
            .collect();

        GliumProgram {
            program,
            reflection,
            storage: UniformStorage::new(),
        }
    }

    /// Returns the underlying program for `Surface::draw`.
    pub fn program(&self) -> &Program {
        &self.program
    }
}

impl ShaderProgram for GliumProgram {
    type Texture = Rc<Texture2d>;

    fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.program
            .get_uniform(name)
            .map(|uniform| UniformLocation(uniform.location))
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformData) {
        self.storage.set(location, value);
    }

    fn bind_textures(&mut self, first_unit: u32, textures: &[Option<Rc<Texture2d>>]) {
        for (unit, texture) in (first_unit..).zip(textures) {
            self.storage.bind(unit, texture.clone());
        }
    }
}

impl Uniforms for GliumProgram {
    fn visit_values<'a, F: FnMut(&str, UniformValue<'a>)>(&'a self, mut callback: F) {
        for (location, value) in self.storage.values() {
            let (name, ty) = match self.reflection.get(&location) {
                Some(entry) => entry,
                None => continue,
            };

            let value = match resolve(value, *ty, |unit| self.storage.texture(unit)) {
                Some(Resolved::Texture(texture)) => UniformValue::Texture2d(&**texture, None),
                Some(Resolved::Value(UniformData::Float(v))) => UniformValue::Float(v),
                Some(Resolved::Value(UniformData::Int(v))) => UniformValue::SignedInt(v),
                Some(Resolved::Value(UniformData::Vec3(v))) => UniformValue::Vec3(v),
                Some(Resolved::Value(UniformData::Mat3(m))) => UniformValue::Mat3(m),
                Some(Resolved::Value(UniformData::Mat4(m))) => UniformValue::Mat4(m),
                None => continue,
            };
            callback(name, value);
        }
    }
}

/// A stored uniform as it is handed over at draw time.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Resolved<T> {
    Value(UniformData),
    Texture(T),
}

/// Samplers hold a texture unit and resolve to the texture bound there.
/// `None` means the uniform is left out of the draw call.
fn resolve<T>(
    value: &UniformData,
    ty: UniformType,
    texture: impl FnOnce(u32) -> Option<T>,
) -> Option<Resolved<T>> {
    match *value {
        UniformData::Int(unit) if matches!(ty, UniformType::Sampler2d) => u32::try_from(unit)
            .ok()
            .and_then(texture)
            .map(Resolved::Texture),
        value => Some(Resolved::Value(value)),
    }
}

impl Phong<GliumProgram> {
    /// Compiles the variant selected by `flags` and wraps it.
    pub fn build(facade: &impl Facade, flags: PhongFlags) -> Result<Phong<GliumProgram>> {
        let program = load_phong_program(facade, flags)?;
        Ok(Phong::new(program, flags))
    }
}

/// Compiles the Phong program variant selected by `flags` for the context of `facade`.
pub fn load_phong_program(facade: &impl Facade, flags: PhongFlags) -> Result<GliumProgram> {
    let context_version = *facade.get_context().get_opengl_version();
    let candidates: &[Version] = match context_version.0 {
        Api::Gl => &DESKTOP_VERSIONS,
        Api::GlEs => &ES_VERSIONS,
    };
    let version = supported_version(&context_version, candidates);

    let header = variant_header(version, flags);
    let vertex_shader = format!("{}{}", header, PHONG_VERTEX_SOURCE);
    let fragment_shader = format!("{}{}", header, PHONG_FRAGMENT_SOURCE);

    let program = Program::from_source(facade, &vertex_shader, &fragment_shader, None)
        .map_err(|e| {
            error!("Failed to compile the Phong shader {:?}: {}", flags, e);
            e
        })?;
    info!("Phong shader {:?} compiled as {:?}", flags, version);

    Ok(GliumProgram::new(program))
}

/// Builds the `#version` line and the defines selecting a variant.
fn variant_header(version: Version, flags: PhongFlags) -> String {
    let mut header = String::with_capacity(128);
    header.push_str(version.glsl_directive());
    header.push('\n');

    if version.is_es() {
        header.push_str("precision highp float;\n");
    }
    if version.has_new_glsl() {
        header.push_str("#define NEW_GLSL\n");
    }

    let defines = [
        (PhongFlags::AMBIENT_TEXTURE, "AMBIENT_TEXTURE"),
        (PhongFlags::DIFFUSE_TEXTURE, "DIFFUSE_TEXTURE"),
        (PhongFlags::SPECULAR_TEXTURE, "SPECULAR_TEXTURE"),
    ];
    for (flag, define) in defines.iter() {
        if flags.contains(*flag) {
            header.push_str("#define ");
            header.push_str(define);
            header.push('\n');
        }
    }
    if !flags.is_empty() {
        header.push_str("#define TEXTURED\n");
    }

    header
}

/// Loads a LDR (PNG, JPEG, and DXT) image as a texture.
pub fn load_texture(facade: &impl Facade, filename: impl AsRef<Path>) -> Result<Rc<Texture2d>> {
    let filename = filename.as_ref();

    debug!("Loading LDR image {:?}", filename);
    let image = image::open(filename)?.into_rgba8();
    let dimensions = image.dimensions();
    let raw_image = RawImage2d::from_raw_rgba_reversed(&image.into_raw(), dimensions);
    let texture = Texture2d::new(facade, raw_image)?;

    info!("Loaded successfully; dimensions are {:?}", dimensions);
    Ok(Rc::new(texture))
}
