//! Phong shading program.

use super::{AMBIENT_TEXTURE_UNIT, DIFFUSE_TEXTURE_UNIT, SPECULAR_TEXTURE_UNIT};
use crate::program::{ShaderProgram, UniformData, UniformLocation};

use log::debug;
use ultraviolet::{Mat3, Mat4, Vec3};

bitflags::bitflags! {
    /// Selects which material channels are sampled from a texture instead of a constant color.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PhongFlags: u8 {
        /// The program uses ambient texture instead of color.
        const AMBIENT_TEXTURE = 1 << 0;
        /// The program uses diffuse texture instead of color.
        const DIFFUSE_TEXTURE = 1 << 1;
        /// The program uses specular texture instead of color.
        const SPECULAR_TEXTURE = 1 << 2;
    }
}

/// Uniform slots of the Phong program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhongUniform {
    TransformationMatrix,
    ProjectionMatrix,
    NormalMatrix,
    LightPosition,
    DiffuseColor,
    AmbientColor,
    SpecularColor,
    LightColor,
    Shininess,
}

impl PhongUniform {
    pub const ALL: [PhongUniform; 9] = [
        PhongUniform::TransformationMatrix,
        PhongUniform::ProjectionMatrix,
        PhongUniform::NormalMatrix,
        PhongUniform::LightPosition,
        PhongUniform::DiffuseColor,
        PhongUniform::AmbientColor,
        PhongUniform::SpecularColor,
        PhongUniform::LightColor,
        PhongUniform::Shininess,
    ];

    /// Name of the uniform in the GLSL source.
    pub fn name(self) -> &'static str {
        match self {
            PhongUniform::TransformationMatrix => "transformationMatrix",
            PhongUniform::ProjectionMatrix => "projectionMatrix",
            PhongUniform::NormalMatrix => "normalMatrix",
            PhongUniform::LightPosition => "light",
            PhongUniform::DiffuseColor => "diffuseColor",
            PhongUniform::AmbientColor => "ambientColor",
            PhongUniform::SpecularColor => "specularColor",
            PhongUniform::LightColor => "lightColor",
            PhongUniform::Shininess => "shininess",
        }
    }

    /// Whether a program built with `flags` is expected to expose this slot.
    fn is_active(self, flags: PhongFlags) -> bool {
        match self {
            PhongUniform::AmbientColor => !flags.contains(PhongFlags::AMBIENT_TEXTURE),
            PhongUniform::DiffuseColor => !flags.contains(PhongFlags::DIFFUSE_TEXTURE),
            PhongUniform::SpecularColor => !flags.contains(PhongFlags::SPECULAR_TEXTURE),
            _ => true,
        }
    }
}

/// Material channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Ambient,
    Diffuse,
    Specular,
}

impl Channel {
    const ALL: [Channel; 3] = [Channel::Ambient, Channel::Diffuse, Channel::Specular];

    fn flag(self) -> PhongFlags {
        match self {
            Channel::Ambient => PhongFlags::AMBIENT_TEXTURE,
            Channel::Diffuse => PhongFlags::DIFFUSE_TEXTURE,
            Channel::Specular => PhongFlags::SPECULAR_TEXTURE,
        }
    }

    fn color(self) -> PhongUniform {
        match self {
            Channel::Ambient => PhongUniform::AmbientColor,
            Channel::Diffuse => PhongUniform::DiffuseColor,
            Channel::Specular => PhongUniform::SpecularColor,
        }
    }

    fn sampler(self) -> &'static str {
        match self {
            Channel::Ambient => "ambientTexture",
            Channel::Diffuse => "diffuseTexture",
            Channel::Specular => "specularTexture",
        }
    }

    fn unit(self) -> u32 {
        match self {
            Channel::Ambient => AMBIENT_TEXTURE_UNIT,
            Channel::Diffuse => DIFFUSE_TEXTURE_UNIT,
            Channel::Specular => SPECULAR_TEXTURE_UNIT,
        }
    }
}

/// Phong shader.
///
/// Uses ambient, diffuse and specular color or texture. A colored mesh needs
/// at least the transformation, normal and projection matrices, the diffuse
/// color and the light position. Textured channels are selected by the
/// [`PhongFlags`] passed at construction; the matching texture setters have to
/// be called at render time instead of the color setters.
///
/// Every setter returns `&mut Self`, so configuration can be chained.
#[derive(Debug)]
pub struct Phong<P> {
    program: P,
    flags: PhongFlags,
    locations: [Option<UniformLocation>; 9],
}

impl<P: ShaderProgram> Phong<P> {
    /// Wraps a program built for the variant selected by `flags`.
    ///
    /// Locates all uniform slots, assigns the texture units of the textured
    /// channels and writes the default values.
    pub fn new(program: P, flags: PhongFlags) -> Phong<P> {
        let mut locations = [None; 9];
        for (slot, uniform) in locations.iter_mut().zip(PhongUniform::ALL.iter()) {
            *slot = program.uniform_location(uniform.name());
            if slot.is_none() && uniform.is_active(flags) {
                debug!("Uniform `{}` is not exposed by the program", uniform.name());
            }
        }

        let mut phong = Phong {
            program,
            flags,
            locations,
        };

        for channel in Channel::ALL.iter().filter(|c| flags.contains(c.flag())) {
            match phong.program.uniform_location(channel.sampler()) {
                Some(location) => phong
                    .program
                    .set_uniform(location, UniformData::Int(channel.unit() as i32)),
                None => debug!("Sampler `{}` is not exposed by the program", channel.sampler()),
            }
        }

        phong
            .set_ambient_color(Vec3::new(0.0, 0.0, 0.0))
            .set_specular_color(Vec3::new(1.0, 1.0, 1.0))
            .set_light_color(Vec3::new(1.0, 1.0, 1.0))
            .set_shininess(80.0);

        phong
    }

    /// Flags the program was built with.
    pub fn flags(&self) -> PhongFlags {
        self.flags
    }

    /// Location of a slot, `None` if the program does not expose it.
    pub fn location(&self, uniform: PhongUniform) -> Option<UniformLocation> {
        self.locations[uniform as usize]
    }

    pub fn program(&self) -> &P {
        &self.program
    }

    pub fn program_mut(&mut self) -> &mut P {
        &mut self.program
    }

    pub fn into_program(self) -> P {
        self.program
    }

    /// Sets ambient color. Defaults to `(0, 0, 0)`.
    /// Has no effect if [`PhongFlags::AMBIENT_TEXTURE`] is set.
    pub fn set_ambient_color(&mut self, color: Vec3) -> &mut Self {
        self.set_channel_color(Channel::Ambient, color)
    }

    /// Sets ambient texture.
    /// Has effect only if [`PhongFlags::AMBIENT_TEXTURE`] is set.
    pub fn set_ambient_texture(&mut self, texture: P::Texture) -> &mut Self {
        self.set_channel_texture(Channel::Ambient, texture)
    }

    /// Sets diffuse color.
    /// Has no effect if [`PhongFlags::DIFFUSE_TEXTURE`] is set.
    pub fn set_diffuse_color(&mut self, color: Vec3) -> &mut Self {
        self.set_channel_color(Channel::Diffuse, color)
    }

    /// Sets diffuse texture.
    /// Has effect only if [`PhongFlags::DIFFUSE_TEXTURE`] is set.
    pub fn set_diffuse_texture(&mut self, texture: P::Texture) -> &mut Self {
        self.set_channel_texture(Channel::Diffuse, texture)
    }

    /// Sets specular color. Defaults to `(1, 1, 1)`.
    /// Has no effect if [`PhongFlags::SPECULAR_TEXTURE`] is set.
    pub fn set_specular_color(&mut self, color: Vec3) -> &mut Self {
        self.set_channel_color(Channel::Specular, color)
    }

    /// Sets specular texture.
    /// Has effect only if [`PhongFlags::SPECULAR_TEXTURE`] is set.
    pub fn set_specular_texture(&mut self, texture: P::Texture) -> &mut Self {
        self.set_channel_texture(Channel::Specular, texture)
    }

    /// Sets all three textures in a single binding batch.
    ///
    /// A texture is bound only if the flag of its channel is set; the units of
    /// the other channels are left empty, so `None` can be passed for them.
    pub fn set_textures(
        &mut self,
        ambient: Option<P::Texture>,
        diffuse: Option<P::Texture>,
        specular: Option<P::Texture>,
    ) -> &mut Self {
        let flags = self.flags;
        let textures = [
            ambient.filter(|_| flags.contains(Channel::Ambient.flag())),
            diffuse.filter(|_| flags.contains(Channel::Diffuse.flag())),
            specular.filter(|_| flags.contains(Channel::Specular.flag())),
        ];
        self.program.bind_textures(AMBIENT_TEXTURE_UNIT, &textures);
        self
    }

    /// Sets shininess. The larger the value, the smaller the specular highlight.
    /// Defaults to `80.0`.
    pub fn set_shininess(&mut self, shininess: f32) -> &mut Self {
        self.write(PhongUniform::Shininess, shininess)
    }

    pub fn set_transformation_matrix(&mut self, matrix: Mat4) -> &mut Self {
        self.write(PhongUniform::TransformationMatrix, matrix)
    }

    /// Sets normal matrix. It doesn't need to be normalized, the shader
    /// renormalizes the normals anyway.
    pub fn set_normal_matrix(&mut self, matrix: Mat3) -> &mut Self {
        self.write(PhongUniform::NormalMatrix, matrix)
    }

    pub fn set_projection_matrix(&mut self, matrix: Mat4) -> &mut Self {
        self.write(PhongUniform::ProjectionMatrix, matrix)
    }

    /// Sets light position in the transformed (camera) space.
    pub fn set_light_position(&mut self, position: Vec3) -> &mut Self {
        self.write(PhongUniform::LightPosition, position)
    }

    /// Sets light color. Defaults to `(1, 1, 1)`.
    pub fn set_light_color(&mut self, color: Vec3) -> &mut Self {
        self.write(PhongUniform::LightColor, color)
    }

    fn set_channel_color(&mut self, channel: Channel, color: Vec3) -> &mut Self {
        if !self.flags.contains(channel.flag()) {
            self.write(channel.color(), color);
        }
        self
    }

    fn set_channel_texture(&mut self, channel: Channel, texture: P::Texture) -> &mut Self {
        if self.flags.contains(channel.flag()) {
            self.program.bind_texture(channel.unit(), Some(texture));
        } else {
            debug!("Ignoring {:?} texture, the channel is not textured", channel);
        }
        self
    }

    fn write(&mut self, uniform: PhongUniform, value: impl Into<UniformData>) -> &mut Self {
        if let Some(location) = self.locations[uniform as usize] {
            self.program.set_uniform(location, value.into());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::UniformStorage;

    const SAMPLERS: [&str; 3] = ["ambientTexture", "diffuseTexture", "specularTexture"];

    /// Program exposing every slot and sampler regardless of flags, so the
    /// gating has to happen in `Phong` itself.
    struct RecordingProgram {
        names: Vec<&'static str>,
        storage: UniformStorage<&'static str>,
        batches: Vec<(u32, Vec<Option<&'static str>>)>,
    }

    impl RecordingProgram {
        fn new() -> RecordingProgram {
            RecordingProgram::exposing(
                PhongUniform::ALL
                    .iter()
                    .map(|u| u.name())
                    .chain(SAMPLERS.iter().copied())
                    .collect(),
            )
        }

        fn exposing(names: Vec<&'static str>) -> RecordingProgram {
            RecordingProgram {
                names,
                storage: UniformStorage::new(),
                batches: vec![],
            }
        }

        fn value(&self, name: &str) -> Option<UniformData> {
            self.uniform_location(name)
                .and_then(|l| self.storage.get(l))
                .copied()
        }
    }

    impl ShaderProgram for RecordingProgram {
        type Texture = &'static str;

        fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
            self.names
                .iter()
                .position(|n| *n == name)
                .map(|i| UniformLocation(i as i32))
        }

        fn set_uniform(&mut self, location: UniformLocation, value: UniformData) {
            self.storage.set(location, value);
        }

        fn bind_textures(&mut self, first_unit: u32, textures: &[Option<&'static str>]) {
            for (i, texture) in textures.iter().enumerate() {
                self.storage.bind(first_unit + i as u32, *texture);
            }
            self.batches.push((first_unit, textures.to_vec()));
        }
    }

    fn all_flags() -> impl Iterator<Item = PhongFlags> {
        (0..8).map(PhongFlags::from_bits_truncate)
    }

    fn vec3(x: f32, y: f32, z: f32) -> Option<UniformData> {
        Some(UniformData::Vec3([x, y, z]))
    }

    #[test]
    fn flags_combine() {
        let flags = PhongFlags::AMBIENT_TEXTURE | PhongFlags::SPECULAR_TEXTURE;
        assert_eq!(flags.bits(), 0b101);
        assert!(flags.contains(PhongFlags::SPECULAR_TEXTURE));
        assert!(!flags.contains(PhongFlags::DIFFUSE_TEXTURE));
        assert!(!flags.contains(PhongFlags::all()));
        assert!(PhongFlags::empty().is_empty());
        assert_eq!(PhongFlags::from_bits_truncate(0xff), PhongFlags::all());

        let mut accumulated = PhongFlags::default();
        accumulated |= PhongFlags::DIFFUSE_TEXTURE;
        assert_eq!(
            accumulated & PhongFlags::all(),
            PhongFlags::DIFFUSE_TEXTURE
        );
    }

    #[test]
    fn defaults_are_written_on_construction() {
        let phong = Phong::new(RecordingProgram::new(), PhongFlags::empty());
        let program = phong.program();

        assert_eq!(program.value("ambientColor"), vec3(0.0, 0.0, 0.0));
        assert_eq!(program.value("specularColor"), vec3(1.0, 1.0, 1.0));
        assert_eq!(program.value("lightColor"), vec3(1.0, 1.0, 1.0));
        assert_eq!(program.value("shininess"), Some(UniformData::Float(80.0)));
        assert_eq!(program.value("diffuseColor"), None);
    }

    #[test]
    fn defaults_skip_textured_channels() {
        let phong = Phong::new(RecordingProgram::new(), PhongFlags::all());
        let program = phong.program();

        assert_eq!(program.value("ambientColor"), None);
        assert_eq!(program.value("specularColor"), None);
        assert_eq!(program.value("lightColor"), vec3(1.0, 1.0, 1.0));
        assert_eq!(program.value("shininess"), Some(UniformData::Float(80.0)));
    }

    #[test]
    fn samplers_get_their_units() {
        let flags = PhongFlags::AMBIENT_TEXTURE | PhongFlags::SPECULAR_TEXTURE;
        let phong = Phong::new(RecordingProgram::new(), flags);
        let program = phong.program();

        assert_eq!(program.value("ambientTexture"), Some(UniformData::Int(0)));
        assert_eq!(program.value("diffuseTexture"), None);
        assert_eq!(program.value("specularTexture"), Some(UniformData::Int(2)));
    }

    #[test]
    fn colors_on_textured_channels_are_ignored() {
        let colors = [
            (PhongFlags::AMBIENT_TEXTURE, "ambientColor"),
            (PhongFlags::DIFFUSE_TEXTURE, "diffuseColor"),
            (PhongFlags::SPECULAR_TEXTURE, "specularColor"),
        ];

        for flags in all_flags() {
            let mut phong = Phong::new(RecordingProgram::new(), flags);
            let before: Vec<_> = colors
                .iter()
                .map(|(_, name)| phong.program().value(name))
                .collect();

            phong
                .set_ambient_color(Vec3::new(0.25, 0.5, 0.75))
                .set_diffuse_color(Vec3::new(0.25, 0.5, 0.75))
                .set_specular_color(Vec3::new(0.25, 0.5, 0.75));

            for ((flag, name), before) in colors.iter().zip(before) {
                let after = phong.program().value(name);
                if flags.contains(*flag) {
                    assert_eq!(after, before, "{} changed with {:?}", name, flags);
                } else {
                    assert_eq!(after, vec3(0.25, 0.5, 0.75), "{} with {:?}", name, flags);
                }
            }
        }
    }

    #[test]
    fn textures_on_untextured_channels_are_ignored() {
        for flags in all_flags() {
            let mut phong = Phong::new(RecordingProgram::new(), flags);
            phong
                .set_ambient_texture("ambient")
                .set_diffuse_texture("diffuse")
                .set_specular_texture("specular");

            let storage = &phong.program().storage;
            let expected = |flag, name| Some(name).filter(|_| flags.contains(flag));
            assert_eq!(
                storage.texture(AMBIENT_TEXTURE_UNIT).copied(),
                expected(PhongFlags::AMBIENT_TEXTURE, "ambient")
            );
            assert_eq!(
                storage.texture(DIFFUSE_TEXTURE_UNIT).copied(),
                expected(PhongFlags::DIFFUSE_TEXTURE, "diffuse")
            );
            assert_eq!(
                storage.texture(SPECULAR_TEXTURE_UNIT).copied(),
                expected(PhongFlags::SPECULAR_TEXTURE, "specular")
            );
        }
    }

    #[test]
    fn set_textures_binds_in_one_batch() {
        let flags = PhongFlags::AMBIENT_TEXTURE | PhongFlags::DIFFUSE_TEXTURE;
        let mut phong = Phong::new(RecordingProgram::new(), flags);
        phong.set_textures(Some("ambient"), Some("diffuse"), Some("specular"));

        let program = phong.program();
        assert_eq!(
            program.batches,
            vec![(0, vec![Some("ambient"), Some("diffuse"), None])]
        );
        assert_eq!(program.storage.texture(0), Some(&"ambient"));
        assert_eq!(program.storage.texture(1), Some(&"diffuse"));
        assert_eq!(program.storage.texture(2), None);
    }

    #[test]
    fn set_textures_unbinds_absent_textures() {
        let mut phong = Phong::new(RecordingProgram::new(), PhongFlags::all());
        phong
            .set_specular_texture("old")
            .set_textures(Some("ambient"), None, None);

        let storage = &phong.program().storage;
        assert_eq!(storage.texture(0), Some(&"ambient"));
        assert_eq!(storage.texture(1), None);
        assert_eq!(storage.texture(2), None);
    }

    #[test]
    fn unconditional_setters_chain() {
        let mut phong = Phong::new(RecordingProgram::new(), PhongFlags::all());
        phong
            .set_transformation_matrix(Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0)))
            .set_projection_matrix(Mat4::identity())
            .set_normal_matrix(Mat3::identity())
            .set_light_position(Vec3::new(5.0, 5.0, 7.0))
            .set_light_color(Vec3::new(0.5, 0.5, 0.5))
            .set_shininess(20.0);

        let program = phong.program();
        assert_eq!(program.value("light"), vec3(5.0, 5.0, 7.0));
        assert_eq!(program.value("lightColor"), vec3(0.5, 0.5, 0.5));
        assert_eq!(program.value("shininess"), Some(UniformData::Float(20.0)));
        assert_eq!(
            program.value("normalMatrix"),
            Some(UniformData::Mat3([
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0]
            ]))
        );
        match program.value("transformationMatrix") {
            Some(UniformData::Mat4(m)) => assert_eq!(m[3], [0.0, 0.0, -3.0, 1.0]),
            other => panic!("unexpected transformation {:?}", other),
        }
    }

    #[test]
    fn missing_slots_are_skipped() {
        let program = RecordingProgram::exposing(vec!["shininess", "diffuseColor"]);
        let mut phong = Phong::new(program, PhongFlags::empty());

        assert_eq!(phong.location(PhongUniform::LightColor), None);
        assert_eq!(
            phong.location(PhongUniform::DiffuseColor),
            Some(UniformLocation(1))
        );

        phong
            .set_light_color(Vec3::new(0.1, 0.2, 0.3))
            .set_diffuse_color(Vec3::new(0.3, 0.2, 0.1));

        let program = phong.into_program();
        let written: Vec<_> = program.storage.values().map(|(l, _)| l).collect();
        assert_eq!(written, vec![UniformLocation(0), UniformLocation(1)]);
        assert_eq!(program.value("diffuseColor"), vec3(0.3, 0.2, 0.1));
    }

    #[test]
    fn flags_are_kept() {
        let phong = Phong::new(RecordingProgram::new(), PhongFlags::DIFFUSE_TEXTURE);
        assert_eq!(phong.flags(), PhongFlags::DIFFUSE_TEXTURE);
    }
}
