//! OpenGL version negotiation for shader variants.

use std::{
    error::Error as StdError,
    fmt::{Display, Formatter, Result as FmtResult},
};

use glium::{Api, Version as GlVersion};

/// OpenGL (ES) versions a shader can be written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    GL210,
    GL300,
    GL310,
    GL320,
    GL330,
    GL400,
    GL410,
    GL420,
    GL430,
    GL440,
    GLES200,
    GLES300,
}

impl Version {
    pub fn api(self) -> Api {
        if self.is_es() {
            Api::GlEs
        } else {
            Api::Gl
        }
    }

    pub fn is_es(self) -> bool {
        matches!(self, Version::GLES200 | Version::GLES300)
    }

    pub fn major_minor(self) -> (u8, u8) {
        match self {
            Version::GL210 => (2, 1),
            Version::GL300 => (3, 0),
            Version::GL310 => (3, 1),
            Version::GL320 => (3, 2),
            Version::GL330 => (3, 3),
            Version::GL400 => (4, 0),
            Version::GL410 => (4, 1),
            Version::GL420 => (4, 2),
            Version::GL430 => (4, 3),
            Version::GL440 => (4, 4),
            Version::GLES200 => (2, 0),
            Version::GLES300 => (3, 0),
        }
    }

    /// The `#version` line of the matching GLSL dialect.
    pub fn glsl_directive(self) -> &'static str {
        match self {
            Version::GL210 => "#version 120",
            Version::GL300 => "#version 130",
            Version::GL310 => "#version 140",
            Version::GL320 => "#version 150",
            Version::GL330 => "#version 330",
            Version::GL400 => "#version 400",
            Version::GL410 => "#version 410",
            Version::GL420 => "#version 420",
            Version::GL430 => "#version 430",
            Version::GL440 => "#version 440",
            Version::GLES200 => "#version 100",
            Version::GLES300 => "#version 300 es",
        }
    }

    /// Whether the GLSL dialect has `in`/`out` qualifiers and `texture()`.
    pub fn has_new_glsl(self) -> bool {
        !matches!(self, Version::GL210 | Version::GLES200)
    }

    /// Whether a context of the given version can run this one.
    pub fn is_supported_by(self, context: &GlVersion) -> bool {
        let GlVersion(api, major, minor) = *context;
        api == self.api() && (major, minor) >= self.major_minor()
    }
}

/// Returns the first of `candidates` the context supports, or the baseline
/// version of the context's API when none is.
pub fn supported_version(context: &GlVersion, candidates: &[Version]) -> Version {
    candidates
        .iter()
        .copied()
        .find(|v| v.is_supported_by(context))
        .unwrap_or(match context.0 {
            Api::Gl => Version::GL210,
            Api::GlEs => Version::GLES200,
        })
}

/// Represents an error in reading a version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The string has no `major.minor` number where one was expected.
    Malformed(String),

    /// The version is older than anything supported.
    Unsupported(GlVersion),
}

impl Display for VersionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            VersionError::Malformed(s) => write!(f, "Unrecognized version string \"{}\"", s),
            VersionError::Unsupported(GlVersion(api, major, minor)) => {
                write!(f, "Unsupported {:?} version {}.{}", api, major, minor)
            }
        }
    }
}

impl StdError for VersionError {}

/// Parses a `GL_VERSION` string such as `"4.6.0 NVIDIA 460.32"` or
/// `"OpenGL ES 3.2 Mesa 20.0"`.
///
/// WebGL 1 contexts report their own version, which is OpenGL ES 2.0.
pub fn parse_version_string(version_string: &str) -> Result<GlVersion, VersionError> {
    if version_string.contains("WebGL 1") {
        return Ok(GlVersion(Api::GlEs, 2, 0));
    }

    let malformed = || VersionError::Malformed(version_string.to_string());

    let (api, rest) = match version_string.strip_prefix("OpenGL ES ") {
        Some(rest) => (Api::GlEs, rest),
        None => (Api::Gl, version_string),
    };

    let number = rest.split_whitespace().next().ok_or_else(malformed)?;
    let mut parts = number.split('.');
    let major = parts
        .next()
        .and_then(|p| p.parse::<u8>().ok())
        .ok_or_else(malformed)?;
    let minor = parts
        .next()
        .and_then(|p| p.parse::<u8>().ok())
        .ok_or_else(malformed)?;

    let version = GlVersion(api, major, minor);
    let baseline = match api {
        Api::Gl => Version::GL210,
        Api::GlEs => Version::GLES200,
    };
    if baseline.is_supported_by(&version) {
        Ok(version)
    } else {
        Err(VersionError::Unsupported(version))
    }
}
