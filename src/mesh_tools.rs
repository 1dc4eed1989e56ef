//! Mesh data operations.

use std::{
    error::Error as StdError,
    fmt::{Display, Formatter, Result as FmtResult},
};

use ultraviolet::Vec3;

/// Represents an error in processing mesh data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshError {
    /// Triangle indices are not a multiple of 3.
    IndexCountNotDivisibleBy3(usize),
}

impl Display for MeshError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MeshError::IndexCountNotDivisibleBy3(count) => {
                write!(f, "Index count {} is not divisible by 3", count)
            }
        }
    }
}

impl StdError for MeshError {}

/// Reverses the winding of every triangle in a triangle list.
/// The indices are left untouched on error.
pub fn flip_face_winding(indices: &mut [u32]) -> Result<(), MeshError> {
    if indices.len() % 3 != 0 {
        return Err(MeshError::IndexCountNotDivisibleBy3(indices.len()));
    }

    for triangle in indices.chunks_exact_mut(3) {
        triangle.swap(1, 2);
    }
    Ok(())
}

/// Negates every normal.
pub fn flip_normals(normals: &mut [Vec3]) {
    for normal in normals {
        *normal = -*normal;
    }
}

/// Turns a mesh inside out.
pub fn flip_normals_and_winding(
    indices: &mut [u32],
    normals: &mut [Vec3],
) -> Result<(), MeshError> {
    flip_face_winding(indices)?;
    flip_normals(normals);
    Ok(())
}
