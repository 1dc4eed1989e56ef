//! 描画用モデルに関係するモジュール。

use glossy::{gl::PhongVertex, mesh_tools::flip_normals_and_winding};

use anyhow::Result;
use glium::{backend::Facade, index::PrimitiveType, IndexBuffer, VertexBuffer};
use log::info;
use ultraviolet::Vec3;

/// VBO/IBO 化したモデルの情報を表す。
#[derive(Debug)]
pub struct Model {
    vertex_buffer: VertexBuffer<PhongVertex>,
    index_buffer: IndexBuffer<u32>,
}

impl Model {
    /// 原点を中心とする一辺 2 のキューブを生成する。
    pub fn cube(facade: &impl Facade, inside_out: bool) -> Result<Model> {
        let (mut vertices, mut indices) = cube_geometry();

        if inside_out {
            let mut normals: Vec<Vec3> = vertices.iter().map(|v| v.normal.into()).collect();
            flip_normals_and_winding(&mut indices, &mut normals)?;
            for (vertex, normal) in vertices.iter_mut().zip(normals) {
                vertex.normal = normal.into();
            }
        }

        Model::from_buffers(facade, &vertices, &indices)
    }

    /// VBO を返す。
    pub fn vertex_buffer(&self) -> &VertexBuffer<PhongVertex> {
        &self.vertex_buffer
    }

    /// IBO を返す。
    pub fn index_buffer(&self) -> &IndexBuffer<u32> {
        &self.index_buffer
    }

    fn from_buffers(
        facade: &impl Facade,
        vertices: &[PhongVertex],
        indices: &[u32],
    ) -> Result<Model> {
        let vertex_buffer = VertexBuffer::new(facade, vertices)?;
        let index_buffer = IndexBuffer::new(facade, PrimitiveType::TrianglesList, indices)?;

        info!("Model created; {} vertices", vertices.len());

        Ok(Model {
            vertex_buffer,
            index_buffer,
        })
    }
}

/// Faces wound counter-clockwise when seen from outside.
fn cube_geometry() -> (Vec<PhongVertex>, Vec<u32>) {
    // (normal, u, v) with u × v = normal
    let faces = [
        (Vec3::unit_x(), -Vec3::unit_z(), Vec3::unit_y()),
        (-Vec3::unit_x(), Vec3::unit_z(), Vec3::unit_y()),
        (Vec3::unit_y(), Vec3::unit_x(), -Vec3::unit_z()),
        (-Vec3::unit_y(), Vec3::unit_x(), Vec3::unit_z()),
        (Vec3::unit_z(), Vec3::unit_x(), Vec3::unit_y()),
        (-Vec3::unit_z(), -Vec3::unit_x(), Vec3::unit_y()),
    ];
    let corners: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces.iter() {
        let vertex_base = vertices.len() as u32;
        for (s, t) in corners.iter() {
            let position = *normal + *u * *s + *v * *t;
            vertices.push(PhongVertex {
                position: position.into(),
                normal: (*normal).into(),
                uv: [(s + 1.0) / 2.0, (t + 1.0) / 2.0],
            });
        }
        for offset in [0, 1, 2, 0, 2, 3].iter() {
            indices.push(vertex_base + offset);
        }
    }

    (vertices, indices)
}
