//! 実際のアプリケーション挙動を記述する。

mod model;

use model::Model;

use glossy::{
    config::ViewerConfig,
    gl::{load_texture, GliumProgram},
    shaders::Phong,
};
use std::{path::PathBuf, rc::Rc, time::Duration};

use anyhow::Result;
use glium::{
    draw_parameters::BackfaceCullingMode, Depth, DepthTest, Display, DrawParameters, Frame,
    Surface, Texture2d,
};
use log::info;
use ultraviolet::{projection::perspective_gl, Mat3, Mat4, Vec3};

pub struct Application {
    config: ViewerConfig,
    elapsed_time: Duration,
    phong: Phong<GliumProgram>,
    model: Model,
}

impl Application {
    pub fn new(display: &Display, config: ViewerConfig) -> Result<Application> {
        let model = Model::cube(display, config.mesh.inside_out)?;

        let material = &config.material;
        let flags = material.flags();
        info!("Material uses {:?}", flags);

        let ambient = Application::load_optional_texture(display, &material.ambient_texture)?;
        let diffuse = Application::load_optional_texture(display, &material.diffuse_texture)?;
        let specular = Application::load_optional_texture(display, &material.specular_texture)?;

        let aspect = config.window.width as f32 / config.window.height as f32;
        let projection = perspective_gl(config.camera.fov.to_radians(), aspect, 0.1, 100.0);

        let mut phong = Phong::build(display, flags)?;
        phong
            .set_ambient_color(material.ambient_color())
            .set_diffuse_color(material.diffuse_color())
            .set_specular_color(material.specular_color())
            .set_shininess(material.shininess)
            .set_textures(ambient, diffuse, specular)
            .set_light_position(config.light.position())
            .set_light_color(config.light.color())
            .set_projection_matrix(projection);

        Ok(Application {
            config,
            elapsed_time: Duration::new(0, 0),
            phong,
            model,
        })
    }

    /// 毎フレーム呼び出される。シーン内の情報を更新する。
    pub fn tick(&mut self, delta: Duration) {
        self.elapsed_time += delta;
    }

    /// キューブを描画する。
    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let angle = self.elapsed_time.as_secs_f32() * self.config.camera.rotation_speed;
        let rotation = Mat4::from_rotation_y(angle) * Mat4::from_rotation_x(angle * 0.5);
        let translation = Mat4::from_translation(Vec3::new(0.0, 0.0, -self.config.camera.distance));

        self.phong
            .set_transformation_matrix(translation * rotation)
            .set_normal_matrix(rotation_part(&rotation));

        let params = DrawParameters {
            depth: Depth {
                test: DepthTest::IfLess,
                write: true,
                ..Default::default()
            },
            backface_culling: BackfaceCullingMode::CullClockwise,
            ..Default::default()
        };

        let program = self.phong.program();
        frame.draw(
            self.model.vertex_buffer(),
            self.model.index_buffer(),
            program.program(),
            program,
            &params,
        )?;

        Ok(())
    }

    fn load_optional_texture(
        display: &Display,
        path: &Option<PathBuf>,
    ) -> Result<Option<Rc<Texture2d>>> {
        path.as_ref().map(|p| load_texture(display, p)).transpose()
    }
}

/// Upper-left 3x3 of a rotation, which is its own normal matrix.
fn rotation_part(matrix: &Mat4) -> Mat3 {
    let [x, y, z, _] = matrix.cols;
    Mat3::new(
        Vec3::new(x.x, x.y, x.z),
        Vec3::new(y.x, y.y, y.z),
        Vec3::new(z.x, z.y, z.z),
    )
}
