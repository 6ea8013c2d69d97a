//! Render targets and the render context
//!
//! A render target accepts things to draw and turns them into device commands
//! right away. [`DeviceTarget`] is the target over a concrete
//! [`GraphicsDevice`] for one camera; [`RenderContext`] owns the device and the
//! text rasterizer and hands out a target per frame or tile.

use crate::config::ConfigError;
use crate::core::config::{DebugDrawConfig, RendererConfig, TextConfig};
use crate::debug::draw::{draw_arrow_with_threshold, DebugShape};
use crate::foundation::color::Color;
use crate::foundation::math::{Triangle, Vec3};
use crate::render::camera::{
    set_camera_matrices, set_projection_matrices_for_part, Camera, Projection, ViewportPart,
};
use crate::render::device::GraphicsDevice;
use crate::render::material::Material;
use crate::render::primitive::{self, Primitive, PrimitiveType};
use crate::render::recording::{
    CommandRecorder, DeviceCommand, RecordedTextRasterizer, TextCommand,
};
use crate::render::text::{draw_screen_text, draw_world_text, TextLabel, TextRasterizer};
use crate::render::RenderResult;

/// Something that can draw itself onto a graphics device
pub trait Renderable {
    /// Issue the commands for this object
    ///
    /// # Errors
    /// Any [`RenderError`](crate::render::RenderError) raised while
    /// validating the object's data.
    fn render(&self, device: &mut dyn GraphicsDevice, camera: &Camera) -> RenderResult<()>;
}

impl Renderable for Primitive {
    fn render(&self, device: &mut dyn GraphicsDevice, _camera: &Camera) -> RenderResult<()> {
        self.draw(device)
    }
}

/// A destination that renders values of type `R`
pub trait RenderTarget<R: ?Sized> {
    /// Render one value immediately
    ///
    /// # Errors
    /// Whatever rendering `renderable` reports.
    fn render(&mut self, renderable: &R) -> RenderResult<()>;
}

/// Target for lit primitives
///
/// Only [`PrimitiveTarget::draw_primitive`] is required; the other methods are
/// shorthands built on it.
pub trait PrimitiveTarget {
    /// Draw one lit primitive
    ///
    /// # Errors
    /// [`RenderError::VertexNormalMismatch`](crate::render::RenderError::VertexNormalMismatch)
    /// if the streams differ in length.
    fn draw_primitive(
        &mut self,
        kind: PrimitiveType,
        material: &Material,
        vertices: &[Vec3],
        normals: &[Vec3],
    ) -> RenderResult<()>;

    /// Draw a lit triangle strip
    ///
    /// # Errors
    /// See [`PrimitiveTarget::draw_primitive`].
    fn draw_triangle_strip(
        &mut self,
        material: &Material,
        vertices: &[Vec3],
        normals: &[Vec3],
    ) -> RenderResult<()> {
        self.draw_primitive(PrimitiveType::TriangleStrip, material, vertices, normals)
    }

    /// Draw a lit triangle fan
    ///
    /// # Errors
    /// See [`PrimitiveTarget::draw_primitive`].
    fn draw_triangle_fan(
        &mut self,
        material: &Material,
        vertices: &[Vec3],
        normals: &[Vec3],
    ) -> RenderResult<()> {
        self.draw_primitive(PrimitiveType::TriangleFan, material, vertices, normals)
    }

    /// Draw lit triangles, each shaded with its own face normal
    ///
    /// # Errors
    /// See [`PrimitiveTarget::draw_primitive`].
    fn draw_triangles(&mut self, material: &Material, triangles: &[Triangle]) -> RenderResult<()> {
        let normals: Vec<Vec3> = triangles.iter().flat_map(|t| [t.normal(); 3]).collect();
        self.draw_triangles_with_normals(material, triangles, &normals)
    }

    /// Draw lit triangles with three explicit normals per triangle
    ///
    /// # Errors
    /// See [`PrimitiveTarget::draw_primitive`].
    fn draw_triangles_with_normals(
        &mut self,
        material: &Material,
        triangles: &[Triangle],
        normals: &[Vec3],
    ) -> RenderResult<()> {
        let vertices: Vec<Vec3> = triangles.iter().flat_map(Triangle::vertices).collect();
        self.draw_primitive(PrimitiveType::Triangles, material, &vertices, normals)
    }

    /// Draw a lit convex polygon
    ///
    /// # Errors
    /// See [`PrimitiveTarget::draw_primitive`].
    fn draw_convex_polygon(
        &mut self,
        material: &Material,
        vertices: &[Vec3],
        normals: &[Vec3],
    ) -> RenderResult<()> {
        self.draw_primitive(PrimitiveType::ConvexPolygon, material, vertices, normals)
    }

    /// Draw a primitive value
    ///
    /// # Errors
    /// See [`Primitive::validate`]. Nothing is drawn in that case.
    fn draw(&mut self, primitive: &Primitive) -> RenderResult<()> {
        primitive.validate()?;
        self.draw_primitive(
            primitive.kind,
            &primitive.material,
            &primitive.vertices,
            &primitive.normals,
        )
    }
}

/// Render target drawing straight onto a device for one camera
pub struct DeviceTarget<'a, D: GraphicsDevice> {
    device: &'a mut D,
    camera: Camera,
    debug: DebugDrawConfig,
}

impl<'a, D: GraphicsDevice> DeviceTarget<'a, D> {
    /// Create a target; the device's transforms are left as they are
    pub fn new(device: &'a mut D, camera: Camera, debug: DebugDrawConfig) -> Self {
        Self { device, camera, debug }
    }

    /// Camera handed to renderables
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Underlying device
    pub fn device(&mut self) -> &mut D {
        &mut *self.device
    }

    /// Render every object in order, stopping at the first failure
    ///
    /// # Errors
    /// The first error reported by a renderable. Objects before it have been
    /// drawn, the ones after it have not.
    pub fn render_all(&mut self, renderables: &[&dyn Renderable]) -> RenderResult<()> {
        for (index, renderable) in renderables.iter().enumerate() {
            if let Err(err) = self.render(*renderable) {
                log::error!("Renderable {index} of {} failed: {err}", renderables.len());
                return Err(err);
            }
        }
        log::debug!("Rendered {} objects", renderables.len());
        Ok(())
    }

    /// Draw a debug shape with this target's debug settings
    ///
    /// # Errors
    /// See [`DebugShape::draw`].
    pub fn draw_debug(&mut self, shape: &DebugShape) -> RenderResult<()> {
        shape.draw(&mut *self.device, &self.debug)
    }

    /// Draw an arrow with this target's vertical threshold
    ///
    /// # Errors
    /// See [`crate::debug::draw::draw_arrow`].
    pub fn draw_arrow(
        &mut self,
        color: Color,
        head_length: f64,
        points: &[Vec3],
    ) -> RenderResult<()> {
        let threshold = self.debug.arrow_vertical_threshold;
        draw_arrow_with_threshold(&mut *self.device, color, head_length, threshold, points)
    }
}

impl<D: GraphicsDevice, R: Renderable + ?Sized> RenderTarget<R> for DeviceTarget<'_, D> {
    fn render(&mut self, renderable: &R) -> RenderResult<()> {
        renderable.render(&mut *self.device, &self.camera)
    }
}

impl<D: GraphicsDevice> PrimitiveTarget for DeviceTarget<'_, D> {
    fn draw_primitive(
        &mut self,
        kind: PrimitiveType,
        material: &Material,
        vertices: &[Vec3],
        normals: &[Vec3],
    ) -> RenderResult<()> {
        primitive::draw_primitive(&mut *self.device, kind, material, vertices, normals)
    }
}

/// Owner of a graphics device and the single text rasterizer
///
/// The rasterizer is created together with the context from its
/// [`TextConfig`] and lives exactly as long as the context.
pub struct RenderContext<D, T> {
    device: D,
    text: T,
    config: RendererConfig,
}

impl<D: GraphicsDevice, T: TextRasterizer> RenderContext<D, T> {
    /// Create a context, building the text rasterizer from the text settings
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] if `config` does not validate.
    pub fn new<F>(
        device: D,
        config: RendererConfig,
        create_rasterizer: F,
    ) -> Result<Self, ConfigError>
    where
        F: FnOnce(&TextConfig) -> T,
    {
        config.validate()?;
        let text = create_rasterizer(&config.text);
        log::info!(
            "Render context ready: font {} {}pt, {}x{} tiles",
            config.text.font_family,
            config.text.font_size,
            config.tiling.columns,
            config.tiling.rows
        );
        Ok(Self { device, text, config })
    }

    /// Active configuration
    pub const fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Graphics device
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Graphics device, mutably
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Text rasterizer
    pub const fn text_rasterizer(&self) -> &T {
        &self.text
    }

    /// Replace the device's view transform
    ///
    /// # Errors
    /// See [`set_camera_matrices`].
    pub fn set_camera(&mut self, camera: &Camera) -> RenderResult<()> {
        set_camera_matrices(&mut self.device, camera)
    }

    /// Replace the device's projection transform for the full output
    ///
    /// # Errors
    /// See [`crate::render::camera::set_projection_matrices`].
    pub fn set_projection(&mut self, projection: &Projection) -> RenderResult<()> {
        self.set_projection_for_part(projection, &ViewportPart::FULL)
    }

    /// Replace the device's projection transform for one part of the output
    ///
    /// # Errors
    /// See [`set_projection_matrices_for_part`].
    pub fn set_projection_for_part(
        &mut self,
        projection: &Projection,
        part: &ViewportPart,
    ) -> RenderResult<()> {
        set_projection_matrices_for_part(&mut self.device, projection, part)
    }

    /// Target for `camera` without touching the device transforms
    pub fn target(&mut self, camera: Camera) -> DeviceTarget<'_, D> {
        DeviceTarget::new(&mut self.device, camera, self.config.debug_draw.clone())
    }

    /// Set up both transforms for `part` and return a target for the frame.
    ///
    /// # Errors
    /// See [`Camera::validate`] and [`set_projection_matrices_for_part`].
    /// Neither transform is touched when the camera or the projection is
    /// rejected.
    pub fn frame(
        &mut self,
        camera: Camera,
        projection: &Projection,
        part: &ViewportPart,
    ) -> RenderResult<DeviceTarget<'_, D>> {
        camera.validate()?;
        self.set_projection_for_part(projection, part)?;
        self.set_camera(&camera)?;
        Ok(self.target(camera))
    }

    /// Draw text anchored in the scene with the configured world scale
    pub fn draw_world_text(&mut self, text: &str, position: Vec3, color: Color) {
        draw_world_text(&mut self.text, text, position, color, self.config.text.world_scale);
    }

    /// Draw text at pixel coordinates of a viewport
    pub fn draw_screen_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        viewport_width: u32,
        viewport_height: u32,
        color: Color,
    ) {
        draw_screen_text(&mut self.text, text, x, y, viewport_width, viewport_height, color);
    }

    /// Draw a label with the configured world scale
    pub fn draw_label(&mut self, label: &TextLabel) {
        label.draw(&mut self.text, self.config.text.world_scale);
    }

    /// Take the device and rasterizer back
    pub fn into_parts(self) -> (D, T) {
        (self.device, self.text)
    }
}

impl RenderContext<CommandRecorder, RecordedTextRasterizer> {
    /// Context over the recording device and rasterizer
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] if `config` does not validate.
    pub fn recording(config: RendererConfig) -> Result<Self, ConfigError> {
        Self::new(CommandRecorder::new(), config, |text| {
            RecordedTextRasterizer::new(text.font_family.clone(), text.font_size)
        })
    }

    /// Recorded device and text commands so far, leaving both logs empty
    pub fn take_recordings(&mut self) -> (Vec<DeviceCommand>, Vec<TextCommand>) {
        (self.device.take_commands(), self.text.take_commands())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::device::DrawMode;
    use crate::render::RenderError;

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 50.0, -50.0), Vec3::zeros())
    }

    fn triangle_strip() -> Primitive {
        Primitive::new(
            PrimitiveType::TriangleStrip,
            vec![Vec3::zeros(), Vec3::x(), Vec3::z(), Vec3::new(1.0, 0.0, 1.0)],
            vec![Vec3::y(); 4],
            Material::default(),
        )
    }

    #[test]
    fn test_renderables_are_drawn_in_order() {
        let mut device = CommandRecorder::new();
        let primitive = triangle_strip();
        let shape = DebugShape::Points {
            color: Color::RED,
            points: vec![Vec3::zeros()],
        };

        let mut target = DeviceTarget::new(&mut device, camera(), DebugDrawConfig::default());
        target.render_all(&[&primitive, &shape]).unwrap();

        let modes: Vec<DrawMode> = device.batches().iter().map(|b| b.mode).collect();
        assert_eq!(modes, vec![DrawMode::TriangleStrip, DrawMode::Points]);
    }

    #[test]
    fn test_render_all_stops_at_first_error() {
        let mut device = CommandRecorder::new();
        let broken = Primitive::new(
            PrimitiveType::Triangles,
            vec![Vec3::zeros(); 3],
            vec![],
            Material::default(),
        );
        let good = triangle_strip();

        let mut target = DeviceTarget::new(&mut device, camera(), DebugDrawConfig::default());
        let result = target.render_all(&[&good, &broken, &good]);

        assert!(matches!(
            result,
            Err(RenderError::VertexNormalMismatch { vertices: 3, normals: 0 })
        ));
        assert_eq!(device.draw_call_count(), 1);
    }

    #[test]
    fn test_primitive_target_helpers() {
        let mut device = CommandRecorder::new();
        let material = Material::default();
        let triangles = [Triangle::new(Vec3::zeros(), Vec3::z(), Vec3::x())];
        let square = [Vec3::zeros(), Vec3::x(), Vec3::new(1.0, 0.0, 1.0), Vec3::z()];
        let up = [Vec3::y(); 4];

        let mut target = DeviceTarget::new(&mut device, camera(), DebugDrawConfig::default());
        target.draw_triangles(&material, &triangles).unwrap();
        target.draw_triangle_fan(&material, &square, &up).unwrap();
        target.draw_convex_polygon(&material, &square, &up).unwrap();
        target.draw(&triangle_strip()).unwrap();
        assert!(target.draw_triangle_strip(&material, &square, &up[..3]).is_err());

        let batches = device.batches();
        let modes: Vec<DrawMode> = batches.iter().map(|b| b.mode).collect();
        assert_eq!(
            modes,
            vec![
                DrawMode::Triangles,
                DrawMode::TriangleFan,
                DrawMode::Polygon,
                DrawMode::TriangleStrip,
            ]
        );

        // winding gives an upward face normal, which the mirror leaves unchanged
        assert_eq!(batches[0].normals, vec![Vec3::y(); 3]);
    }

    #[test]
    fn test_frame_sets_both_transforms() {
        let mut context = RenderContext::recording(RendererConfig::default()).unwrap();
        let projection = Projection::orthographic(1.0, 100.0, 1.0, 500.0);

        {
            let mut target = context.frame(camera(), &projection, &ViewportPart::FULL).unwrap();
            target.render(&triangle_strip()).unwrap();
        }

        let commands = context.device().commands();
        assert!(matches!(commands[0], DeviceCommand::LoadProjection(_)));
        assert!(matches!(commands[1], DeviceCommand::LoadView(_)));
        assert!(context.device().state().view.is_some());
    }

    #[test]
    fn test_rejected_frame_leaves_device_untouched() {
        let mut context = RenderContext::recording(RendererConfig::default()).unwrap();
        let projection = Projection::perspective(1.0, 60.0, 1.0, 500.0);

        let result = context.frame(camera(), &projection, &ViewportPart::new(0.0, 0.5, 0.0, 0.5));

        assert!(result.is_err());
        assert!(context.device().commands().is_empty());
    }

    #[test]
    fn test_degenerate_camera_frame_leaves_device_untouched() {
        let mut context = RenderContext::recording(RendererConfig::default()).unwrap();
        let projection = Projection::orthographic(1.0, 100.0, 1.0, 500.0);
        let cameras = [
            Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 2.0, 3.0)),
            Camera::new(Vec3::new(0.0, 80.0, 0.0), Vec3::zeros()),
        ];

        for camera in cameras {
            let result = context.frame(camera, &projection, &ViewportPart::FULL);
            assert!(matches!(result, Err(RenderError::InvalidArgument(_))));
            assert!(context.set_camera(&camera).is_err());
        }

        assert!(context.device().commands().is_empty());
        assert_eq!(context.device().state().view, None);
        assert_eq!(context.device().state().projection, None);
    }

    #[test]
    fn test_short_primitive_is_rejected_before_drawing() {
        let mut device = CommandRecorder::new();
        let short = Primitive::new(
            PrimitiveType::Triangles,
            vec![Vec3::zeros(), Vec3::x()],
            vec![Vec3::y(); 2],
            Material::default(),
        );

        let mut target = DeviceTarget::new(&mut device, camera(), DebugDrawConfig::default());
        let result = target.render(&short);
        assert!(matches!(
            result,
            Err(RenderError::TooFewVertices {
                kind: PrimitiveType::Triangles,
                required: 3,
                actual: 2,
            })
        ));
        assert!(matches!(target.draw(&short), Err(RenderError::TooFewVertices { .. })));

        assert!(device.commands().is_empty());
    }

    #[test]
    fn test_context_text_uses_configured_scale() {
        let config = RendererConfig::default().with_world_text_scale(0.25).with_font("Serif", 16);
        let mut context = RenderContext::recording(config).unwrap();

        context.draw_world_text("peak", Vec3::new(0.0, 0.0, 2.0), Color::WHITE);
        context.draw_screen_text("hud", 5, 5, 640, 480, Color::WHITE);
        context.draw_label(&TextLabel::world("label", Vec3::zeros(), Color::BLUE));

        assert_eq!(context.text_rasterizer().font_family(), "Serif");
        assert_eq!(context.text_rasterizer().font_size(), 16);
        assert!(context
            .text_rasterizer()
            .commands()
            .iter()
            .filter(|c| matches!(c, TextCommand::Draw3d { .. }))
            .all(|c| matches!(c, TextCommand::Draw3d { scale, .. } if *scale == 0.25)));

        let (device_commands, text_commands) = context.take_recordings();
        assert!(device_commands.is_empty());
        assert_eq!(text_commands.len(), 12);
        assert!(context.text_rasterizer().commands().is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = RendererConfig::default().with_tiles(0, 2);
        assert!(RenderContext::recording(config).is_err());
    }

    #[test]
    fn test_target_uses_configured_arrow_threshold() {
        let config = RendererConfig::default().with_arrow_vertical_threshold(0.9);
        let mut context = RenderContext::recording(config).unwrap();
        let points = [Vec3::zeros(), Vec3::new(0.0, 1.0, 1.0)];

        context.target(camera()).draw_arrow(Color::RED, 1.0, &points).unwrap();

        let batches = context.device().batches();
        let fin = &batches[1].vertices;
        approx::assert_relative_eq!(fin[1].x - fin[2].x, 1.0);
    }
}
