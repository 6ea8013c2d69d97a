//! Command-recording backend
//!
//! [`CommandRecorder`] implements [`GraphicsDevice`] by appending every call to
//! a command log and tracking the pipeline state the calls leave behind.
//! [`RecordedTextRasterizer`] does the same for text. Together they form a
//! complete backend: logs can be inspected, grouped into draw batches,
//! serialized to RON and replayed by an external device.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, Vec3};
use crate::render::device::{DrawMode, GraphicsDevice, MaterialChannel, MaterialFace, ShadeModel};
use crate::render::text::TextRasterizer;

/// One recorded device call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceCommand {
    /// Batch start
    Begin(DrawMode),
    /// Batch end
    End,
    /// Vertex position
    Vertex(Vec3),
    /// Current normal
    Normal(Vec3),
    /// Current flat color
    Color([f32; 4]),
    /// Line width
    LineWidth(f32),
    /// Shading mode
    ShadeModel(ShadeModel),
    /// Material reflectance
    Material {
        /// Affected faces
        face: MaterialFace,
        /// Reflectance channel
        channel: MaterialChannel,
        /// Color
        rgba: [f32; 4],
    },
    /// View transform replacement
    LoadView(Mat4),
    /// Projection transform replacement
    LoadProjection(Mat4),
}

/// Pipeline state resulting from the recorded commands
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    /// Mode of the batch currently open, if any
    pub open_batch: Option<DrawMode>,
    /// Current flat color
    pub color: Option<[f32; 4]>,
    /// Current line width
    pub line_width: f32,
    /// Current shading mode
    pub shade_model: Option<ShadeModel>,
    /// Front-face ambient reflectance
    pub front_ambient: Option<[f32; 4]>,
    /// Front-face diffuse reflectance
    pub front_diffuse: Option<[f32; 4]>,
    /// Back-face ambient reflectance
    pub back_ambient: Option<[f32; 4]>,
    /// Back-face diffuse reflectance
    pub back_diffuse: Option<[f32; 4]>,
    /// Current view transform
    pub view: Option<Mat4>,
    /// Current projection transform
    pub projection: Option<Mat4>,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            open_batch: None,
            color: None,
            line_width: 1.0,
            shade_model: None,
            front_ambient: None,
            front_diffuse: None,
            back_ambient: None,
            back_diffuse: None,
            view: None,
            projection: None,
        }
    }
}

/// A completed begin/end sequence
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    /// Draw mode
    pub mode: DrawMode,
    /// Flat color in effect when the batch started
    pub color: Option<[f32; 4]>,
    /// Line width in effect when the batch started
    pub line_width: f32,
    /// Vertices in submission order
    pub vertices: Vec<Vec3>,
    /// Normals submitted inside the batch, in submission order
    pub normals: Vec<Vec3>,
}

impl DrawBatch {
    /// Vertex positions narrowed to single precision
    #[allow(clippy::cast_possible_truncation)]
    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.vertices.iter().map(|v| [v.x as f32, v.y as f32, v.z as f32]).collect()
    }

    /// Vertex positions as a tightly packed byte buffer, ready for upload
    pub fn position_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.positions()).to_vec()
    }
}

/// Graphics device that records every call
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    commands: Vec<DeviceCommand>,
    state: DeviceState,
}

impl CommandRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in call order
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Current pipeline state
    pub const fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Remove and return the recorded commands, keeping the pipeline state
    pub fn take_commands(&mut self) -> Vec<DeviceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Forget commands and reset the pipeline state
    pub fn clear(&mut self) {
        self.commands.clear();
        self.state = DeviceState::default();
    }

    /// Number of completed draw batches
    pub fn draw_call_count(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, DeviceCommand::End)).count()
    }

    /// Group the log into completed draw batches
    pub fn batches(&self) -> Vec<DrawBatch> {
        let mut batches = Vec::new();
        let mut color = None;
        let mut line_width = 1.0;
        let mut current: Option<DrawBatch> = None;

        for command in &self.commands {
            match command {
                DeviceCommand::Begin(mode) => {
                    current = Some(DrawBatch {
                        mode: *mode,
                        color,
                        line_width,
                        vertices: Vec::new(),
                        normals: Vec::new(),
                    });
                }
                DeviceCommand::End => batches.extend(current.take()),
                DeviceCommand::Vertex(v) => {
                    if let Some(batch) = current.as_mut() {
                        batch.vertices.push(*v);
                    }
                }
                DeviceCommand::Normal(n) => {
                    if let Some(batch) = current.as_mut() {
                        batch.normals.push(*n);
                    }
                }
                DeviceCommand::Color(rgba) => color = Some(*rgba),
                DeviceCommand::LineWidth(width) => line_width = *width,
                _ => {}
            }
        }
        batches
    }

    /// Serialize the command log as pretty-printed RON
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(&self.commands, ron::ser::PrettyConfig::default())
    }

    fn record(&mut self, command: DeviceCommand) {
        self.commands.push(command);
    }
}

impl GraphicsDevice for CommandRecorder {
    fn begin(&mut self, mode: DrawMode) {
        if let Some(open) = self.state.open_batch {
            log::warn!("Batch {mode:?} started while {open:?} is still open");
        }
        self.state.open_batch = Some(mode);
        self.record(DeviceCommand::Begin(mode));
    }

    fn end(&mut self) {
        if self.state.open_batch.take().is_none() {
            log::warn!("Batch ended without a matching begin");
        }
        self.record(DeviceCommand::End);
    }

    fn vertex(&mut self, position: Vec3) {
        self.record(DeviceCommand::Vertex(position));
    }

    fn normal(&mut self, normal: Vec3) {
        self.record(DeviceCommand::Normal(normal));
    }

    fn color(&mut self, rgba: [f32; 4]) {
        self.state.color = Some(rgba);
        self.record(DeviceCommand::Color(rgba));
    }

    fn line_width(&mut self, width: f32) {
        self.state.line_width = width;
        self.record(DeviceCommand::LineWidth(width));
    }

    fn shade_model(&mut self, model: ShadeModel) {
        self.state.shade_model = Some(model);
        self.record(DeviceCommand::ShadeModel(model));
    }

    fn material(&mut self, face: MaterialFace, channel: MaterialChannel, rgba: [f32; 4]) {
        let slots = [
            (MaterialFace::FRONT, MaterialChannel::Ambient, &mut self.state.front_ambient),
            (MaterialFace::FRONT, MaterialChannel::Diffuse, &mut self.state.front_diffuse),
            (MaterialFace::BACK, MaterialChannel::Ambient, &mut self.state.back_ambient),
            (MaterialFace::BACK, MaterialChannel::Diffuse, &mut self.state.back_diffuse),
        ];
        for (slot_face, slot_channel, slot) in slots {
            if face.contains(slot_face) && channel == slot_channel {
                *slot = Some(rgba);
            }
        }
        self.record(DeviceCommand::Material { face, channel, rgba });
    }

    fn load_view_matrix(&mut self, view: Mat4) {
        self.state.view = Some(view);
        self.record(DeviceCommand::LoadView(view));
    }

    fn load_projection_matrix(&mut self, projection: Mat4) {
        self.state.projection = Some(projection);
        self.record(DeviceCommand::LoadProjection(projection));
    }
}

/// One recorded text rasterizer call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextCommand {
    /// Text color
    SetColor([f32; 4]),
    /// World-space scope start
    Begin3d,
    /// World-space text
    Draw3d {
        /// Text
        text: String,
        /// Backend-space anchor
        position: Vec3,
        /// Pixel to world scale
        scale: f32,
    },
    /// World-space scope end
    End3d,
    /// Screen-space scope start
    Begin2d {
        /// Viewport width in pixels
        viewport_width: u32,
        /// Viewport height in pixels
        viewport_height: u32,
    },
    /// Screen-space text
    Draw2d {
        /// Text
        text: String,
        /// Horizontal pixel coordinate
        x: i32,
        /// Vertical pixel coordinate
        y: i32,
    },
    /// Screen-space scope end
    End2d,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextScope {
    World,
    Screen,
}

/// Text rasterizer that records every call
#[derive(Debug, Clone)]
pub struct RecordedTextRasterizer {
    font_family: String,
    font_size: u32,
    scope: Option<TextScope>,
    commands: Vec<TextCommand>,
}

impl RecordedTextRasterizer {
    /// Create a rasterizer for the given font
    pub fn new(font_family: impl Into<String>, font_size: u32) -> Self {
        let font_family = font_family.into();
        log::debug!("Text rasterizer created for {font_family} {font_size}pt");
        Self {
            font_family,
            font_size,
            scope: None,
            commands: Vec::new(),
        }
    }

    /// Font family name
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Font size in points
    pub const fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Recorded commands in call order
    pub fn commands(&self) -> &[TextCommand] {
        &self.commands
    }

    /// Remove and return the recorded commands
    pub fn take_commands(&mut self) -> Vec<TextCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Whether a 2D or 3D scope is currently open
    pub const fn in_scope(&self) -> bool {
        self.scope.is_some()
    }

    /// Every drawn string, in order
    pub fn drawn_texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                TextCommand::Draw3d { text, .. } | TextCommand::Draw2d { text, .. } => {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect()
    }

    fn enter(&mut self, scope: TextScope) {
        if let Some(open) = self.scope {
            log::warn!("Text scope {scope:?} entered while {open:?} is still open");
        }
        self.scope = Some(scope);
    }

    fn leave(&mut self, scope: TextScope) {
        if self.scope != Some(scope) {
            log::warn!("Text scope {scope:?} left but {:?} is open", self.scope);
        }
        self.scope = None;
    }
}

impl TextRasterizer for RecordedTextRasterizer {
    fn set_color(&mut self, rgba: [f32; 4]) {
        self.commands.push(TextCommand::SetColor(rgba));
    }

    fn begin_3d(&mut self) {
        self.enter(TextScope::World);
        self.commands.push(TextCommand::Begin3d);
    }

    fn draw_3d(&mut self, text: &str, position: Vec3, scale: f32) {
        self.commands.push(TextCommand::Draw3d {
            text: text.to_string(),
            position,
            scale,
        });
    }

    fn end_3d(&mut self) {
        self.leave(TextScope::World);
        self.commands.push(TextCommand::End3d);
    }

    fn begin_2d(&mut self, viewport_width: u32, viewport_height: u32) {
        self.enter(TextScope::Screen);
        self.commands.push(TextCommand::Begin2d {
            viewport_width,
            viewport_height,
        });
    }

    fn draw_2d(&mut self, text: &str, x: i32, y: i32) {
        self.commands.push(TextCommand::Draw2d {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn end_2d(&mut self) {
        self.leave(TextScope::Screen);
        self.commands.push(TextCommand::End2d);
    }
}

impl Drop for RecordedTextRasterizer {
    fn drop(&mut self) {
        log::debug!("Text rasterizer for {} {}pt released", self.font_family, self.font_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_group_vertices() {
        let mut device = CommandRecorder::new();
        device.color([1.0, 0.0, 0.0, 1.0]);
        device.begin(DrawMode::Points);
        device.vertex(Vec3::new(1.0, 2.0, 3.0));
        device.end();
        device.line_width(3.0);
        device.begin(DrawMode::LineStrip);
        device.vertex(Vec3::zeros());
        device.vertex(Vec3::x());
        device.end();

        let batches = device.batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(device.draw_call_count(), 2);
        assert_eq!(batches[0].mode, DrawMode::Points);
        assert_eq!(batches[0].color, Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(batches[0].line_width, 1.0);
        assert_eq!(batches[1].line_width, 3.0);
        assert_eq!(batches[1].vertices, vec![Vec3::zeros(), Vec3::x()]);
        assert_eq!(device.state().open_batch, None);
    }

    #[test]
    fn test_position_bytes_are_packed() {
        let batch = DrawBatch {
            mode: DrawMode::Triangles,
            color: None,
            line_width: 1.0,
            vertices: vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)],
            normals: Vec::new(),
        };

        let bytes = batch.position_bytes();
        assert_eq!(bytes.len(), 2 * 3 * std::mem::size_of::<f32>());

        let expected: [f32; 6] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(bytes.as_slice(), bytemuck::cast_slice::<f32, u8>(&expected));
    }

    #[test]
    fn test_material_face_state() {
        let mut device = CommandRecorder::new();
        device.material(MaterialFace::FRONT_AND_BACK, MaterialChannel::Diffuse, [0.5; 4]);
        device.material(MaterialFace::BACK, MaterialChannel::Ambient, [0.25; 4]);

        let state = device.state();
        assert_eq!(state.front_diffuse, Some([0.5; 4]));
        assert_eq!(state.back_diffuse, Some([0.5; 4]));
        assert_eq!(state.back_ambient, Some([0.25; 4]));
        assert_eq!(state.front_ambient, None);
    }

    #[test]
    fn test_log_round_trips_through_ron() {
        let mut device = CommandRecorder::new();
        device.shade_model(ShadeModel::Flat);
        device.material(MaterialFace::FRONT, MaterialChannel::Ambient, [0.1, 0.2, 0.3, 1.0]);
        device.load_view_matrix(Mat4::identity());
        device.begin(DrawMode::TriangleFan);
        device.normal(Vec3::y());
        device.vertex(Vec3::new(1.0, 0.0, -1.0));
        device.end();

        let text = device.to_ron().unwrap();
        let parsed: Vec<DeviceCommand> = ron::from_str(&text).unwrap();
        assert_eq!(parsed, device.commands());
    }

    #[test]
    fn test_clear_resets_state() {
        let mut device = CommandRecorder::new();
        device.line_width(4.0);
        device.shade_model(ShadeModel::Smooth);

        let taken = device.take_commands();
        assert_eq!(taken.len(), 2);
        assert!(device.commands().is_empty());
        assert_eq!(device.state().line_width, 4.0);

        device.clear();
        assert_eq!(device.state(), &DeviceState::default());
    }
}
