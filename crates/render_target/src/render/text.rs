//! Text overlay rendering
//!
//! Labels are drawn either at a 3D position in the scene or at fixed pixel
//! coordinates on screen. Glyph rasterization belongs to a [`TextRasterizer`];
//! this module only decides what is drawn, where, and in which space.
//!
//! A rasterizer is expensive to create. One instance is owned by the
//! [`RenderContext`](crate::render::target::RenderContext) for its whole
//! lifetime and handed explicitly to the functions here.

use serde::{Deserialize, Serialize};

use crate::foundation::color::Color;
use crate::foundation::math::Vec3;
use crate::render::coordinates::to_backend;

/// Text rasterizer with separate 3D and 2D drawing scopes
pub trait TextRasterizer {
    /// Set the color of subsequently drawn text (RGBA in `[0, 1]`)
    fn set_color(&mut self, rgba: [f32; 4]);

    /// Enter world-space text rendering
    fn begin_3d(&mut self);

    /// Draw text anchored at a backend-space position, scaled from pixels to world units
    fn draw_3d(&mut self, text: &str, position: Vec3, scale: f32);

    /// Leave world-space text rendering
    fn end_3d(&mut self);

    /// Enter screen-space text rendering for a viewport of the given pixel size
    fn begin_2d(&mut self, viewport_width: u32, viewport_height: u32);

    /// Draw text at pixel coordinates
    fn draw_2d(&mut self, text: &str, x: i32, y: i32);

    /// Leave screen-space text rendering
    fn end_2d(&mut self);
}

/// Draw `text` anchored at a scene-space position.
///
/// The anchor goes through the coordinate adapter like every other scene
/// coordinate. Lighting and material state are not involved.
pub fn draw_world_text<T: TextRasterizer + ?Sized>(
    rasterizer: &mut T,
    text: &str,
    position: Vec3,
    color: Color,
    scale: f32,
) {
    rasterizer.set_color(color.to_rgba());
    rasterizer.begin_3d();
    rasterizer.draw_3d(text, to_backend(position), scale);
    rasterizer.end_3d();
}

/// Draw `text` at pixel coordinates of a viewport with the given size.
pub fn draw_screen_text<T: TextRasterizer + ?Sized>(
    rasterizer: &mut T,
    text: &str,
    x: i32,
    y: i32,
    viewport_width: u32,
    viewport_height: u32,
    color: Color,
) {
    rasterizer.begin_2d(viewport_width, viewport_height);
    rasterizer.set_color(color.to_rgba());
    rasterizer.draw_2d(text, x, y);
    rasterizer.end_2d();
}

/// Where a label is anchored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TextAnchor {
    /// Scene-space position
    World(Vec3),
    /// Pixel coordinates inside a viewport
    Screen {
        /// Horizontal pixel coordinate
        x: i32,
        /// Vertical pixel coordinate
        y: i32,
        /// Viewport width in pixels
        viewport_width: u32,
        /// Viewport height in pixels
        viewport_height: u32,
    },
}

/// A text label carried as data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    /// Label text
    pub text: String,
    /// Anchor
    pub anchor: TextAnchor,
    /// Text color
    pub color: Color,
}

impl TextLabel {
    /// Label anchored in the scene
    pub fn world(text: impl Into<String>, position: Vec3, color: Color) -> Self {
        Self {
            text: text.into(),
            anchor: TextAnchor::World(position),
            color,
        }
    }

    /// Label at fixed pixel coordinates
    pub fn screen(
        text: impl Into<String>,
        x: i32,
        y: i32,
        viewport_width: u32,
        viewport_height: u32,
        color: Color,
    ) -> Self {
        Self {
            text: text.into(),
            anchor: TextAnchor::Screen { x, y, viewport_width, viewport_height },
            color,
        }
    }

    /// Draw the label; `world_scale` applies to world-anchored labels only
    pub fn draw<T: TextRasterizer + ?Sized>(&self, rasterizer: &mut T, world_scale: f32) {
        match self.anchor {
            TextAnchor::World(position) => {
                draw_world_text(rasterizer, &self.text, position, self.color, world_scale);
            }
            TextAnchor::Screen { x, y, viewport_width, viewport_height } => {
                let (width, height) = (viewport_width, viewport_height);
                draw_screen_text(rasterizer, &self.text, x, y, width, height, self.color);
            }
        }
    }
}
