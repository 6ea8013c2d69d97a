//! Debug and overlay drawing
//!
//! Flat-colored, unlit geometry for visualizing things that are not part of
//! the lit scene: markers, paths, arrows and helper surfaces. Every operation
//! sets the current color, then issues its batch with coordinate-adapted
//! vertices. Lighting and material state are left untouched.

use serde::{Deserialize, Serialize};

use crate::core::config::DebugDrawConfig;
use crate::foundation::color::Color;
use crate::foundation::math::{Triangle, Vec3, Vec3Ext, VecXZ};
use crate::render::camera::Camera;
use crate::render::coordinates::to_backend;
use crate::render::device::{DrawMode, GraphicsDevice};
use crate::render::target::Renderable;
use crate::render::{RenderError, RenderResult};

fn draw_flat<D, I>(device: &mut D, color: Color, mode: DrawMode, points: I)
where
    D: GraphicsDevice + ?Sized,
    I: IntoIterator<Item = Vec3>,
{
    device.color(color.to_rgba());
    device.begin(mode);
    let mut count = 0usize;
    for point in points {
        device.vertex(to_backend(point));
        count += 1;
    }
    device.end();
    log::trace!("Debug {mode:?} with {count} vertices");
}

/// Draw isolated points
pub fn draw_points<D: GraphicsDevice + ?Sized>(device: &mut D, color: Color, points: &[Vec3]) {
    draw_flat(device, color, DrawMode::Points, points.iter().copied());
}

/// Draw connected line segments
pub fn draw_line_strip<D: GraphicsDevice + ?Sized>(device: &mut D, color: Color, points: &[Vec3]) {
    draw_flat(device, color, DrawMode::LineStrip, points.iter().copied());
}

/// Draw connected line segments with an explicit width.
///
/// The width only applies to this strip; afterwards the device is back at
/// [`DebugDrawConfig::DEFAULT_LINE_WIDTH`].
pub fn draw_line_strip_with_width<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    color: Color,
    width: f32,
    points: &[Vec3],
) {
    line_strip_with_width(device, color, width, DebugDrawConfig::DEFAULT_LINE_WIDTH, points);
}

pub(crate) fn line_strip_with_width<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    color: Color,
    width: f32,
    restored_width: f32,
    points: &[Vec3],
) {
    device.line_width(width);
    draw_line_strip(device, color, points);
    device.line_width(restored_width);
}

/// Draw a closed outline
pub fn draw_line_loop<D: GraphicsDevice + ?Sized>(device: &mut D, color: Color, points: &[Vec3]) {
    draw_flat(device, color, DrawMode::LineLoop, points.iter().copied());
}

/// Draw a flat triangle strip
pub fn draw_triangle_strip<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    color: Color,
    points: &[Vec3],
) {
    draw_flat(device, color, DrawMode::TriangleStrip, points.iter().copied());
}

/// Draw a flat convex polygon
pub fn draw_polygon<D: GraphicsDevice + ?Sized>(device: &mut D, color: Color, points: &[Vec3]) {
    draw_flat(device, color, DrawMode::Polygon, points.iter().copied());
}

/// Draw flat triangles in a single batch
pub fn draw_triangles<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    color: Color,
    triangles: &[Triangle],
) {
    draw_flat(device, color, DrawMode::Triangles, triangles.iter().flat_map(Triangle::vertices));
}

/// The two fins of an arrowhead, each a three-point triangle strip.
///
/// `tip` is the last point of the shaft and `previous` the one before it. The
/// fins start at the tip and reach back `head_length` along the shaft. One fin
/// lies in the vertical plane through the shaft's ground direction, the other
/// is turned a quarter around the vertical axis. When the shaft's ground
/// direction has a squared length below `vertical_threshold`, the shaft counts
/// as vertical and +X is used instead.
///
/// # Errors
/// [`RenderError::InvalidArgument`] if `tip` and `previous` coincide.
pub fn arrow_head(
    tip: Vec3,
    previous: Vec3,
    head_length: f64,
    vertical_threshold: f64,
) -> RenderResult<[[Vec3; 3]; 2]> {
    let direction = (tip - previous).try_normalize(f64::EPSILON).ok_or_else(|| {
        RenderError::InvalidArgument(format!(
            "arrow shaft ends in a zero-length segment at {tip:?}"
        ))
    })?;
    let head_base = tip - direction * head_length;

    let ground = direction.to_xz();
    let direction_xz = if ground.length_squared() < vertical_threshold {
        log::warn!("Arrow at {tip:?} points almost vertically, orienting its head along +X");
        VecXZ::X_UNIT
    } else {
        ground.normalize()
    };
    let normal_xz = direction_xz.right_normal();

    let half = head_length / 2.0;
    let fin = |offset: VecXZ| {
        [tip, head_base.add_xz(offset * half), head_base.add_xz(-offset * half)]
    };

    Ok([fin(direction_xz), fin(normal_xz)])
}

/// Draw a polyline ending in an arrowhead, using the default vertical threshold.
///
/// # Errors
/// [`RenderError::InvalidArgument`] with fewer than two points or a
/// zero-length final segment. Nothing is drawn in that case.
pub fn draw_arrow<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    color: Color,
    head_length: f64,
    points: &[Vec3],
) -> RenderResult<()> {
    let threshold = DebugDrawConfig::DEFAULT_ARROW_VERTICAL_THRESHOLD;
    draw_arrow_with_threshold(device, color, head_length, threshold, points)
}

/// Draw a polyline ending in an arrowhead.
///
/// Issues the shaft as a line strip followed by the two fins from
/// [`arrow_head`] as triangle strips, all in `color`.
///
/// # Errors
/// [`RenderError::InvalidArgument`] with fewer than two points or a
/// zero-length final segment. Nothing is drawn in that case.
pub fn draw_arrow_with_threshold<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    color: Color,
    head_length: f64,
    vertical_threshold: f64,
    points: &[Vec3],
) -> RenderResult<()> {
    let [.., previous, tip] = points else {
        log::error!("Rejecting arrow with {} points", points.len());
        return Err(RenderError::InvalidArgument(format!(
            "an arrow needs at least 2 points, got {}",
            points.len()
        )));
    };
    let fins = arrow_head(*tip, *previous, head_length, vertical_threshold)?;

    draw_line_strip(device, color, points);
    for fin in &fins {
        draw_triangle_strip(device, color, fin);
    }
    Ok(())
}

/// An owned debug draw request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DebugShape {
    /// Isolated points
    Points {
        /// Color
        color: Color,
        /// Positions
        points: Vec<Vec3>,
    },
    /// Open polyline, optionally with its own width
    LineStrip {
        /// Color
        color: Color,
        /// Width for this strip only
        width: Option<f32>,
        /// Positions
        points: Vec<Vec3>,
    },
    /// Closed outline
    LineLoop {
        /// Color
        color: Color,
        /// Positions
        points: Vec<Vec3>,
    },
    /// Polyline with an arrowhead at its last point
    Arrow {
        /// Color
        color: Color,
        /// Length of the head along the shaft
        head_length: f64,
        /// Positions
        points: Vec<Vec3>,
    },
    /// Flat triangle strip
    TriangleStrip {
        /// Color
        color: Color,
        /// Positions
        points: Vec<Vec3>,
    },
    /// Flat convex polygon
    Polygon {
        /// Color
        color: Color,
        /// Positions
        points: Vec<Vec3>,
    },
    /// Flat independent triangles
    Triangles {
        /// Color
        color: Color,
        /// Triangles
        triangles: Vec<Triangle>,
    },
}

impl DebugShape {
    /// Color of the shape
    pub const fn color(&self) -> Color {
        match self {
            Self::Points { color, .. }
            | Self::LineStrip { color, .. }
            | Self::LineLoop { color, .. }
            | Self::Arrow { color, .. }
            | Self::TriangleStrip { color, .. }
            | Self::Polygon { color, .. }
            | Self::Triangles { color, .. } => *color,
        }
    }

    /// Draw the shape with the given debug settings
    ///
    /// # Errors
    /// See [`draw_arrow`] for arrows; other shapes never fail.
    pub fn draw<D: GraphicsDevice + ?Sized>(
        &self,
        device: &mut D,
        config: &DebugDrawConfig,
    ) -> RenderResult<()> {
        match self {
            Self::Points { color, points } => draw_points(device, *color, points),
            Self::LineStrip { color, width: None, points } => {
                draw_line_strip(device, *color, points);
            }
            Self::LineStrip { color, width: Some(width), points } => {
                line_strip_with_width(device, *color, *width, config.default_line_width, points);
            }
            Self::LineLoop { color, points } => draw_line_loop(device, *color, points),
            Self::Arrow { color, head_length, points } => {
                let threshold = config.arrow_vertical_threshold;
                draw_arrow_with_threshold(device, *color, *head_length, threshold, points)?;
            }
            Self::TriangleStrip { color, points } => draw_triangle_strip(device, *color, points),
            Self::Polygon { color, points } => draw_polygon(device, *color, points),
            Self::Triangles { color, triangles } => draw_triangles(device, *color, triangles),
        }
        Ok(())
    }
}

impl Renderable for DebugShape {
    fn render(&self, device: &mut dyn GraphicsDevice, _camera: &Camera) -> RenderResult<()> {
        self.draw(device, &DebugDrawConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{CommandRecorder, DeviceCommand};
    use approx::assert_relative_eq;

    #[test]
    fn test_arrow_head_along_x() {
        let [first, second] =
            arrow_head(Vec3::new(1.0, 0.0, 0.0), Vec3::zeros(), 1.0, 0.01).unwrap();

        assert_eq!(first[0], Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(first[1], Vec3::new(0.5, 0.0, 0.0));
        assert_relative_eq!(first[2], Vec3::new(-0.5, 0.0, 0.0));

        assert_eq!(second[0], Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(second[1], Vec3::new(0.0, 0.0, -0.5));
        assert_relative_eq!(second[2], Vec3::new(0.0, 0.0, 0.5));
    }

    #[test]
    fn test_draw_arrow_issues_shaft_and_two_fins() {
        let mut device = CommandRecorder::new();
        let points = [Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)];

        draw_arrow(&mut device, Color::YELLOW, 1.0, &points).unwrap();

        let batches = device.batches();
        let modes: Vec<DrawMode> = batches.iter().map(|b| b.mode).collect();
        assert_eq!(
            modes,
            vec![DrawMode::LineStrip, DrawMode::TriangleStrip, DrawMode::TriangleStrip]
        );
        assert!(batches.iter().all(|b| b.color == Some([1.0, 1.0, 0.0, 1.0])));

        // backend space mirrors z
        let second_fin = &batches[2].vertices;
        assert_relative_eq!(second_fin[1], Vec3::new(0.0, 0.0, 0.5));
        assert_relative_eq!(second_fin[2], Vec3::new(0.0, 0.0, -0.5));
    }

    #[test]
    fn test_vertical_arrow_falls_back_to_x() {
        let [first, second] =
            arrow_head(Vec3::new(0.0, 2.0, 0.0), Vec3::zeros(), 1.0, 0.01).unwrap();

        assert_relative_eq!(first[1], Vec3::new(0.5, 1.0, 0.0));
        assert_relative_eq!(first[2], Vec3::new(-0.5, 1.0, 0.0));
        assert_relative_eq!(second[1], Vec3::new(0.0, 1.0, -0.5));

        // nearly vertical with a small ground component is still treated as vertical
        let tilted = arrow_head(Vec3::new(0.0, 1.0, 0.05), Vec3::zeros(), 1.0, 0.01).unwrap();
        assert_relative_eq!(tilted[0][1].x - tilted[0][2].x, 1.0);
        assert_relative_eq!(tilted[0][1].z, tilted[0][2].z);

        // a larger threshold turns an oblique arrow vertical too
        let oblique = arrow_head(Vec3::new(0.0, 1.0, 1.0), Vec3::zeros(), 1.0, 0.9).unwrap();
        assert_relative_eq!(oblique[0][1].x - oblique[0][2].x, 1.0);
    }

    #[test]
    fn test_short_arrow_is_rejected() {
        let mut device = CommandRecorder::new();

        for points in [&[][..], &[Vec3::zeros()][..]] {
            let result = draw_arrow(&mut device, Color::RED, 1.0, points);
            assert!(matches!(result, Err(RenderError::InvalidArgument(_))));
        }

        let repeated = [Vec3::zeros(), Vec3::x(), Vec3::x()];
        assert!(draw_arrow(&mut device, Color::RED, 1.0, &repeated).is_err());

        assert!(device.commands().is_empty());
    }

    #[test]
    fn test_line_width_is_reset() {
        let mut device = CommandRecorder::new();
        let points = [Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0)];

        draw_line_strip_with_width(&mut device, Color::GREEN, 5.0, &points);
        draw_line_strip(&mut device, Color::RED, &points);

        let commands = device.commands();
        assert_eq!(commands.first(), Some(&DeviceCommand::LineWidth(5.0)));
        assert!(commands.contains(&DeviceCommand::LineWidth(1.0)));
        assert_eq!(device.state().line_width, 1.0);

        let batches = device.batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].line_width, 5.0);
        assert_eq!(batches[1].line_width, 1.0);
    }

    #[test]
    fn test_configured_restore_width() {
        let mut device = CommandRecorder::new();
        let config = DebugDrawConfig {
            default_line_width: 2.0,
            ..DebugDrawConfig::default()
        };
        let shape = DebugShape::LineStrip {
            color: Color::WHITE,
            width: Some(4.0),
            points: vec![Vec3::zeros(), Vec3::x()],
        };

        shape.draw(&mut device, &config).unwrap();

        assert_eq!(device.state().line_width, 2.0);
    }

    #[test]
    fn test_flat_draws_set_color_then_one_batch() {
        let points = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0), Vec3::new(7.0, 8.0, 9.0)];
        let cases: [(fn(&mut CommandRecorder, Color, &[Vec3]), DrawMode); 5] = [
            (draw_points, DrawMode::Points),
            (draw_line_strip, DrawMode::LineStrip),
            (draw_line_loop, DrawMode::LineLoop),
            (draw_triangle_strip, DrawMode::TriangleStrip),
            (draw_polygon, DrawMode::Polygon),
        ];

        for (draw, mode) in cases {
            let mut device = CommandRecorder::new();
            draw(&mut device, Color::rgb(2.0, 0.5, -1.0), &points);

            let commands = device.commands();
            assert_eq!(commands[0], DeviceCommand::Color([1.0, 0.5, 0.0, 1.0]));
            assert_eq!(commands[1], DeviceCommand::Begin(mode));
            assert_eq!(commands[2], DeviceCommand::Vertex(Vec3::new(1.0, 2.0, -3.0)));
            assert_eq!(device.draw_call_count(), 1);
            assert_eq!(device.batches()[0].vertices.len(), 3);
        }
    }

    #[test]
    fn test_triangles_are_emitted_independently() {
        let mut device = CommandRecorder::new();
        let triangles = [
            Triangle::new(Vec3::zeros(), Vec3::x(), Vec3::z()),
            Triangle::new(Vec3::y(), Vec3::x(), Vec3::z()),
        ];

        draw_triangles(&mut device, Color::BLUE, &triangles);

        let batches = device.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].mode, DrawMode::Triangles);
        assert_eq!(batches[0].vertices.len(), 6);
        assert_eq!(batches[0].vertices[3], Vec3::new(0.0, 1.0, 0.0));
        assert!(batches[0].normals.is_empty());
    }

    #[test]
    fn test_shape_renders_through_trait() {
        let mut device = CommandRecorder::new();
        let camera = Camera::new(Vec3::new(0.0, 5.0, -5.0), Vec3::zeros());
        let shape = DebugShape::Arrow {
            color: Color::RED,
            head_length: 0.5,
            points: vec![Vec3::zeros(), Vec3::z()],
        };

        shape.render(&mut device, &camera).unwrap();

        assert_eq!(device.draw_call_count(), 3);
        assert_eq!(shape.color(), Color::RED);
    }
}
