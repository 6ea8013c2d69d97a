//! # Camera and projection setup
//!
//! Derives the view transform from a camera's position and look-at target and
//! the projection transform from a [`Projection`] descriptor. Both setters
//! replace the corresponding device transform entirely.
//!
//! ## Tiled rendering
//! Orthographic projections can be restricted to a [`ViewportPart`], a
//! fractional sub-rectangle of the canonical view volume that is stretched over
//! the whole output. Rendering every part from [`ViewportPart::tiles`] and
//! placing the images side by side reproduces one large image.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Mat4, Point3, Vec3, Y_UNIT};
use crate::render::coordinates::to_backend;
use crate::render::device::GraphicsDevice;
use crate::render::{RenderError, RenderResult};

/// Viewpoint of a frame, in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Eye position
    pub position: Vec3,
    /// Point the camera looks at; must differ from `position`
    pub look_at: Vec3,
}

impl Camera {
    /// Create a camera
    pub const fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }

    /// Unit vector from the eye towards the look-at point
    pub fn view_direction(&self) -> Vec3 {
        (self.look_at - self.position).normalize()
    }

    /// Unit vector pointing to the right of the view direction on the ground
    /// plane, or `None` when looking straight up or down.
    pub fn right(&self) -> Option<Vec3> {
        self.view_direction().cross(&Y_UNIT).try_normalize(f64::EPSILON)
    }

    /// Camera up vector perpendicular to the view direction, or `None` when
    /// looking straight up or down.
    pub fn up(&self) -> Option<Vec3> {
        self.right().map(|right| right.cross(&self.view_direction()))
    }

    /// Check that a view direction exists and is not parallel to world up
    ///
    /// # Errors
    /// [`RenderError::InvalidArgument`] for non-finite coordinates, a look-at
    /// point equal to the position, or a camera looking straight up or down.
    pub fn validate(&self) -> RenderResult<()> {
        let finite = self.position.iter().chain(self.look_at.iter()).all(|c| c.is_finite());
        if !finite {
            return Err(RenderError::InvalidArgument(format!(
                "camera coordinates must be finite, got position {:?} and look-at {:?}",
                self.position, self.look_at
            )));
        }
        if (self.look_at - self.position).try_normalize(f64::EPSILON).is_none() {
            return Err(RenderError::InvalidArgument(format!(
                "camera look-at point equals its position {:?}",
                self.position
            )));
        }
        if self.right().is_none() {
            return Err(RenderError::InvalidArgument(format!(
                "camera at {:?} looks straight up or down",
                self.position
            )));
        }
        Ok(())
    }

    /// View matrix in backend coordinates with world up = +Y
    ///
    /// Only meaningful for cameras that pass [`Camera::validate`].
    pub fn view_matrix(&self) -> Mat4 {
        let eye = Point3::from(to_backend(self.position));
        let target = Point3::from(to_backend(self.look_at));
        Mat4::look_at_rh(&eye, &target, &Y_UNIT)
    }
}

/// Projection parameters of a frame
///
/// `volume_height` is only read for orthographic projections and
/// `vert_angle` (degrees) only for perspective ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Orthographic (true) or perspective (false)
    pub orthographic: bool,
    /// Width divided by height of the output
    pub aspect_ratio: f64,
    /// Height of the orthographic view volume
    pub volume_height: f64,
    /// Vertical field of view in degrees
    pub vert_angle: f64,
    /// Near clipping distance
    pub near_clipping_distance: f64,
    /// Far clipping distance
    pub far_clipping_distance: f64,
}

impl Projection {
    /// Orthographic projection
    pub const fn orthographic(aspect_ratio: f64, volume_height: f64, near: f64, far: f64) -> Self {
        Self {
            orthographic: true,
            aspect_ratio,
            volume_height,
            vert_angle: 0.0,
            near_clipping_distance: near,
            far_clipping_distance: far,
        }
    }

    /// Perspective projection with a vertical field of view in degrees
    pub const fn perspective(aspect_ratio: f64, vert_angle: f64, near: f64, far: f64) -> Self {
        Self {
            orthographic: false,
            aspect_ratio,
            volume_height: 0.0,
            vert_angle,
            near_clipping_distance: near,
            far_clipping_distance: far,
        }
    }

    /// Check the parameters the projection kind relies on
    pub fn validate(&self) -> RenderResult<()> {
        let near = self.near_clipping_distance;
        let far = self.far_clipping_distance;

        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > f64::EPSILON) {
            return Err(RenderError::InvalidArgument(format!(
                "aspect ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        if !(near.is_finite() && far.is_finite() && far - near > f64::EPSILON) {
            return Err(RenderError::InvalidArgument(format!(
                "near clipping distance {near} must be smaller than far clipping distance {far}"
            )));
        }

        if self.orthographic {
            if !(self.volume_height.is_finite() && self.volume_height > f64::EPSILON) {
                return Err(RenderError::InvalidArgument(format!(
                    "orthographic volume height must be positive, got {}",
                    self.volume_height
                )));
            }
        } else {
            if near <= 0.0 {
                return Err(RenderError::InvalidArgument(format!(
                    "perspective near clipping distance must be positive, got {near}"
                )));
            }
            if !(self.vert_angle > 0.0 && self.vert_angle < 180.0) {
                return Err(RenderError::InvalidArgument(format!(
                    "vertical angle must be between 0 and 180 degrees, got {}",
                    self.vert_angle
                )));
            }
        }
        Ok(())
    }
}

/// Fractional sub-rectangle of the output, `[x_start, x_end] × [y_start, y_end]`
/// with `(0, 0)` at the bottom left and `(1, 1)` at the top right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportPart {
    /// Left edge
    pub x_start: f64,
    /// Right edge
    pub x_end: f64,
    /// Bottom edge
    pub y_start: f64,
    /// Top edge
    pub y_end: f64,
}

impl ViewportPart {
    /// The whole output
    pub const FULL: Self = Self::new(0.0, 1.0, 0.0, 1.0);

    /// Create a sub-rectangle
    pub const fn new(x_start: f64, x_end: f64, y_start: f64, y_end: f64) -> Self {
        Self { x_start, x_end, y_start, y_end }
    }

    /// Whether this is exactly the full output
    #[allow(clippy::float_cmp)]
    pub fn is_full(&self) -> bool {
        self.x_start == 0.0 && self.x_end == 1.0 && self.y_start == 0.0 && self.y_end == 1.0
    }

    /// Split the output into a grid, row by row starting at the bottom row.
    ///
    /// Edges are computed as `i / n`, so neighbouring tiles share their edge
    /// values exactly and the outer edges are exactly 0 and 1. A zero count
    /// yields no tiles.
    pub fn tiles(columns: u32, rows: u32) -> Vec<Self> {
        let edge = |i: u32, n: u32| f64::from(i) / f64::from(n);

        let mut parts = Vec::with_capacity((columns as usize) * (rows as usize));
        for row in 0..rows {
            for column in 0..columns {
                parts.push(Self::new(
                    edge(column, columns),
                    edge(column + 1, columns),
                    edge(row, rows),
                    edge(row + 1, rows),
                ));
            }
        }
        parts
    }

    fn validate(&self) -> RenderResult<()> {
        let finite =
            [self.x_start, self.x_end, self.y_start, self.y_end].iter().all(|v| v.is_finite());
        if finite && self.x_start < self.x_end && self.y_start < self.y_end {
            Ok(())
        } else {
            Err(RenderError::InvalidArgument(format!("empty or invalid viewport part {self:?}")))
        }
    }
}

impl Default for ViewportPart {
    fn default() -> Self {
        Self::FULL
    }
}

/// Bounds of an orthographic view volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrthoBounds {
    /// Left clipping plane
    pub left: f64,
    /// Right clipping plane
    pub right: f64,
    /// Bottom clipping plane
    pub bottom: f64,
    /// Top clipping plane
    pub top: f64,
    /// Near clipping plane
    pub near: f64,
    /// Far clipping plane
    pub far: f64,
}

impl OrthoBounds {
    /// Visible volume of `part` of an orthographic projection.
    ///
    /// With `W = aspect_ratio * volume_height` and `H = volume_height`, the
    /// full volume spans `[-W/2, W/2] × [-H/2, H/2]` and each axis is cropped
    /// to the requested fraction.
    pub fn for_part(projection: &Projection, part: &ViewportPart) -> Self {
        let volume_height = projection.volume_height;
        let volume_width = projection.aspect_ratio * volume_height;

        Self {
            left: (-0.5 + part.x_start) * volume_width,
            right: (-0.5 + part.x_end) * volume_width,
            bottom: (-0.5 + part.y_start) * volume_height,
            top: (-0.5 + part.y_end) * volume_height,
            near: projection.near_clipping_distance,
            far: projection.far_clipping_distance,
        }
    }

    /// Horizontal extent
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical extent
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Check that every extent of the volume is finite and non-degenerate
    ///
    /// # Errors
    /// [`RenderError::InvalidArgument`] if the width, height or depth is not
    /// larger than `f64::EPSILON`.
    pub fn validate(&self) -> RenderResult<()> {
        let extents =
            [("width", self.width()), ("height", self.height()), ("depth", self.far - self.near)];
        for (name, extent) in extents {
            if !(extent.is_finite() && extent > f64::EPSILON) {
                return Err(RenderError::InvalidArgument(format!(
                    "orthographic volume {name} {extent} is too small: {self:?}"
                )));
            }
        }
        Ok(())
    }

    /// Orthographic projection matrix for these bounds
    ///
    /// # Errors
    /// See [`OrthoBounds::validate`].
    pub fn matrix(&self) -> RenderResult<Mat4> {
        self.validate()?;
        Ok(Mat4::new_orthographic(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        ))
    }
}

/// Replace the device's view transform with the camera's.
///
/// # Errors
/// See [`Camera::validate`]. Nothing is issued to the device in that case.
pub fn set_camera_matrices<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    camera: &Camera,
) -> RenderResult<()> {
    if let Err(err) = camera.validate() {
        log::error!("Rejecting camera: {err}");
        return Err(err);
    }
    log::trace!("Camera set: position {:?}, look-at {:?}", camera.position, camera.look_at);
    device.load_view_matrix(camera.view_matrix());
    Ok(())
}

/// Replace the device's projection transform for the full output.
///
/// # Errors
/// [`RenderError::InvalidArgument`] if the projection parameters are invalid.
pub fn set_projection_matrices<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    projection: &Projection,
) -> RenderResult<()> {
    set_projection_matrices_for_part(device, projection, &ViewportPart::FULL)
}

/// Replace the device's projection transform so that only `part` of the
/// regular image is rendered, stretched over the whole output.
///
/// For example the part `(0, 0.5, 0, 1)` renders the left half of the image.
/// Only orthographic projections support anything but the full part.
///
/// # Errors
/// [`RenderError::InvalidArgument`] for a partial viewport on a perspective
/// projection, an empty part, a degenerate orthographic volume, or invalid
/// projection parameters. Nothing is issued to the device in that case.
pub fn set_projection_matrices_for_part<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    projection: &Projection,
    part: &ViewportPart,
) -> RenderResult<()> {
    if !part.is_full() && !projection.orthographic {
        return Err(RenderError::InvalidArgument(
            "section rendering only supported for orthographic projections".to_string(),
        ));
    }
    part.validate()?;
    projection.validate()?;

    let matrix = if projection.orthographic {
        let bounds = OrthoBounds::for_part(projection, part);
        let matrix = bounds.matrix()?;
        log::trace!("Orthographic projection set: {bounds:?}");
        matrix
    } else {
        log::trace!(
            "Perspective projection set: {} degrees, aspect {}",
            projection.vert_angle,
            projection.aspect_ratio
        );
        Mat4::new_perspective(
            projection.aspect_ratio,
            utils::deg_to_rad(projection.vert_angle),
            projection.near_clipping_distance,
            projection.far_clipping_distance,
        )
    };

    device.load_projection_matrix(matrix);
    Ok(())
}
