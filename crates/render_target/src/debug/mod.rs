//! Debug module for visualization overlays
//!
//! Unlit, flat-colored helper geometry drawn on top of the lit scene.

pub mod draw;

pub use draw::{
    arrow_head, draw_arrow, draw_arrow_with_threshold, draw_line_loop, draw_line_strip,
    draw_line_strip_with_width, draw_points, draw_polygon, draw_triangle_strip, draw_triangles,
    DebugShape,
};
