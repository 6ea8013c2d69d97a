//! Tiled rendering demo
//!
//! Renders a small scene as a grid of orthographic tiles into the recording
//! device and writes one RON command log per tile.
//!
//! Usage: `tile_demo [config.toml|config.ron] [output_dir]`

use std::fs;
use std::path::{Path, PathBuf};

use render_target::foundation::logging;
use render_target::prelude::*;
use render_target::render::{DeviceCommand, TextCommand};
use serde::Serialize;

const DEFAULT_OUTPUT_DIR: &str = "tile_output";

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Ron(#[from] ron::Error),
}

/// A square tower with a pyramid roof
struct Tower {
    center: Vec3,
    half_width: f64,
    height: f64,
    material: Material,
}

impl Tower {
    fn corners(&self, y: f64) -> [Vec3; 4] {
        let (x, z, w) = (self.center.x, self.center.z, self.half_width);
        [
            Vec3::new(x - w, y, z - w),
            Vec3::new(x + w, y, z - w),
            Vec3::new(x + w, y, z + w),
            Vec3::new(x - w, y, z + w),
        ]
    }
}

impl Renderable for Tower {
    fn render(&self, device: &mut dyn GraphicsDevice, _camera: &Camera) -> RenderResult<()> {
        let base = self.corners(self.center.y);
        let top = self.corners(self.center.y + self.height);

        let walls: Vec<Triangle> = (0..4)
            .flat_map(|i| {
                let j = (i + 1) % 4;
                [Triangle::new(base[i], base[j], top[j]), Triangle::new(base[i], top[j], top[i])]
            })
            .collect();
        let wall_vertices: Vec<Vec3> = walls.iter().flat_map(Triangle::vertices).collect();
        let wall_normals: Vec<Vec3> = walls.iter().flat_map(|t| [t.normal(); 3]).collect();
        render_target::render::draw_primitive(
            &mut *device,
            PrimitiveType::Triangles,
            &self.material,
            &wall_vertices,
            &wall_normals,
        )?;

        let apex = self.center + Vec3::new(0.0, self.height + self.half_width, 0.0);
        let mut roof = vec![apex];
        roof.extend(top.iter().rev().copied());
        roof.push(top[3]);
        let roof_normals: Vec<Vec3> =
            roof.iter().map(|v| (v - self.center).normalize()).collect();
        let roof_material = Material::from_color(Color::from_rgb8(170, 60, 40), Lighting::Smooth);
        render_target::render::draw_primitive(
            device,
            PrimitiveType::TriangleFan,
            &roof_material,
            &roof,
            &roof_normals,
        )
    }
}

#[derive(Serialize)]
struct TileLog<'a> {
    column: u32,
    row: u32,
    part: ViewportPart,
    device: &'a [DeviceCommand],
    text: &'a [TextCommand],
}

fn ground() -> Primitive {
    Primitive::new(
        PrimitiveType::ConvexPolygon,
        vec![
            Vec3::new(-60.0, 0.0, -60.0),
            Vec3::new(60.0, 0.0, -60.0),
            Vec3::new(60.0, 0.0, 60.0),
            Vec3::new(-60.0, 0.0, 60.0),
        ],
        vec![Vec3::y(); 4],
        Material::from_color(Color::from_rgb8(90, 140, 70), Lighting::Flat),
    )
}

fn debug_overlays() -> Vec<DebugShape> {
    vec![
        DebugShape::LineStrip {
            color: Color::YELLOW,
            width: Some(3.0),
            points: vec![
                Vec3::new(-50.0, 0.1, -40.0),
                Vec3::new(-10.0, 0.1, -35.0),
                Vec3::new(20.0, 0.1, 10.0),
            ],
        },
        DebugShape::Arrow {
            color: Color::RED,
            head_length: 4.0,
            points: vec![Vec3::new(20.0, 0.1, 10.0), Vec3::new(40.0, 0.1, 30.0)],
        },
        DebugShape::Arrow {
            color: Color::BLUE,
            head_length: 3.0,
            points: vec![Vec3::new(-30.0, 0.0, 30.0), Vec3::new(-30.0, 25.0, 30.0)],
        },
        DebugShape::Points {
            color: Color::WHITE,
            points: vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(-30.0, 0.0, 30.0)],
        },
    ]
}

fn output_path(dir: &Path, column: u32, row: u32) -> PathBuf {
    dir.join(format!("tile_r{row}_c{column}.ron"))
}

fn run(config: RendererConfig, output_dir: &Path) -> Result<(), DemoError> {
    let tiling = config.tiling;
    let mut context = RenderContext::recording(config)?;

    let camera = Camera::new(Vec3::new(-40.0, 120.0, -90.0), Vec3::zeros());
    let projection = Projection::orthographic(4.0 / 3.0, 140.0, 1.0, 1000.0);

    let ground = ground();
    let towers = [
        Tower {
            center: Vec3::new(10.0, 0.0, 20.0),
            half_width: 6.0,
            height: 30.0,
            material: Material::from_color(Color::GRAY, Lighting::Flat),
        },
        Tower {
            center: Vec3::new(-25.0, 0.0, -15.0),
            half_width: 4.0,
            height: 18.0,
            material: Material::from_color(Color::from_rgb8(200, 190, 160), Lighting::Flat),
        },
    ];
    let overlays = debug_overlays();
    let labels = [
        TextLabel::world("Keep", Vec3::new(10.0, 42.0, 20.0), Color::WHITE),
        TextLabel::world("Gatehouse", Vec3::new(-25.0, 27.0, -15.0), Color::WHITE),
    ];

    fs::create_dir_all(output_dir)?;

    let parts = ViewportPart::tiles(tiling.columns, tiling.rows);
    for (index, part) in parts.iter().enumerate() {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        let (column, row) = (index % tiling.columns, index / tiling.columns);

        {
            let mut target = context.frame(camera, &projection, part)?;
            let mut scene: Vec<&dyn Renderable> = vec![&ground];
            scene.extend(towers.iter().map(|t| t as &dyn Renderable));
            target.render_all(&scene)?;

            for overlay in &overlays {
                target.draw_debug(overlay)?;
            }
        }
        for label in &labels {
            context.draw_label(label);
        }
        context.draw_screen_text(&format!("tile {column},{row}"), 8, 16, 800, 600, Color::WHITE);

        let draw_calls = context.device().draw_call_count();
        let (device, text) = context.take_recordings();
        let tile_log = TileLog {
            column,
            row,
            part: *part,
            device: &device,
            text: &text,
        };
        let path = output_path(output_dir, column, row);
        let pretty = ron::ser::to_string_pretty(&tile_log, ron::ser::PrettyConfig::default())?;
        fs::write(&path, pretty)?;

        log::info!(
            "Tile {}/{} ({column},{row}): {draw_calls} draw calls, {} device commands -> {}",
            index + 1,
            parts.len(),
            device.len(),
            path.display()
        );
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<RendererConfig, ConfigError> {
    let config = match path {
        Some(path) => RendererConfig::load_from_file(path)?,
        None => RendererConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let config_path = args.get(1).map(String::as_str);
    let output_dir = args.get(2).map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), PathBuf::from);

    let config = load_config(config_path)?;
    logging::init_with_level(&config.logging.level);

    log::info!("Starting tile demo");
    match run(config, &output_dir) {
        Ok(()) => {
            log::info!("Tile demo finished, logs in {}", output_dir.display());
            Ok(())
        }
        Err(e) => {
            log::error!("Tile demo failed: {e}");
            Err(e.into())
        }
    }
}
