//! Generates a small detection dataset from a shattered sphere, rendered with a flat-shaded
//! software rasterizer.
//!
//! Usage: `cargo run --example generate_dataset -- [output dir] [sample count]`

use image::{ImageFormat, Rgb, RgbImage};
use rand::{Rng, RngCore, SeedableRng};
use rand_isaac::IsaacRng;
use shard3d::dataset::{
    CaptureError, CapturedImage, DatasetConfig, DatasetOrchestrator, DirectorySink, Environment,
    EnvironmentError, FrameCapture, SceneSnapshot,
};
use shard3d::math::{Point, Real, Vector};
use shard3d::shape::{Triangle, TriangleSoup};
use shard3d::shatter::ShatterConfig;
use std::cell::Cell;
use std::io::Cursor;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

const FALLBACK_BACKGROUND: [u8; 3] = [40, 40, 48];

fn uv_sphere(radius: Real, rings: u32, segments: u32) -> TriangleSoup {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for r in 0..=rings {
        let theta = core::f32::consts::PI * r as Real / rings as Real;
        for s in 0..segments {
            let phi = core::f32::consts::TAU * s as Real / segments as Real;
            vertices.push(Point::new(
                radius * theta.sin() * phi.cos(),
                radius * theta.cos(),
                radius * theta.sin() * phi.sin(),
            ));
        }
    }

    for r in 0..rings {
        for s in 0..segments {
            let a = r * segments + s;
            let b = r * segments + (s + 1) % segments;
            let c = a + segments;
            let d = b + segments;
            indices.push([a, b, d]);
            indices.push([a, d, c]);
        }
    }

    TriangleSoup::from_indexed(&vertices, &indices).expect("indices are in bounds")
}

/// Picks random background colors; one asset out of ten is "missing".
struct RandomBackground {
    color: Rc<Cell<[u8; 3]>>,
}

impl Environment for RandomBackground {
    fn randomize(&mut self, rng: &mut dyn RngCore) -> Result<(), EnvironmentError> {
        if rng.gen_ratio(1, 10) {
            return Err(EnvironmentError::AssetLoad {
                asset: "backdrop.hdr".to_string(),
                reason: "file not found".to_string(),
            });
        }

        self.color.set([rng.gen(), rng.gen(), rng.gen()]);
        Ok(())
    }

    fn use_fallback(&mut self) {
        self.color.set(FALLBACK_BACKGROUND);
    }
}

/// Renders the posed fragments with flat shading and encodes the result as PNG.
struct SoftwareCapture {
    background: Rc<Cell<[u8; 3]>>,
}

impl FrameCapture for SoftwareCapture {
    fn capture(&mut self, scene: &SceneSnapshot<'_>) -> Result<CapturedImage, CaptureError> {
        let (width, height) = (scene.viewport.width, scene.viewport.height);
        let mut img = RgbImage::from_pixel(width, height, Rgb(self.background.get()));
        let mut depth = vec![Real::INFINITY; (width * height) as usize];
        let view_proj = scene.camera.view_projection();
        let light = Vector::new(0.3, 1.0, 0.5).normalize();

        for fragment in scene.fragments {
            let pose = fragment.world_pose(scene.force, scene.rot_force);
            let scale = fragment.placement().scale;

            for tri in fragment.mesh().triangles() {
                let world = tri
                    .vertices()
                    .map(|p| pose * Point::from(p.coords.component_mul(&scale)));
                let Some(normal) = Triangle::from(world).normal() else {
                    continue;
                };

                let mut screen = [Point::origin(); 3];
                let mut visible = true;

                for (s, p) in screen.iter_mut().zip(&world) {
                    let clip = view_proj * p.to_homogeneous();
                    if clip.w <= scene.camera.near {
                        visible = false;
                        break;
                    }
                    let ndc = clip.xyz() / clip.w;
                    *s = Point::new(
                        (ndc.x + 1.0) * 0.5 * width as Real,
                        (1.0 - ndc.y) * 0.5 * height as Real,
                        ndc.z,
                    );
                }

                if visible {
                    let shade = 0.35 + 0.65 * normal.dot(&light).abs();
                    let color = fragment
                        .color()
                        .map(|c| (c * shade * 255.0).clamp(0.0, 255.0) as u8);
                    fill_triangle(&mut img, &mut depth, &screen, Rgb(color));
                }
            }
        }

        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| CaptureError::Encoding(e.to_string()))?;

        Ok(CapturedImage {
            width,
            height,
            bytes,
            extension: "png".to_string(),
        })
    }
}

fn edge(a: &Point<Real>, b: &Point<Real>, x: Real, y: Real) -> Real {
    (b.x - a.x) * (y - a.y) - (b.y - a.y) * (x - a.x)
}

fn fill_triangle(img: &mut RgbImage, depth: &mut [Real], v: &[Point<Real>; 3], color: Rgb<u8>) {
    let area = edge(&v[0], &v[1], v[2].x, v[2].y);
    if area.abs() < 1.0e-8 {
        return;
    }

    let (width, height) = img.dimensions();
    let min_x = v.iter().map(|p| p.x).fold(Real::MAX, Real::min).floor().max(0.0);
    let max_x = v.iter().map(|p| p.x).fold(Real::MIN, Real::max).ceil().min(width as Real - 1.0);
    let min_y = v.iter().map(|p| p.y).fold(Real::MAX, Real::min).floor().max(0.0);
    let max_y = v.iter().map(|p| p.y).fold(Real::MIN, Real::max).ceil().min(height as Real - 1.0);

    if min_x > max_x || min_y > max_y {
        return;
    }

    for y in min_y as u32..=max_y as u32 {
        for x in min_x as u32..=max_x as u32 {
            let (px, py) = (x as Real + 0.5, y as Real + 0.5);
            let w0 = edge(&v[1], &v[2], px, py) / area;
            let w1 = edge(&v[2], &v[0], px, py) / area;
            let w2 = edge(&v[0], &v[1], px, py) / area;

            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let z = w0 * v[0].z + w1 * v[1].z + w2 * v[2].z;
            let i = (y * width + x) as usize;

            if z < depth[i] {
                depth[i] = z;
                img.put_pixel(x, y, color);
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "dataset".to_string());
    let sample_count = match args.next() {
        Some(n) => n.parse()?,
        None => 8,
    };

    let background = Rc::new(Cell::new(FALLBACK_BACKGROUND));
    let config = DatasetConfig {
        shatter: ShatterConfig {
            fragment_count: 12,
            ..ShatterConfig::default()
        },
        final_force: 0.6,
        ..DatasetConfig::default()
    };

    let mut orchestrator = DatasetOrchestrator::new(
        uv_sphere(1.5, 10, 16),
        config,
        SoftwareCapture {
            background: background.clone(),
        },
        RandomBackground { color: background },
        IsaacRng::seed_from_u64(2024),
        Arc::new(AtomicBool::new(false)),
    )?;

    orchestrator.begin(sample_count);
    while orchestrator.step() {
        println!("{} / {}", orchestrator.entries().len(), sample_count);
    }
    let batch = orchestrator.finish();

    let written = DirectorySink::new(&output).write_batch(&batch)?;
    println!(
        "Wrote {} samples ({} skipped) to `{}`.",
        written,
        batch.num_skipped(),
        output
    );

    Ok(())
}
