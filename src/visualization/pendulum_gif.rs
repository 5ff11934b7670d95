//! Rasterize render-loop frames and save them as an animated GIF

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, Rgba, RgbaImage};
use log::info;

use crate::error::Result;
use crate::simulation::states::NVec2;
use crate::visualization::render::{Animation, Color, Primitive, RenderLoop};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const LINE_WIDTH: f64 = 1.5;

/// Square pixel canvas showing `[-bounds, bounds]²`, axes off, equal aspect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub size: u32,
    pub bounds: f64,
}

impl Canvas {
    pub fn new(size: u32, bounds: f64) -> Self {
        Self { size, bounds }
    }

    pub fn pixels_per_unit(&self) -> f64 {
        self.size as f64 / (2.0 * self.bounds)
    }

    /// World point to pixel coordinates, y pointing down
    pub fn to_pixel(&self, p: NVec2) -> (f64, f64) {
        let k = self.pixels_per_unit();
        ((p.x + self.bounds) * k, (self.bounds - p.y) * k)
    }

    /// Draw one frame; paths go underneath everything else
    pub fn rasterize(&self, primitives: &[Primitive]) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(self.size, self.size, BACKGROUND);

        let (paths, rest): (Vec<&Primitive>, Vec<&Primitive>) = primitives
            .iter()
            .partition(|p| matches!(p, Primitive::Path { .. }));

        for prim in paths.into_iter().chain(rest) {
            match prim {
                Primitive::Path { points, color } => {
                    for pair in points.windows(2) {
                        self.draw_line(&mut img, pair[0], pair[1], *color);
                    }
                }
                Primitive::Segment { from, to, color } => self.draw_line(&mut img, *from, *to, *color),
                Primitive::Marker { at, radius, color } => {
                    let (cx, cy) = self.to_pixel(*at);
                    let r = (radius * self.pixels_per_unit()).max(1.0);
                    fill_disc(&mut img, cx, cy, r, *color);
                }
            }
        }

        img
    }

    fn draw_line(&self, img: &mut RgbaImage, a: NVec2, b: NVec2, color: Color) {
        let (x0, y0) = self.to_pixel(a);
        let (x1, y1) = self.to_pixel(b);
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let s = i as f64 / steps as f64;
            fill_disc(img, x0 + (x1 - x0) * s, y0 + (y1 - y0) * s, 0.5 * LINE_WIDTH, color);
        }
    }
}

fn fill_disc(img: &mut RgbaImage, cx: f64, cy: f64, r: f64, color: Color) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    let x_lo = (cx - r).floor().max(0.0) as i64;
    let x_hi = ((cx + r).ceil() as i64).min(w - 1);
    let y_lo = (cy - r).floor().max(0.0) as i64;
    let y_hi = ((cy + r).ceil() as i64).min(h - 1);
    let pixel = Rgba([color[0], color[1], color[2], 255]);

    for y in y_lo..=y_hi {
        for x in x_lo..=x_hi {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx * dx + dy * dy <= r * r {
                img.put_pixel(x as u32, y as u32, pixel);
            }
        }
    }
}

/// Drain the render loop into an infinitely looping GIF at `path`.
/// Returns the number of frames written.
pub fn write_gif<A: Animation>(
    path: impl AsRef<Path>,
    render_loop: RenderLoop<A>,
    size: u32,
    interval_ms: u32,
) -> Result<usize> {
    let path = path.as_ref();
    let canvas = Canvas::new(size, render_loop.animation().bounds());
    let total = render_loop.animation().frame_count();
    info!("writing {} frames to {}", total, path.display());

    let file = File::create(path)?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite)?;

    let mut written = 0;
    for primitives in render_loop {
        let img = canvas.rasterize(&primitives);
        encoder.encode_frame(Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(interval_ms, 1)))?;
        written += 1;
        if written % 100 == 0 {
            log::debug!("encoded {}/{} frames", written, total);
        }
    }

    info!("saved {}", path.display());
    Ok(written)
}
