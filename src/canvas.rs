use crate::color::Rgb;
use crate::surface::{Paint, Surface};
use std::io::Write;

// Halo brightness relative to the core, at the rim of the circle.
const GLOW_STRENGTH: f32 = 0.55;

/// Terminal-backed raster. Each terminal cell holds two vertically stacked
/// raster cells (drawn as `▄` with a background and a foreground colour),
/// and each raster cell covers `scale` canvas pixels on a side.
pub struct Canvas {
    cols: usize,
    rows: usize,
    scale: f32,
    background: Rgb,
    buffer: Vec<[f32; 3]>,
    output_buf: Vec<u8>,
}

impl Canvas {
    pub fn new(cols: usize, rows: usize, scale: f32, background: Rgb) -> Self {
        let mut canvas = Self {
            cols: 0,
            rows: 0,
            scale,
            background,
            buffer: Vec::new(),
            output_buf: Vec::new(),
        };
        canvas.resize(cols, rows);
        canvas
    }

    /// Reallocates for a new terminal size. Previous contents are dropped.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows * 2;
        self.buffer = vec![[0.0; 3]; self.cols * self.rows];
        self.output_buf = Vec::with_capacity(self.cols * self.rows * 20);
    }

    /// Raster size in cells (terminal columns, twice the terminal rows).
    pub fn raster_size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[f32; 3]> {
        if x < self.cols && y < self.rows {
            Some(self.buffer[y * self.cols + x])
        } else {
            None
        }
    }

    fn shade(&self, cell: [f32; 3]) -> Rgb {
        // Screen blend over the background so black cells show it unchanged.
        let screen = |bg: u8, v: f32| {
            let bg = bg as f32 / 255.0;
            let v = v.clamp(0.0, 1.0);
            ((1.0 - (1.0 - bg) * (1.0 - v)) * 255.0).round() as u8
        };
        (
            screen(self.background.0, cell[0]),
            screen(self.background.1, cell[1]),
            screen(self.background.2, cell[2]),
        )
    }

    pub fn render<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_top_color: Option<Rgb> = None;
        let mut prev_bot_color: Option<Rgb> = None;

        for y in (0..self.rows).step_by(2) {
            for x in 0..self.cols {
                let top_idx = y * self.cols + x;
                let bot_idx = if y + 1 < self.rows {
                    (y + 1) * self.cols + x
                } else {
                    top_idx
                };

                let top_color = self.shade(self.buffer[top_idx]);
                let bot_color = self.shade(self.buffer[bot_idx]);

                if prev_top_color != Some(top_color) {
                    write!(
                        self.output_buf,
                        "\x1b[48;2;{};{};{}m",
                        top_color.0, top_color.1, top_color.2
                    )?;
                    prev_top_color = Some(top_color);
                }
                if prev_bot_color != Some(bot_color) {
                    write!(
                        self.output_buf,
                        "\x1b[38;2;{};{};{}m",
                        bot_color.0, bot_color.1, bot_color.2
                    )?;
                    prev_bot_color = Some(bot_color);
                }

                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top_color = None;
            prev_bot_color = None;
            if y + 2 < self.rows {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()
    }
}

impl Surface for Canvas {
    fn width(&self) -> f32 {
        self.cols as f32 * self.scale
    }

    fn height(&self) -> f32 {
        self.rows as f32 * self.scale
    }

    fn fade(&mut self, alpha: f32) {
        let keep = 1.0 - alpha.clamp(0.0, 1.0);
        for cell in &mut self.buffer {
            for c in cell.iter_mut() {
                *c *= keep;
            }
        }
    }

    fn clear(&mut self) {
        self.buffer.fill([0.0; 3]);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, paint: Paint) {
        if self.buffer.is_empty() || paint.alpha <= 0.0 || !x.is_finite() || !y.is_finite() {
            return;
        }

        let cx = x / self.scale;
        let cy = y / self.scale;
        let core = radius.max(0.0) / self.scale;
        let halo = (radius.max(0.0) + paint.glow.max(0.0)) / self.scale;
        let alpha = paint.alpha.min(1.0);
        let color = [
            paint.color.0 as f32 / 255.0,
            paint.color.1 as f32 / 255.0,
            paint.color.2 as f32 / 255.0,
        ];

        let x0 = (cx - halo).floor().max(0.0) as usize;
        let y0 = (cy - halo).floor().max(0.0) as usize;
        let x1 = ((cx + halo).ceil().max(0.0) as usize).min(self.cols);
        let y1 = ((cy + halo).ceil().max(0.0) as usize).min(self.rows);
        let (home_x, home_y) = (cx.floor(), cy.floor());

        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                let cell = &mut self.buffer[py * self.cols + px];
                let home = px as f32 == home_x && py as f32 == home_y;

                if home || d <= core {
                    for (c, src) in cell.iter_mut().zip(color) {
                        *c = *c * (1.0 - alpha) + src * alpha;
                    }
                } else if d <= halo {
                    let t = 1.0 - (d - core) / (halo - core).max(f32::EPSILON);
                    let a = alpha * GLOW_STRENGTH * t * t;
                    for (c, src) in cell.iter_mut().zip(color) {
                        *c = (*c).max(src * a);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Paint = Paint {
        color: (255, 255, 255),
        alpha: 1.0,
        glow: 0.0,
    };

    #[test]
    fn logical_size_scales_cells() {
        let canvas = Canvas::new(80, 24, 8.0, (0, 0, 0));
        assert_eq!(canvas.raster_size(), (80, 48));
        assert_eq!(canvas.width(), 640.0);
        assert_eq!(canvas.height(), 384.0);
    }

    #[test]
    fn circle_fills_home_cell() {
        let mut canvas = Canvas::new(10, 5, 8.0, (0, 0, 0));
        canvas.fill_circle(20.0, 20.0, 1.0, WHITE);
        assert_eq!(canvas.pixel(2, 2), Some([1.0, 1.0, 1.0]));
        assert_eq!(canvas.pixel(5, 5), Some([0.0, 0.0, 0.0]));
    }

    #[test]
    fn glow_is_dimmer_than_core() {
        let mut canvas = Canvas::new(20, 10, 4.0, (0, 0, 0));
        canvas.fill_circle(
            40.0,
            40.0,
            2.0,
            Paint {
                color: (255, 0, 0),
                alpha: 1.0,
                glow: 12.0,
            },
        );
        let core = canvas.pixel(10, 10).unwrap();
        let halo = canvas.pixel(12, 10).unwrap();
        assert_eq!(core[0], 1.0);
        assert!(halo[0] > 0.0 && halo[0] < core[0]);
        assert_eq!(halo[1], 0.0);
    }

    #[test]
    fn fade_and_clear() {
        let mut canvas = Canvas::new(10, 5, 8.0, (0, 0, 0));
        canvas.fill_circle(4.0, 4.0, 1.0, WHITE);
        canvas.fade(0.25);
        let p = canvas.pixel(0, 0).unwrap();
        assert!((p[0] - 0.75).abs() < 1e-6);
        canvas.clear();
        assert_eq!(canvas.pixel(0, 0), Some([0.0, 0.0, 0.0]));
    }

    #[test]
    fn out_of_bounds_and_degenerate_draws_are_ignored() {
        let mut canvas = Canvas::new(10, 5, 8.0, (0, 0, 0));
        canvas.fill_circle(-500.0, 9000.0, 4.0, WHITE);
        canvas.fill_circle(f32::NAN, 10.0, 4.0, WHITE);
        assert!(canvas.buffer.iter().all(|c| *c == [0.0; 3]));

        let mut empty = Canvas::new(0, 0, 8.0, (0, 0, 0));
        empty.fill_circle(0.0, 0.0, 10.0, WHITE);
        empty.fade(0.1);
        assert_eq!(empty.width(), 0.0);
    }

    #[test]
    fn resize_drops_contents() {
        let mut canvas = Canvas::new(10, 5, 8.0, (0, 0, 0));
        canvas.fill_circle(4.0, 4.0, 1.0, WHITE);
        canvas.resize(4, 2);
        assert_eq!(canvas.raster_size(), (4, 4));
        assert_eq!(canvas.pixel(0, 0), Some([0.0, 0.0, 0.0]));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn render_writes_one_half_block_per_cell() {
        let mut canvas = Canvas::new(6, 3, 8.0, (0x1a, 0x1b, 0x26));
        let mut out = Vec::new();
        canvas.render(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[H"));
        assert_eq!(text.matches('▄').count(), 18);
        assert_eq!(text.matches("\r\n").count(), 2);
        assert!(text.contains("\x1b[48;2;26;27;38m"));
    }
}
