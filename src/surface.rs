use crate::color::Rgb;

/// How a filled circle is painted: solid colour at `alpha`, with a halo
/// that extends `glow` canvas pixels past the rim.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub color: Rgb,
    pub alpha: f32,
    pub glow: f32,
}

/// A 2D raster the fireworks draw on. Coordinates are canvas pixels with
/// the origin at the top-left corner and y growing downwards.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Composites black at `alpha` over the whole surface.
    fn fade(&mut self, alpha: f32);

    fn clear(&mut self);

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, paint: Paint);
}
