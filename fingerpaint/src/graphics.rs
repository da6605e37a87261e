use lyon::math::Point;
use std::fmt::{Display, Formatter};

/// Straight (non-premultiplied) RGBA8888.
pub type Color = [u8; 4];

pub trait ColorExt {
    const WHITE: Color = [0xff, 0xff, 0xff, 0xff];
    const BLACK: Color = [0, 0, 0, 0xff];
    const TRANSPARENT: Color = [0, 0, 0, 0];

    fn grey(level: u8) -> Color {
        [level, level, level, 0xff]
    }

    fn argb(a: u8, r: u8, g: u8, b: u8) -> Color {
        [r, g, b, a]
    }

    fn from_argb(argb: u32) -> Self;
    fn to_argb(&self) -> u32;
    fn alpha(&self) -> u8;

    /// Source-over `self` onto `dst`.
    fn over(&self, dst: Color) -> Color;
}

impl ColorExt for Color {
    fn from_argb(argb: u32) -> Color {
        let [a, r, g, b] = argb.to_be_bytes();
        [r, g, b, a]
    }

    fn to_argb(&self) -> u32 {
        let [r, g, b, a] = *self;
        u32::from_be_bytes([a, r, g, b])
    }

    fn alpha(&self) -> u8 {
        self[3]
    }

    fn over(&self, dst: Color) -> Color {
        match self.alpha() {
            0xff => return *self,
            0 => return dst,
            _ => {}
        }

        let src_a = self[3] as u32;
        let dst_a = dst[3] as u32;
        // everything below is in units of 255 * 255
        let out_a = src_a * 255 + dst_a * (255 - src_a);
        if out_a == 0 {
            return Color::TRANSPARENT;
        }

        let channel = |i: usize| {
            let src = self[i] as u32 * src_a * 255;
            let dst = dst[i] as u32 * dst_a * (255 - src_a);
            ((src + dst + out_a / 2) / out_a) as u8
        };

        [
            channel(0),
            channel(1),
            channel(2),
            ((out_a + 127) / 255) as u8,
        ]
    }
}

macro_rules! coordinate_types {
    ($($Coord:ident : $T:ty),*) => {$(
        #[derive(Default, Debug, Clone, Copy, PartialEq)]
        pub struct $Coord {
            pub x: $T,
            pub y: $T,
        }

        impl Display for $Coord {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{},{}", self.x, self.y)
            }
        }
    )*};
}

coordinate_types!(PixelPos: f32, RawPoint: i32);

impl PixelPos {
    pub fn new(x: f32, y: f32) -> Self {
        PixelPos { x, y }
    }

    pub fn midpoint(self, other: PixelPos) -> PixelPos {
        PixelPos {
            x: (self.x + other.x) / 2.,
            y: (self.y + other.y) / 2.,
        }
    }

    pub fn to_point(self) -> Point {
        lyon::math::point(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<RawPoint> for PixelPos {
    fn from(raw: RawPoint) -> Self {
        PixelPos {
            x: raw.x as f32,
            y: raw.y as f32,
        }
    }
}

impl RawPoint {
    /// Truncates toward zero.
    pub fn from_pos(pos: PixelPos) -> Self {
        RawPoint {
            x: pos.x as i32,
            y: pos.y as i32,
        }
    }

    /// Chebyshev distance to a float sample.
    pub fn max_delta(&self, pos: PixelPos) -> f32 {
        let dx = (pos.x - self.x as f32).abs();
        let dy = (pos.y - self.y as f32).abs();
        dx.max(dy)
    }
}

fn edge(a: Point, b: Point, x: f32, y: f32) -> f32 {
    (b.x - a.x) * (y - a.y) - (b.y - a.y) * (x - a.x)
}

/// Pixel-center coverage of a triangle list, clipped to `width`x`height`.
///
/// Calls `cover` once for every covered pixel, however many triangles overlap
/// it.
pub fn cover_triangles(
    width: u32,
    height: u32,
    vertices: &[Point],
    indices: &[u32],
    mut cover: impl FnMut(u32, u32),
) {
    if width == 0 || height == 0 || indices.len() < 3 {
        return;
    }

    let mut left = f32::INFINITY;
    let mut top = f32::INFINITY;
    let mut right = f32::NEG_INFINITY;
    let mut bottom = f32::NEG_INFINITY;
    for point in vertices.iter() {
        left = left.min(point.x);
        top = top.min(point.y);
        right = right.max(point.x);
        bottom = bottom.max(point.y);
    }

    if right < 0. || bottom < 0. || left >= width as f32 || top >= height as f32 {
        return;
    }

    let x0 = left.floor().max(0.) as u32;
    let y0 = top.floor().max(0.) as u32;
    let x1 = (right.ceil() as u32).min(width);
    let y1 = (bottom.ceil() as u32).min(height);
    if x1 <= x0 || y1 <= y0 {
        return;
    }

    let mask_width = (x1 - x0) as usize;
    let mut mask = vec![false; mask_width * (y1 - y0) as usize];

    for tri in indices.chunks_exact(3) {
        let a = vertices[tri[0] as usize];
        let b = vertices[tri[1] as usize];
        let c = vertices[tri[2] as usize];

        let area = edge(a, b, c.x, c.y);
        if area == 0. {
            continue;
        }

        let tx0 = a.x.min(b.x).min(c.x).floor().max(x0 as f32) as u32;
        let ty0 = a.y.min(b.y).min(c.y).floor().max(y0 as f32) as u32;
        let tx1 = (a.x.max(b.x).max(c.x).ceil() as u32).min(x1);
        let ty1 = (a.y.max(b.y).max(c.y).ceil() as u32).min(y1);

        for y in ty0..ty1 {
            let cy = y as f32 + 0.5;
            for x in tx0..tx1 {
                let cx = x as f32 + 0.5;
                let w0 = edge(b, c, cx, cy);
                let w1 = edge(c, a, cx, cy);
                let w2 = edge(a, b, cx, cy);

                let inside = if area > 0. {
                    w0 >= 0. && w1 >= 0. && w2 >= 0.
                } else {
                    w0 <= 0. && w1 <= 0. && w2 <= 0.
                };

                if inside {
                    mask[(y - y0) as usize * mask_width + (x - x0) as usize] = true;
                }
            }
        }
    }

    for (i, covered) in mask.into_iter().enumerate() {
        if covered {
            cover(x0 + (i % mask_width) as u32, y0 + (i / mask_width) as u32);
        }
    }
}
