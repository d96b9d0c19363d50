//! EXIF orientation correction.
//!
//! Cameras often store pixels sideways and record the needed turn in the EXIF
//! Orientation tag. Only three values are acted on:
//!
//! | Tag | Turn |
//! |---|---|
//! | 6 | 90° clockwise |
//! | 8 | 90° counter-clockwise |
//! | 3 | 180° |
//!
//! Anything else, including a missing or unreadable tag, leaves the file
//! untouched.
//!
//! ## Geometry
//!
//! The turn is an affine rotation about the image center. Rotating about the
//! center moves the bounding box, so the two opposite corners `(0, 0)` and
//! `(w, h)` are pushed through the rotation and a translation moves the
//! smaller of their coordinates to the canvas origin. The canvas swaps width
//! and height for quarter turns. Each output pixel center is mapped back
//! through the inverse transform to pick its source pixel.
//!
//! The corrected image is re-encoded as JPEG and atomically replaces the
//! source file. The new file carries no EXIF, so a later run sees no
//! orientation tag and leaves it alone.

use super::codec::{ImagingError, decode_rgb, write_image};
use super::tags::read_orientation;
use image::{ImageFormat, Rgb, RgbImage};
use std::path::Path;

/// A correcting turn derived from an orientation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise90,
    CounterClockwise90,
    Half,
}

impl Rotation {
    /// Map an EXIF orientation value to the turn that makes it upright.
    pub fn from_orientation(value: u32) -> Option<Self> {
        match value {
            6 => Some(Rotation::Clockwise90),
            8 => Some(Rotation::CounterClockwise90),
            3 => Some(Rotation::Half),
            _ => None,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Clockwise90 => 90,
            Rotation::CounterClockwise90 => -90,
            Rotation::Half => 180,
        }
    }

    pub fn swaps_dimensions(self) -> bool {
        self.degrees().abs() == 90
    }

    /// Exact `(sin, cos)` in image coordinates (y grows downwards, so a
    /// positive angle turns clockwise on screen).
    fn sin_cos(self) -> (f64, f64) {
        match self {
            Rotation::Clockwise90 => (1.0, 0.0),
            Rotation::CounterClockwise90 => (-1.0, 0.0),
            Rotation::Half => (0.0, -1.0),
        }
    }
}

/// `(x, y) → (a·x + c·y + e, b·x + d·y + f)`
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Affine {
    fn rotation_about(sin: f64, cos: f64, cx: f64, cy: f64) -> Self {
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: cx - cos * cx + sin * cy,
            f: cy - sin * cx - cos * cy,
        }
    }

    fn translation(tx: f64, ty: f64) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: tx,
            f: ty,
        }
    }

    /// `self` first, then `next`.
    fn then(self, next: Affine) -> Affine {
        Affine {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Inverse of a non-degenerate transform (rotations and translations are).
    fn inverse(&self) -> Affine {
        let det = self.a * self.d - self.b * self.c;
        Affine {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        }
    }
}

/// Rotation about the center followed by the translation back onto the canvas.
fn placement_transform(rotation: Rotation, width: u32, height: u32) -> Affine {
    let (w, h) = (f64::from(width), f64::from(height));
    let (sin, cos) = rotation.sin_cos();
    let rotate = Affine::rotation_about(sin, cos, w / 2.0, h / 2.0);

    let (x0, y0) = rotate.apply(0.0, 0.0);
    let (x1, y1) = rotate.apply(w, h);
    let shift = Affine::translation(-x0.min(x1), -y0.min(y1));

    rotate.then(shift)
}

/// Turn a buffer by `rotation`.
pub fn rotate_image(img: &RgbImage, rotation: Rotation) -> RgbImage {
    let (width, height) = img.dimensions();
    let (out_w, out_h) = if rotation.swaps_dimensions() {
        (height, width)
    } else {
        (width, height)
    };
    let inverse = placement_transform(rotation, width, height).inverse();

    RgbImage::from_fn(out_w, out_h, |ox, oy| {
        let (sx, sy) = inverse.apply(f64::from(ox) + 0.5, f64::from(oy) + 0.5);
        let (sx, sy) = (sx.floor(), sy.floor());
        if sx >= 0.0 && sy >= 0.0 && sx < f64::from(width) && sy < f64::from(height) {
            *img.get_pixel(sx as u32, sy as u32)
        } else {
            Rgb([0, 0, 0])
        }
    })
}

/// Rewrite `path` upright if its orientation tag asks for a turn.
///
/// Returns the applied turn, or `None` when the file was left alone (no tag,
/// unreadable metadata, or an orientation that needs no turn).
pub fn correct_orientation(path: &Path) -> Result<Option<Rotation>, ImagingError> {
    let Some(rotation) = read_orientation(path).and_then(Rotation::from_orientation) else {
        return Ok(None);
    };
    let img = decode_rgb(path)?;
    write_image(&rotate_image(&img, rotation), path, ImageFormat::Jpeg)?;
    Ok(Some(rotation))
}
