//! Pure calculation functions for derivative dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// What the preview step should do with a source of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewPlan {
    /// The source fits the box; the original file doubles as the preview.
    PassThrough,
    /// Scale to exactly these dimensions.
    Scale { width: u32, height: u32 },
}

/// Decide the preview size for a source inside a bounding box.
///
/// A source that fits (`w <= box_w && h <= box_h`) passes through. Otherwise:
///
/// - **Landscape** (`w >= h && w > box_w`): width becomes `box_w`, height is
///   `floor(box_w * h / w)`.
/// - **Portrait** (`h > box_h`): height becomes `box_h`, width is
///   `floor(box_h * w / h)`.
/// - Neither rule applies (`w < h`, `w > box_w`, `h <= box_h`): the source
///   dimensions are kept. Only a box taller than it is wide can reach this.
///
/// This differs from the literal landscape rule: when that rule would leave
/// the height above `box_h` (a wide box and a nearly square source) the
/// portrait rule is used instead, so the result never exceeds the box on a
/// scaled axis. The literal rule would turn 1000x1000 in 800x600 into
/// 800x800; this gives 600x600. Computed sides are at least one pixel.
///
/// ```text
/// (1000, 2000) in 800x600 → Scale 300x600   (portrait)
/// (1600, 900)  in 800x600 → Scale 800x450   (landscape)
/// (1000, 1000) in 800x600 → Scale 600x600   (landscape overflow, portrait used)
/// (800, 600)   in 800x600 → PassThrough
/// ```
pub fn calculate_preview_plan(source: (u32, u32), bounds: (u32, u32)) -> PreviewPlan {
    let (w, h) = source;
    let (box_w, box_h) = bounds;

    if w <= box_w && h <= box_h {
        return PreviewPlan::PassThrough;
    }

    let landscape = w >= h && w > box_w;
    let (width, height) = if landscape && scale_side(box_w, h, w) <= box_h {
        (box_w, scale_side(box_w, h, w))
    } else if h > box_h {
        (scale_side(box_h, w, h), box_h)
    } else {
        (w, h)
    };

    PreviewPlan::Scale { width, height }
}

/// `floor(target * other / side)`, never below one pixel.
fn scale_side(target: u32, other: u32, side: u32) -> u32 {
    let scaled = u64::from(target) * u64::from(other) / u64::from(side.max(1));
    (scaled as u32).max(1)
}

/// Square region cut out of a source before thumbnail scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

/// Centered square crop: the longer dimension is trimmed symmetrically.
///
/// The offset is `(long - short) / 2`, so with an odd difference the extra
/// pixel is dropped from the right (or bottom) edge.
pub fn calculate_square_crop(source: (u32, u32)) -> CropRegion {
    let (w, h) = source;
    if w > h {
        CropRegion {
            x: (w - h) / 2,
            y: 0,
            side: h,
        }
    } else if h > w {
        CropRegion {
            x: 0,
            y: (h - w) / 2,
            side: w,
        }
    } else {
        CropRegion { x: 0, y: 0, side: w }
    }
}

/// Number of placeholders needed so `count + pad` is a multiple of `per_row`.
///
/// Returns 0 for `per_row == 0`; config validation rejects that value.
pub fn calculate_padding(count: usize, per_row: usize) -> usize {
    if per_row == 0 {
        return 0;
    }
    (per_row - count % per_row) % per_row
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // calculate_preview_plan
    // =========================================================================

    #[test]
    fn preview_portrait_rule() {
        assert_eq!(
            calculate_preview_plan((1000, 2000), (800, 600)),
            PreviewPlan::Scale {
                width: 300,
                height: 600
            }
        );
    }

    #[test]
    fn preview_landscape_rule() {
        assert_eq!(
            calculate_preview_plan((1600, 900), (800, 600)),
            PreviewPlan::Scale {
                width: 800,
                height: 450
            }
        );
    }

    #[test]
    fn preview_landscape_truncates() {
        // 800 * 1000 / 3000 = 266.67 → 266
        assert_eq!(
            calculate_preview_plan((3000, 1000), (800, 600)),
            PreviewPlan::Scale {
                width: 800,
                height: 266
            }
        );
    }

    #[test]
    fn preview_exact_box_passes_through() {
        assert_eq!(
            calculate_preview_plan((800, 600), (800, 600)),
            PreviewPlan::PassThrough
        );
    }

    #[test]
    fn preview_small_source_passes_through() {
        assert_eq!(
            calculate_preview_plan((50, 50), (800, 600)),
            PreviewPlan::PassThrough
        );
    }

    #[test]
    fn preview_square_source_taller_than_box() {
        // The literal landscape rule gives 800x800, taller than the box
        assert_eq!(
            calculate_preview_plan((1000, 1000), (800, 600)),
            PreviewPlan::Scale {
                width: 600,
                height: 600
            }
        );
    }

    #[test]
    fn preview_unscaled_branch_keeps_source_dimensions() {
        // Tall box: w > box_w, w < h, h <= box_h
        assert_eq!(
            calculate_preview_plan((150, 180), (100, 200)),
            PreviewPlan::Scale {
                width: 150,
                height: 180
            }
        );
    }

    #[test]
    fn preview_extreme_aspect_keeps_one_pixel() {
        assert_eq!(
            calculate_preview_plan((10000, 1), (800, 600)),
            PreviewPlan::Scale {
                width: 800,
                height: 1
            }
        );
    }

    #[test]
    fn preview_preserves_aspect_within_box() {
        let bounds = (800u32, 600u32);
        for w in (100..3000).step_by(137) {
            for h in (100..3000).step_by(151) {
                match calculate_preview_plan((w, h), bounds) {
                    PreviewPlan::PassThrough => {
                        assert!(w <= bounds.0 && h <= bounds.1);
                    }
                    PreviewPlan::Scale { width, height } => {
                        assert!(width <= bounds.0, "{w}x{h} → {width}x{height}");
                        assert!(height <= bounds.1, "{w}x{h} → {width}x{height}");
                        let expected = (bounds.0 as f64 / w as f64).min(bounds.1 as f64 / h as f64);
                        let actual = (width as f64 / w as f64).max(height as f64 / h as f64);
                        let one_px = 1.0 / (w.min(h) as f64);
                        assert!(
                            (actual - expected).abs() <= one_px,
                            "{w}x{h}: scale {actual} vs {expected}"
                        );
                    }
                }
            }
        }
    }

    // =========================================================================
    // calculate_square_crop
    // =========================================================================

    #[test]
    fn crop_landscape_trims_left_and_right() {
        assert_eq!(
            calculate_square_crop((1000, 600)),
            CropRegion {
                x: 200,
                y: 0,
                side: 600
            }
        );
    }

    #[test]
    fn crop_portrait_trims_top_and_bottom() {
        assert_eq!(
            calculate_square_crop((1000, 2000)),
            CropRegion {
                x: 0,
                y: 500,
                side: 1000
            }
        );
    }

    #[test]
    fn crop_square_is_untouched() {
        assert_eq!(
            calculate_square_crop((300, 300)),
            CropRegion { x: 0, y: 0, side: 300 }
        );
    }

    #[test]
    fn crop_odd_difference_rounds_offset_down() {
        assert_eq!(
            calculate_square_crop((101, 100)),
            CropRegion { x: 0, y: 0, side: 100 }
        );
    }

    #[test]
    fn crop_side_is_always_min_dimension() {
        for w in 1..60 {
            for h in 1..60 {
                let crop = calculate_square_crop((w, h));
                assert_eq!(crop.side, w.min(h));
                assert!(crop.x + crop.side <= w);
                assert!(crop.y + crop.side <= h);
            }
        }
    }

    // =========================================================================
    // calculate_padding
    // =========================================================================

    #[test]
    fn padding_to_full_rows() {
        assert_eq!(calculate_padding(3, 2), 1);
        assert_eq!(calculate_padding(7, 6), 5);
        assert_eq!(calculate_padding(12, 6), 0);
        assert_eq!(calculate_padding(0, 6), 0);
    }

    #[test]
    fn padding_is_minimal() {
        for count in 0..50 {
            for per_row in 1..9 {
                let pad = calculate_padding(count, per_row);
                assert_eq!((count + pad) % per_row, 0);
                assert!(pad < per_row);
            }
        }
    }
}
