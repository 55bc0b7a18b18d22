//! Pie chart of expenses by category.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::{Path, PathBuf};

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{ImageFormat, Rgb, RgbImage};
use tracing::{debug, warn};

use crate::aggregate::CategoryTotals;
use crate::error::ChartError;

/// Chart title drawn above the pie.
pub const TITLE: &str = "Expenses by Category";

/// Slice colours, cycled when there are more categories than entries.
pub const PALETTE: [[u8; 3]; 10] = [
    [0x1f, 0x77, 0xb4],
    [0xff, 0x7f, 0x0e],
    [0x2c, 0xa0, 0x2c],
    [0xd6, 0x27, 0x28],
    [0x94, 0x67, 0xbd],
    [0x8c, 0x56, 0x4b],
    [0xe3, 0x77, 0xc2],
    [0x7f, 0x7f, 0x7f],
    [0xbc, 0xbd, 0x22],
    [0x17, 0xbe, 0xcf],
];

const BACKGROUND: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const TEXT: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);
/// Glyph cell size of the bitmap font, in pixels.
const GLYPH: u32 = 8;
/// Percentages sit inside the wedge, category names just outside the pie.
const PERCENT_DISTANCE: f64 = 0.6;
const LABEL_DISTANCE: f64 = 1.1;

/// One wedge of the pie.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// Share of the whole pie, in `0.0..=1.0`.
    pub fraction: f64,
    pub color: [u8; 3],
}

impl PieSlice {
    /// Share as a percentage with one decimal, e.g. `62.5%`.
    pub fn percent_text(&self) -> String {
        format!("{:.1}%", self.fraction * 100.0)
    }

    /// Label with percentage, e.g. `Meals (62.5%)`.
    pub fn percent_label(&self) -> String {
        format!("{} ({})", self.label, self.percent_text())
    }
}

/// What a render request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    /// The chart was written to `path`.
    Saved { path: PathBuf, slices: Vec<PieSlice> },
    /// Nothing positive to plot; no file was written.
    NoData,
}

/// Compute pie slices from category totals.
///
/// Categories whose total is not positive are left out.
pub fn pie_slices(totals: &CategoryTotals) -> Vec<PieSlice> {
    let positive: Vec<(&String, f64)> = totals
        .totals
        .iter()
        .filter_map(|(label, &value)| {
            if value > 0.0 {
                Some((label, value))
            } else {
                warn!("Leaving {} out of the chart: total {:.2} is not positive", label, value);
                None
            }
        })
        .collect();

    let sum: f64 = positive.iter().map(|(_, v)| v).sum();

    positive
        .into_iter()
        .enumerate()
        .map(|(i, (label, value))| PieSlice {
            label: label.clone(),
            value,
            fraction: value / sum,
            color: PALETTE[i % PALETTE.len()],
        })
        .collect()
}

/// Render category totals as a PNG pie chart.
///
/// The image carries the title, each slice's category name outside the pie
/// and its percentage inside the wedge.
///
/// Returns [`ChartOutcome::NoData`] without touching the file system when
/// there is nothing to plot.
pub fn render_pie_chart(
    totals: &CategoryTotals,
    path: &Path,
    width: u32,
    height: u32,
) -> Result<ChartOutcome, ChartError> {
    if width == 0 || height == 0 {
        return Err(ChartError::InvalidSize { width, height });
    }

    let slices = pie_slices(totals);
    if slices.is_empty() {
        return Ok(ChartOutcome::NoData);
    }

    let img = draw(&slices, width, height);
    img.save_with_format(path, ImageFormat::Png)?;
    debug!("Wrote {}x{} chart with {} slices", width, height, slices.len());

    Ok(ChartOutcome::Saved {
        path: path.to_path_buf(),
        slices,
    })
}

/// Canvas geometry shared by the wedges and the text placed on them.
#[derive(Debug, Clone, Copy)]
struct Layout {
    width: u32,
    /// Integer upscale of the bitmap font for labels.
    scale: u32,
    title_scale: u32,
    title_top: u32,
    cx: f64,
    cy: f64,
    radius: f64,
}

impl Layout {
    fn new(width: u32, height: u32) -> Self {
        let scale = (width.min(height) / 250).max(1);
        let title_scale = scale + 1;
        let pad = GLYPH * scale / 2;
        let band = GLYPH * title_scale + 2 * pad;
        let plot_height = height.saturating_sub(band) as f64;

        Self {
            width,
            scale,
            title_scale,
            title_top: pad,
            cx: width as f64 / 2.0,
            cy: band as f64 + plot_height / 2.0,
            radius: (width as f64 / 2.0).min(plot_height / 2.0) * 0.7,
        }
    }

    /// Point at `turn` (fraction of a turn counter-clockwise from twelve
    /// o'clock) and `distance` radii from the centre.
    fn point(&self, turn: f64, distance: f64) -> (f64, f64) {
        let angle = FRAC_PI_2 + turn * TAU;
        let r = self.radius * distance;
        (self.cx + r * angle.cos(), self.cy - r * angle.sin())
    }

    fn title_origin(&self) -> (i64, i64) {
        let w = text_width(TITLE, self.title_scale) as f64;
        ((self.cx - w / 2.0).round() as i64, self.title_top as i64)
    }

    /// Top-left corner for a percentage centred inside the wedge.
    fn percent_origin(&self, text: &str, turn: f64) -> (i64, i64) {
        let (x, y) = self.point(turn, PERCENT_DISTANCE);
        let w = text_width(text, self.scale) as f64;
        let h = (GLYPH * self.scale) as f64;
        ((x - w / 2.0).round() as i64, (y - h / 2.0).round() as i64)
    }

    /// Top-left corner for a category name just outside the pie, extending
    /// away from it and kept on the canvas where it fits.
    fn label_origin(&self, text: &str, turn: f64) -> (i64, i64) {
        let (x, y) = self.point(turn, LABEL_DISTANCE);
        let w = text_width(text, self.scale) as i64;
        let h = (GLYPH * self.scale) as f64;

        let left = if x < self.cx - 0.5 {
            x.round() as i64 - w
        } else if x > self.cx + 0.5 {
            x.round() as i64
        } else {
            (x - w as f64 / 2.0).round() as i64
        };
        let max_left = (self.width as i64 - w).max(0);

        (left.clamp(0, max_left), (y - h / 2.0).round() as i64)
    }
}

fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH * scale
}

/// Draw `text` with its top-left corner at `(x, y)`, clipped to the image.
///
/// Characters missing from the bitmap font leave a blank cell.
fn draw_text(img: &mut RgbImage, text: &str, (x, y): (i64, i64), scale: u32, color: Rgb<u8>) {
    let (width, height) = (img.width() as i64, img.height() as i64);
    let s = scale as i64;
    let cell = GLYPH as i64 * s;

    for (i, c) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(c).or_else(|| LATIN_FONTS.get(c)) else {
            continue;
        };
        let left = x + i as i64 * cell;

        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..8u8 {
                // Bit 0 is the leftmost pixel of the row.
                if *bits & (1 << col) == 0 {
                    continue;
                }
                for dy in 0..s {
                    for dx in 0..s {
                        let px = left + col as i64 * s + dx;
                        let py = y + row as i64 * s + dy;
                        if (0..width).contains(&px) && (0..height).contains(&py) {
                            img.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
    }
}

/// Midpoint of each slice, as a fraction of a turn.
fn mid_turns(bounds: &[f64]) -> impl Iterator<Item = f64> + '_ {
    bounds
        .iter()
        .scan(0.0, |start, &end| {
            let mid = (*start + end) / 2.0;
            *start = end;
            Some(mid)
        })
}

fn cumulative_bounds(slices: &[PieSlice]) -> Vec<f64> {
    slices
        .iter()
        .scan(0.0, |acc, s| {
            *acc += s.fraction;
            Some(*acc)
        })
        .collect()
}

fn draw(slices: &[PieSlice], width: u32, height: u32) -> RgbImage {
    let layout = Layout::new(width, height);
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let bounds = cumulative_bounds(slices);
    let radius = layout.radius;

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as f64 + 0.5 - layout.cx;
        let dy = layout.cy - (y as f64 + 0.5);
        if dx * dx + dy * dy > radius * radius {
            continue;
        }

        // Counter-clockwise from twelve o'clock, as a fraction of a turn.
        let turn = (dy.atan2(dx) - FRAC_PI_2).rem_euclid(TAU) / TAU;
        let idx = bounds
            .iter()
            .position(|&end| turn < end)
            .unwrap_or(slices.len() - 1);

        *pixel = Rgb(slices[idx].color);
    }

    for (slice, turn) in slices.iter().zip(mid_turns(&bounds)) {
        let percent = slice.percent_text();
        draw_text(&mut img, &percent, layout.percent_origin(&percent, turn), layout.scale, TEXT);
        draw_text(&mut img, &slice.label, layout.label_origin(&slice.label, turn), layout.scale, TEXT);
    }

    draw_text(&mut img, TITLE, layout.title_origin(), layout.title_scale, TEXT);

    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn totals(pairs: &[(&str, f64)]) -> CategoryTotals {
        CategoryTotals {
            totals: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
            skipped_no_amount: 0,
        }
    }

    #[test]
    fn test_slices_and_labels() {
        let slices = pie_slices(&totals(&[("Meals", 75.0), ("Transport", 25.0)]));

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].percent_label(), "Meals (75.0%)");
        assert_eq!(slices[1].percent_label(), "Transport (25.0%)");
        assert_eq!(slices[0].color, PALETTE[0]);
        assert_eq!(slices[1].color, PALETTE[1]);
    }

    #[test]
    fn test_non_positive_totals_are_left_out() {
        let slices = pie_slices(&totals(&[("Refunds", -20.0), ("Lodging", 50.0), ("Zero", 0.0)]));

        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].label, "Lodging");
        assert_eq!(slices[0].fraction, 1.0);
    }

    #[test]
    fn test_empty_totals_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pie.png");

        let outcome = render_pie_chart(&CategoryTotals::default(), &path, 100, 80).unwrap();

        assert_eq!(outcome, ChartOutcome::NoData);
        assert!(!path.exists());
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pie.png");

        let outcome = render_pie_chart(&totals(&[("Meals", 10.0)]), &path, 400, 300).unwrap();

        let ChartOutcome::Saved { path: saved, slices } = outcome else {
            panic!("expected a saved chart");
        };
        assert_eq!(saved, path);
        assert_eq!(slices.len(), 1);

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (400, 300));
        assert_eq!(*img.get_pixel(200, 133), Rgb(PALETTE[0]));
        assert_eq!(*img.get_pixel(0, 299), BACKGROUND);
    }

    fn assert_text_at(img: &RgbImage, text: &str, origin: (i64, i64), scale: u32) {
        let mut expected = RgbImage::from_pixel(img.width(), img.height(), BACKGROUND);
        draw_text(&mut expected, text, origin, scale, TEXT);

        let mut inked = 0;
        for (x, y, pixel) in expected.enumerate_pixels() {
            if *pixel == TEXT {
                inked += 1;
                assert_eq!(*img.get_pixel(x, y), TEXT, "{text:?} missing at ({x}, {y})");
            }
        }
        assert!(inked > 0, "{text:?} fell outside the canvas");
    }

    #[test]
    fn test_title_and_slice_labels_are_drawn() {
        let slices = pie_slices(&totals(&[("Meals", 75.0), ("Transport", 25.0)]));
        let img = draw(&slices, 400, 300);
        let layout = Layout::new(400, 300);

        assert_text_at(&img, TITLE, layout.title_origin(), layout.title_scale);

        let bounds = cumulative_bounds(&slices);
        let turns: Vec<f64> = mid_turns(&bounds).collect();
        assert_eq!(turns, vec![0.375, 0.875]);

        for (slice, turn) in slices.iter().zip(turns) {
            let percent = slice.percent_text();
            assert_text_at(&img, &percent, layout.percent_origin(&percent, turn), layout.scale);
            assert_text_at(&img, &slice.label, layout.label_origin(&slice.label, turn), layout.scale);
        }
        assert_eq!(slices[0].percent_text(), "75.0%");
    }

    #[test]
    fn test_labels_stay_on_canvas() {
        let layout = Layout::new(400, 300);

        // Left of centre extends leftwards, right of centre rightwards.
        let (left, _) = layout.label_origin("Meals", 0.375);
        assert!(left + 40 <= layout.cx as i64);
        let (right, _) = layout.label_origin("Transport", 0.875);
        assert!(right >= layout.cx as i64);

        let long = "Office Supplies and Other Sundries";
        let (x, _) = layout.label_origin(long, 0.25);
        assert_eq!(x, 0);
    }

    #[test]
    fn test_draw_text_clips_and_skips_unknown_glyphs() {
        let mut img = RgbImage::from_pixel(20, 10, BACKGROUND);
        draw_text(&mut img, "\u{2603}A", (-4, -2), 1, TEXT);

        // The snowman cell stays blank; only the clipped `A` is inked.
        assert!(img.pixels().any(|p| *p == TEXT));
        assert!(img.enumerate_pixels().all(|(x, _, p)| *p == BACKGROUND || (4..12).contains(&x)));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = render_pie_chart(&totals(&[("Meals", 1.0)]), &dir.path().join("x.png"), 0, 10)
            .unwrap_err();
        assert!(matches!(err, ChartError::InvalidSize { width: 0, height: 10 }));
    }
}
