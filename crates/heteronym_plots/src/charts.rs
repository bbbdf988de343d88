pub mod ipa_length;
pub mod variant_counts;
pub mod word_cards;

pub use ipa_length::plot_ipa_length;
pub use variant_counts::plot_variant_counts;
pub use word_cards::plot_word_cards;

use crate::{config::ChartTheme, render::Renderer};

use image::Rgb;
use std::path::{Path, PathBuf};
use strum_macros::{EnumIter, IntoStaticStr};

/// The figures a run produces, in render order
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum ChartKind {
    #[strum(serialize = "variant_counts_by_word.png")]
    VariantCounts,
    #[strum(serialize = "ipa_length_distribution.png")]
    IpaLength,
    #[strum(serialize = "word_cards.png")]
    WordCards,
}

impl ChartKind {
    pub fn file_name(self) -> &'static str {
        self.into()
    }

    pub fn output_path(self, out_dir: &Path) -> PathBuf {
        out_dir.join(self.file_name())
    }
}

/// Plot area in pixels plus the data ranges mapped onto it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axes {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl Axes {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn x_px(&self, x: f64) -> f64 {
        let (lo, hi) = self.x_range;
        self.left + (x - lo) / (hi - lo) * self.width
    }

    /// Larger values sit higher
    pub fn y_px(&self, y: f64) -> f64 {
        let (lo, hi) = self.y_range;
        self.bottom() - (y - lo) / (hi - lo) * self.height
    }

    pub fn draw_frame(&self, r: &mut Renderer, theme: &ChartTheme) {
        r.draw_rect(self.left, self.top, self.width, self.height, Rgb(theme.panel));
        r.draw_rect_outline(self.left, self.top, self.width, self.height, Rgb(theme.grid));
    }

    /// Vertical grid lines and labels under the plot area
    pub fn draw_x_ticks(&self, r: &mut Renderer, theme: &ChartTheme, ticks: &[f64]) {
        let size = theme.pt(theme.font_size * 0.9);
        for &t in ticks {
            let x = self.x_px(t);
            r.draw_vline_blend(x, self.top, self.bottom(), Rgb(theme.grid), theme.grid_alpha);
            r.draw_text_centered(x, self.bottom() + size * 0.3, &format_tick(t), size, Rgb(theme.text));
        }
    }

    /// Horizontal grid lines and labels left of the plot area
    pub fn draw_y_ticks(&self, r: &mut Renderer, theme: &ChartTheme, ticks: &[f64]) {
        let size = theme.pt(theme.font_size * 0.9);
        for &t in ticks {
            let y = self.y_px(t);
            r.draw_hline_blend(self.left, self.right(), y, Rgb(theme.grid), theme.grid_alpha);
            r.draw_text_right(self.left - size * 0.4, y - size * 0.5, &format_tick(t), size, Rgb(theme.text));
        }
    }
}

/// Round tick step near `span / target`
pub fn nice_step(span: f64, target: usize, integer: bool) -> f64 {
    if !(span > 0.0) {
        return 1.0;
    }
    let raw = span / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let norm = raw / magnitude;
    let step = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 2.5 && !integer {
        2.5
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    let step = step * magnitude;
    if integer { step.max(1.0).round() } else { step }
}

/// Tick positions covering [lo, hi]
pub fn nice_ticks(lo: f64, hi: f64, target: usize, integer: bool) -> Vec<f64> {
    let step = nice_step(hi - lo, target, integer);
    let first = (lo / step).ceil() * step;
    let mut ticks = Vec::new();
    let mut t = first;
    while t <= hi + step * 1e-9 {
        ticks.push(if t.abs() < step * 1e-9 { 0.0 } else { t });
        t += step;
    }
    ticks
}

/// Integers print without a fractional part
pub fn format_tick(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round() as i64)
    } else {
        let s = format!("{:.2}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Data range padded on both sides by `margin` of its span
pub fn padded_range(lo: f64, hi: f64, margin: f64) -> (f64, f64) {
    if hi - lo < f64::EPSILON {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * margin;
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_chart_file_names() {
        let names: Vec<&str> = ChartKind::iter().map(ChartKind::file_name).collect();
        assert_eq!(
            names,
            vec![
                "variant_counts_by_word.png",
                "ipa_length_distribution.png",
                "word_cards.png"
            ]
        );
        assert_eq!(
            ChartKind::WordCards.output_path(Path::new("figures")),
            PathBuf::from("figures/word_cards.png")
        );
    }

    #[test]
    fn test_nice_ticks_integer_axis() {
        assert_eq!(nice_ticks(0.0, 3.0, 5, true), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(nice_ticks(0.0, 20.0, 5, true), vec![0.0, 5.0, 10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_nice_ticks_fractional_axis() {
        assert_eq!(nice_ticks(2.5, 7.6, 5, false), vec![4.0, 6.0]);
        assert_eq!(nice_ticks(0.0, 10.0, 5, false), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_step(0.0, 5, false), 1.0);
    }

    #[test]
    fn test_axes_mapping() {
        let axes = Axes {
            left: 100.0,
            top: 50.0,
            width: 200.0,
            height: 100.0,
            x_range: (0.0, 4.0),
            y_range: (0.0, 10.0),
        };
        assert_eq!(axes.x_px(0.0), 100.0);
        assert_eq!(axes.x_px(4.0), 300.0);
        assert_eq!(axes.y_px(0.0), 150.0);
        assert_eq!(axes.y_px(10.0), 50.0);
    }

    #[test]
    fn test_format_and_padding() {
        assert_eq!(format_tick(3.0), "3");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(0.25), "0.25");
        assert_eq!(padded_range(4.0, 4.0, 0.05), (3.5, 4.5));
        let (lo, hi) = padded_range(0.0, 10.0, 0.05);
        assert!((lo + 0.5).abs() < 1e-9 && (hi - 10.5).abs() < 1e-9);
    }
}
