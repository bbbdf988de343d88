use super::{Axes, ChartKind, nice_ticks, padded_range};
use crate::{
    aggregate::{BoxStats, ipa_lengths},
    config::ChartTheme,
    constants::{BOX_WIDTH, JITTER_SEED, STRIP_JITTER},
    error::Result,
    record::Dataset,
    render::Renderer,
};

use image::Rgb;
use log::info;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::path::{Path, PathBuf};

const TITLE: &str = "Längd på IPA-strängen per språk (grovt proxy-mått)";
const X_LABEL: &str = "språk";
const Y_LABEL: &str = "IPA-längd (tecken)";

const FIG_W_INCHES: f64 = 9.0;
const FIG_H_INCHES: f64 = 5.0;

/// Jittered x offsets (category units) for `n` points, reproducible per category
pub fn jitter_offsets(category: usize, n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(JITTER_SEED ^ category as u64);
    (0..n)
        .map(|_| rng.random_range(-STRIP_JITTER..=STRIP_JITTER))
        .collect()
}

/// Strip plot of IPA lengths per language overlaid with an unfilled box plot.
pub fn plot_ipa_length(data: &Dataset, out_dir: &Path, theme: &ChartTheme) -> Result<PathBuf> {
    let groups = ipa_lengths(data);

    let mut renderer = Renderer::new(theme.inches(FIG_W_INCHES), theme.inches(FIG_H_INCHES), theme)?;
    let text = Rgb(theme.text);
    let title_size = theme.pt(theme.font_size * 1.2);
    let label_size = theme.pt(theme.font_size);
    let tick_size = theme.pt(theme.font_size * 0.9);
    let pad = label_size * 0.5;
    let (w, h) = (renderer.width as f64, renderer.height as f64);

    let all = groups.iter().flat_map(|(_, v)| v.iter().copied());
    let lo = all.clone().min().unwrap_or(0) as f64;
    let hi = all.max().unwrap_or(1) as f64;
    let y_range = padded_range(lo, hi, 0.05);
    let y_ticks = nice_ticks(y_range.0, y_range.1, 6, true);

    let tick_w = y_ticks
        .iter()
        .map(|t| renderer.text_size(&super::format_tick(*t), tick_size).0)
        .fold(0.0, f64::max);
    let left = pad * 2.0 + label_size + pad + tick_w + tick_size * 0.4;
    let top = pad * 2.0 + title_size + pad;
    let bottom = h - (pad * 2.0 + label_size + tick_size * 1.5);
    let axes = Axes {
        left,
        top,
        width: (w - pad * 2.0 - left).max(1.0),
        height: (bottom - top).max(1.0),
        x_range: (-0.5, groups.len().max(1) as f64 - 0.5),
        y_range,
    };

    axes.draw_frame(&mut renderer, theme);
    axes.draw_y_ticks(&mut renderer, theme, &y_ticks);

    let radius = theme.pt(2.5);
    for (i, (language, lengths)) in groups.iter().enumerate() {
        let color = theme.category_color(i);
        let x = i as f64;

        for (len, dx) in lengths.iter().zip(jitter_offsets(i, lengths.len())) {
            renderer.draw_point(axes.x_px(x + dx), axes.y_px(*len as f64), radius, color, theme.point_alpha);
        }

        let values: Vec<f64> = lengths.iter().map(|&l| l as f64).collect();
        if let Some(stats) = BoxStats::from_values(&values) {
            draw_box(&mut renderer, theme, &axes, x, &stats, radius);
        }

        renderer.draw_text_centered(axes.x_px(x), axes.bottom() + tick_size * 0.3, language, tick_size, text);
    }

    renderer.draw_text_centered(w / 2.0, pad * 2.0, TITLE, title_size, text);
    renderer.draw_text_centered(
        axes.left + axes.width / 2.0,
        axes.bottom() + tick_size * 1.5 + pad,
        X_LABEL,
        label_size,
        text,
    );
    renderer.draw_text_vertical(pad + label_size / 2.0, axes.top + axes.height / 2.0, Y_LABEL, label_size, text);

    let out = ChartKind::IpaLength.output_path(out_dir);
    renderer.save(&out)?;
    info!("Wrote {}", out.display());
    Ok(out)
}

fn draw_box(r: &mut Renderer, theme: &ChartTheme, axes: &Axes, x: f64, stats: &BoxStats, radius: f64) {
    let line = Rgb(theme.box_line);
    let thickness = (theme.pt(1.0).round() as u32).max(1);
    let half = BOX_WIDTH / 2.0;
    let (x0, x1) = (axes.x_px(x - half), axes.x_px(x + half));
    let xc = axes.x_px(x);
    let (y_q1, y_q3) = (axes.y_px(stats.q1), axes.y_px(stats.q3));

    // box outline only; points stay visible through it
    r.draw_rect_outline_thick(x0, y_q3, x1 - x0, (y_q1 - y_q3).max(1.0), thickness, line);
    r.draw_thick_line((x0, axes.y_px(stats.median)), (x1, axes.y_px(stats.median)), thickness, line);

    let (cap0, cap1) = (axes.x_px(x - half / 2.0), axes.x_px(x + half / 2.0));
    for (edge, whisker) in [(y_q1, stats.whisker_low), (y_q3, stats.whisker_high)] {
        let y = axes.y_px(whisker);
        r.draw_thick_line((xc, edge), (xc, y), thickness, line);
        r.draw_thick_line((cap0, y), (cap1, y), thickness, line);
    }

    for &v in &stats.outliers {
        let y = axes.y_px(v);
        r.draw_rect_outline(xc - radius, y - radius, radius * 2.0, radius * 2.0, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HeteronymError;
    use crate::record::PronunciationRecord;
    use tempfile::TempDir;

    #[test]
    fn test_jitter_is_bounded_and_reproducible() {
        let a = jitter_offsets(0, 50);
        let b = jitter_offsets(0, 50);
        assert_eq!(a, b);
        assert!(a.iter().all(|d| d.abs() <= STRIP_JITTER));
        assert_ne!(jitter_offsets(1, 50), a);
    }

    #[test]
    fn test_plot_ipa_length_writes_png() {
        let temp_dir = TempDir::new().unwrap();
        let rec = |language: &str, ipa: &str| PronunciationRecord {
            language: language.to_string(),
            word: "w".to_string(),
            sense_id: "1".to_string(),
            meaning: "m".to_string(),
            ipa: ipa.to_string(),
            source_file: "heteronyms_t.csv".to_string(),
        };
        let data = Dataset::new(vec![
            rec("en", "riːd"),
            rec("en", "rɛd"),
            rec("en", "ˈaɪðər"),
            rec("sv", "banˈɑːn"),
        ]);

        let out = match plot_ipa_length(&data, temp_dir.path(), &ChartTheme::default()) {
            Ok(out) => out,
            Err(HeteronymError::FontNotFound(_)) => return,
            Err(e) => panic!("unexpected error: {e}"),
        };
        let img = image::open(&out).unwrap();
        assert_eq!((img.width(), img.height()), (1800, 1000));
    }

    #[test]
    fn test_plot_ipa_length_empty_dataset() {
        let temp_dir = TempDir::new().unwrap();
        match plot_ipa_length(&Dataset::default(), temp_dir.path(), &ChartTheme::default()) {
            Ok(out) => assert!(out.exists()),
            Err(HeteronymError::FontNotFound(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}
