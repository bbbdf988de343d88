use super::{Axes, ChartKind, nice_ticks};
use crate::{
    aggregate::{WordCount, by_language, variant_counts},
    config::ChartTheme,
    constants::FACET_COLUMNS,
    error::Result,
    record::Dataset,
    render::Renderer,
};

use image::Rgb;
use log::{debug, info};
use std::path::{Path, PathBuf};

const X_LABEL: &str = "# unika uttal (IPA)";
const Y_LABEL: &str = "ord";

/// Facet edge in inches
const FACET_INCHES: f64 = 5.0;
/// Extra facet height per bar once a panel holds many words
const INCHES_PER_BAR: f64 = 0.18;

/// (columns, rows) for `n` facets wrapped at [`FACET_COLUMNS`]
pub fn facet_grid(n: usize) -> (usize, usize) {
    let cols = n.clamp(1, FACET_COLUMNS);
    let rows = n.div_ceil(FACET_COLUMNS).max(1);
    (cols, rows)
}

/// Facet height in inches for the largest panel
pub fn facet_height_inches(max_bars: usize) -> f64 {
    FACET_INCHES.max(INCHES_PER_BAR * max_bars as f64 + 1.5)
}

/// One horizontal bar panel per language; every (language, word) group is plotted.
pub fn plot_variant_counts(data: &Dataset, out_dir: &Path, theme: &ChartTheme) -> Result<PathBuf> {
    let counts = variant_counts(data);
    let facets = by_language(&counts);
    debug!("Variant counts: {} groups in {} languages", counts.len(), facets.len());

    let (cols, rows) = facet_grid(facets.len());
    let max_bars = facets.iter().map(|(_, f)| f.len()).max().unwrap_or(0);
    let facet_w = theme.inches(FACET_INCHES) as f64;
    let facet_h = theme.inches(facet_height_inches(max_bars)) as f64;

    // shared x axis across panels
    let x_max = counts.iter().map(|c| c.n_variants).max().unwrap_or(0).max(1) as f64;

    let mut renderer = Renderer::new(
        (facet_w * cols as f64) as u32,
        (facet_h * rows as f64) as u32,
        theme,
    )?;

    for (i, (language, words)) in facets.iter().enumerate() {
        let ox = (i % FACET_COLUMNS) as f64 * facet_w;
        let oy = (i / FACET_COLUMNS) as f64 * facet_h;
        draw_facet(&mut renderer, theme, (ox, oy, facet_w, facet_h), language, words, x_max);
    }

    let out = ChartKind::VariantCounts.output_path(out_dir);
    renderer.save(&out)?;
    info!("Wrote {}", out.display());
    Ok(out)
}

fn draw_facet(
    r: &mut Renderer,
    theme: &ChartTheme,
    (ox, oy, w, h): (f64, f64, f64, f64),
    language: &str,
    words: &[WordCount],
    x_max: f64,
) {
    let text = Rgb(theme.text);
    let title_size = theme.pt(theme.font_size * 1.2);
    let label_size = theme.pt(theme.font_size);
    let tick_size = theme.pt(theme.font_size * 0.9);
    let pad = label_size * 0.5;

    let word_w = words
        .iter()
        .map(|wc| r.text_size(&wc.word, tick_size).0)
        .fold(0.0, f64::max);

    let left = ox + pad * 2.0 + label_size + pad + word_w + tick_size * 0.4;
    let top = oy + pad + title_size + pad;
    let bottom = oy + h - (pad + label_size + pad + tick_size * 1.5);
    let axes = Axes {
        left,
        top,
        width: (ox + w - pad * 2.0 - left).max(1.0),
        height: (bottom - top).max(1.0),
        x_range: (0.0, x_max * 1.05),
        y_range: (0.0, words.len().max(1) as f64),
    };

    axes.draw_frame(r, theme);
    axes.draw_x_ticks(r, theme, &nice_ticks(0.0, x_max, 5, true));

    let slot = axes.height / words.len().max(1) as f64;
    for (j, wc) in words.iter().enumerate() {
        let cy = axes.top + (j as f64 + 0.5) * slot;
        let x0 = axes.x_px(0.0);
        let x1 = axes.x_px(wc.n_variants as f64);
        r.draw_rect(x0, cy - slot * 0.4, x1 - x0, slot * 0.8, Rgb(theme.bar));
        r.draw_text_right(axes.left - tick_size * 0.4, cy - tick_size * 0.5, &wc.word, tick_size, text);
    }

    r.draw_text_centered(axes.left + axes.width / 2.0, oy + pad, language, title_size, text);
    r.draw_text_centered(
        axes.left + axes.width / 2.0,
        axes.bottom() + tick_size * 1.5 + pad,
        X_LABEL,
        label_size,
        text,
    );
    r.draw_text_vertical(ox + pad + label_size / 2.0, axes.top + axes.height / 2.0, Y_LABEL, label_size, text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HeteronymError;
    use crate::record::PronunciationRecord;
    use tempfile::TempDir;

    #[test]
    fn test_facet_grid_wraps_at_two() {
        assert_eq!(facet_grid(0), (1, 1));
        assert_eq!(facet_grid(1), (1, 1));
        assert_eq!(facet_grid(2), (2, 1));
        assert_eq!(facet_grid(3), (2, 2));
        assert_eq!(facet_grid(5), (2, 3));
    }

    #[test]
    fn test_facet_height_grows_with_bars() {
        assert_eq!(facet_height_inches(3), 5.0);
        assert!(facet_height_inches(100) > 18.0);
    }

    #[test]
    fn test_plot_variant_counts_rejects_huge_facets() {
        let temp_dir = TempDir::new().unwrap();
        let records = (0..3000)
            .map(|i| PronunciationRecord {
                language: "en".to_string(),
                word: format!("w{i}"),
                sense_id: "1".to_string(),
                ipa: "x".to_string(),
                ..Default::default()
            })
            .collect();

        let result = plot_variant_counts(&Dataset::new(records), temp_dir.path(), &ChartTheme::default());
        assert!(matches!(result, Err(HeteronymError::CanvasTooLarge { .. })));
        assert!(!temp_dir.path().join("variant_counts_by_word.png").exists());
    }

    #[test]
    fn test_plot_variant_counts_writes_png() {
        let temp_dir = TempDir::new().unwrap();
        let rec = |language: &str, word: &str, sense: &str, ipa: &str| PronunciationRecord {
            language: language.to_string(),
            word: word.to_string(),
            sense_id: sense.to_string(),
            meaning: "m".to_string(),
            ipa: ipa.to_string(),
            source_file: "heteronyms_t.csv".to_string(),
        };
        let data = Dataset::new(vec![
            rec("en", "read", "1", "riːd"),
            rec("en", "read", "2", "rɛd"),
            rec("sv", "banan", "1", "banˈɑːn"),
            rec("de", "modern", "1", "ˈmoːdɐn"),
        ]);

        let out = match plot_variant_counts(&data, temp_dir.path(), &ChartTheme::default()) {
            Ok(out) => out,
            Err(HeteronymError::FontNotFound(_)) => return,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(out, temp_dir.path().join("variant_counts_by_word.png"));

        let img = image::open(&out).unwrap();
        // three languages -> 2 x 2 grid of 5in facets
        assert_eq!(img.width(), 2000);
        assert_eq!(img.height(), 2000);
    }
}
