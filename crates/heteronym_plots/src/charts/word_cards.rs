use super::ChartKind;
use crate::{
    aggregate::{WordCard, word_cards},
    config::ChartTheme,
    error::Result,
    record::Dataset,
    render::Renderer,
};

use image::Rgb;
use log::{info, warn};
use std::path::{Path, PathBuf};

const TITLE: &str = "Exempelord och uttalsvarianter";
const VARIANT_SEPARATOR: &str = " / ";

const FIG_W_INCHES: f64 = 11.0;

// Vertical steps, as fractions of figure height
const STEP_TITLE: f64 = 0.06;
const STEP_HEADER: f64 = 0.035;
const STEP_VARIANTS: f64 = 0.03;
const STEP_MEANING: f64 = 0.025;
const STEP_GAP: f64 = 0.02;
const START_Y: f64 = 0.98;
const STOP_Y: f64 = 0.05;

/// Role of a text line, which sets its indent and font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Header,
    Variants,
    Meaning,
}

impl LineStyle {
    /// Indent as a fraction of figure width
    fn indent(self) -> f64 {
        match self {
            LineStyle::Title | LineStyle::Header => 0.01,
            LineStyle::Variants => 0.03,
            LineStyle::Meaning => 0.05,
        }
    }

    fn points(self) -> f64 {
        match self {
            LineStyle::Title => 16.0,
            LineStyle::Header => 13.0,
            LineStyle::Variants => 12.0,
            LineStyle::Meaning => 10.5,
        }
    }

    fn bold(self) -> bool {
        matches!(self, LineStyle::Title | LineStyle::Header)
    }
}

/// One positioned line; `y` is the top edge as a fraction measured from the bottom
#[derive(Debug, Clone, PartialEq)]
pub struct CardLine {
    pub y: f64,
    pub style: LineStyle,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub lines: Vec<CardLine>,
    /// Cards laid out before space ran out
    pub rendered: usize,
}

/// Figure height in inches for `n` cards
pub fn figure_height_inches(n: usize) -> f64 {
    (0.9 * n as f64 + 1.0).max(4.0)
}

/// Top-down text layout. Stops after the card that pushes the cursor
/// below the bottom margin.
pub fn layout_cards(cards: &[WordCard]) -> CardLayout {
    let mut lines = Vec::new();
    let mut y = START_Y;
    let mut rendered = 0;

    let mut push = |y: f64, style: LineStyle, text: String| lines.push(CardLine { y, style, text });

    push(y, LineStyle::Title, TITLE.to_string());
    y -= STEP_TITLE;

    for card in cards {
        push(y, LineStyle::Header, format!("[{}] {}", card.language, card.word));
        y -= STEP_HEADER;
        push(y, LineStyle::Variants, card.ipas.join(VARIANT_SEPARATOR));
        y -= STEP_VARIANTS;

        for (ipa, meaning) in &card.meanings {
            push(y, LineStyle::Meaning, format!("{}: {}", ipa, meaning));
            y -= STEP_MEANING;
        }
        y -= STEP_GAP;
        rendered += 1;

        if y < STOP_Y {
            break;
        }
    }

    CardLayout { lines, rendered }
}

/// Text-only figure listing the top `max_words` words with their IPA variants and meanings.
pub fn plot_word_cards(
    data: &Dataset,
    out_dir: &Path,
    theme: &ChartTheme,
    max_words: usize,
) -> Result<PathBuf> {
    let cards = word_cards(data, max_words);
    let layout = layout_cards(&cards);
    if layout.rendered < cards.len() {
        warn!(
            "Word cards truncated: {} of {} words fit",
            layout.rendered,
            cards.len()
        );
    }

    let mut renderer = Renderer::new(
        theme.inches(FIG_W_INCHES),
        theme.inches(figure_height_inches(cards.len())),
        theme,
    )?;
    let (w, h) = (renderer.width as f64, renderer.height as f64);
    let color = Rgb(theme.text);

    for line in &layout.lines {
        let x = line.style.indent() * w;
        let y = (1.0 - line.y) * h;
        let size = theme.pt(line.style.points());
        if line.style.bold() {
            renderer.draw_text_bold(x, y, &line.text, size, color);
        } else {
            renderer.draw_text(x, y, &line.text, size, color);
        }
    }

    let out = ChartKind::WordCards.output_path(out_dir);
    renderer.save(&out)?;
    info!("Wrote {}", out.display());
    Ok(out)
}
