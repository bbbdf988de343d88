use crate::{
    charts::{plot_ipa_length, plot_variant_counts, plot_word_cards},
    config::Config,
    csv_reader::load_data,
    error::{HeteronymError, Result},
};

use log::info;
use std::path::PathBuf;

/// Loads the data once and renders every chart in order.
/// The first failure aborts the run; charts already written stay on disk.
pub fn run(config: &Config) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&config.out_dir).map_err(|e| HeteronymError::CreateDir {
        path: config.out_dir.clone(),
        source: e,
    })?;

    let data = load_data(&config.data_dir)?;
    let theme = &config.theme;

    let outputs = vec![
        plot_variant_counts(&data, &config.out_dir, theme)?,
        plot_ipa_length(&data, &config.out_dir, theme)?,
        plot_word_cards(&data, &config.out_dir, theme, config.max_words)?,
    ];
    info!("Rendered {} charts into {}", outputs.len(), config.out_dir.display());
    Ok(outputs)
}

/// Console summary printed after a successful run
pub fn format_summary(outputs: &[PathBuf]) -> String {
    let mut lines = vec!["Wrote:".to_string()];
    lines.extend(outputs.iter().map(|p| format!("- {}", p.display())));
    lines.join("\n")
}
