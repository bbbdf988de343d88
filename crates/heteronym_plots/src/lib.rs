pub mod aggregate;
pub mod charts;
pub mod config;
pub mod constants;
pub mod csv_reader;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod render;

pub use aggregate::{WordCard, WordCount, top_words, variant_counts, word_cards};
pub use charts::{ChartKind, plot_ipa_length, plot_variant_counts, plot_word_cards};
pub use config::{ChartTheme, Config};
pub use csv_reader::load_data;
pub use error::{HeteronymError, Result};
pub use pipeline::run;
pub use record::{Dataset, PronunciationRecord};
