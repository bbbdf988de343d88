/// Input file naming (`heteronyms_*.csv`)
pub const INPUT_FILE_PREFIX: &str = "heteronyms_";
pub const INPUT_FILE_SUFFIX: &str = ".csv";

/// Required CSV columns
pub const COL_LANGUAGE: &str = "language";
pub const COL_WORD: &str = "word";
pub const COL_SENSE_ID: &str = "sense_id";
pub const COL_MEANING: &str = "meaning";
pub const COL_IPA: &str = "ipa";
pub const REQUIRED_COLUMNS: [&str; 5] = [COL_LANGUAGE, COL_WORD, COL_SENSE_ID, COL_MEANING, COL_IPA];

/// CLI defaults
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OUT_DIR: &str = "figures";
pub const DEFAULT_MAX_WORDS: usize = 12;

/// Environment overrides
pub const ENV_THEME_FILE: &str = "HETERONYM_PLOTS_THEME";
pub const ENV_MAX_WORDS: &str = "HETERONYM_PLOTS_MAX_WORDS";

/// Box plot whisker reach (x IQR)
pub const WHISKER_IQR: f64 = 1.5;

/// Category slot fractions for the IPA length chart
pub const STRIP_JITTER: f64 = 0.25;
pub const BOX_WIDTH: f64 = 0.35;
pub const JITTER_SEED: u64 = 0x1f0a_2024;

/// Facet grid columns for the variant count chart
pub const FACET_COLUMNS: usize = 2;

/// Pixels per "inch" of figure size (matplotlib savefig dpi=200 equivalent)
pub const PX_PER_INCH: f64 = 200.0;
/// Upper bound for a theme's `px_per_inch`
pub const MAX_PX_PER_INCH: f64 = 1200.0;

/// Largest canvas edge in pixels
pub const MAX_CANVAS_PX: u32 = 16_384;
