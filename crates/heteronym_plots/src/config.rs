use crate::{
    constants::{DEFAULT_DATA_DIR, DEFAULT_MAX_WORDS, DEFAULT_OUT_DIR, ENV_MAX_WORDS, ENV_THEME_FILE, MAX_PX_PER_INCH, PX_PER_INCH},
    error::{HeteronymError, Result},
};
use image::Rgb;
use serde::Deserialize;
use std::{
    env,
    path::{Path, PathBuf},
};

/// Visual style shared by all charts
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartTheme {
    pub background: [u8; 3],
    pub panel: [u8; 3],
    pub text: [u8; 3],
    pub grid: [u8; 3],
    pub grid_alpha: f32,
    pub bar: [u8; 3],
    pub box_line: [u8; 3],
    /// Per-language colours, cycled
    pub palette: Vec<[u8; 3]>,
    pub point_alpha: f32,
    /// Font family names, first available wins
    pub fonts: Vec<String>,
    /// Base font size in points
    pub font_size: f64,
    pub px_per_inch: f64,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background: [255, 255, 255],
            panel: [255, 255, 255],
            text: [38, 38, 38],
            grid: [176, 176, 176],
            grid_alpha: 0.25,
            bar: [76, 114, 176],
            box_line: [60, 60, 60],
            // seaborn "deep"
            palette: vec![
                [76, 114, 176],
                [221, 132, 82],
                [85, 168, 104],
                [196, 78, 82],
                [129, 114, 179],
                [147, 120, 96],
                [218, 139, 195],
                [140, 140, 140],
                [204, 185, 116],
                [100, 181, 205],
            ],
            point_alpha: 0.8,
            fonts: vec![
                "DejaVu Sans".to_string(),
                "Noto Sans".to_string(),
                "Arial".to_string(),
                "Helvetica".to_string(),
            ],
            font_size: 10.0,
            px_per_inch: PX_PER_INCH,
        }
    }
}

impl ChartTheme {
    /// Reads a TOML theme; omitted keys keep their defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| HeteronymError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let theme: ChartTheme = toml::from_str(&content)?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn validate(&self) -> Result<()> {
        if self.palette.is_empty() {
            return Err(HeteronymError::Config("palette must not be empty".to_string()));
        }
        if !(self.font_size > 0.0) || !(self.px_per_inch > 0.0) {
            return Err(HeteronymError::Config(format!(
                "font_size and px_per_inch must be positive, got {} and {}",
                self.font_size, self.px_per_inch
            )));
        }
        if self.px_per_inch > MAX_PX_PER_INCH {
            return Err(HeteronymError::Config(format!(
                "px_per_inch must be at most {MAX_PX_PER_INCH}, got {}",
                self.px_per_inch
            )));
        }
        for (name, alpha) in [("grid_alpha", self.grid_alpha), ("point_alpha", self.point_alpha)] {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(HeteronymError::Config(format!(
                    "{name} must be between 0 and 1, got {alpha}"
                )));
            }
        }
        Ok(())
    }

    /// Colour for the i-th category
    pub fn category_color(&self, i: usize) -> Rgb<u8> {
        Rgb(self.palette[i % self.palette.len()])
    }

    /// Points to pixels at the theme's resolution
    pub fn pt(&self, points: f64) -> f64 {
        points * self.px_per_inch / 72.0
    }

    /// Inches to pixels
    pub fn inches(&self, inches: f64) -> u32 {
        (inches * self.px_per_inch).round() as u32
    }
}

/// Run settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    /// Word card limit
    pub max_words: usize,
    pub theme: ChartTheme,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR, DEFAULT_OUT_DIR)
    }
}

impl Config {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(data_dir: P, out_dir: Q) -> Self {
        Self {
            data_dir: data_dir.into(),
            out_dir: out_dir.into(),
            max_words: DEFAULT_MAX_WORDS,
            theme: ChartTheme::default(),
        }
    }

    /// Builds a config, applying `HETERONYM_PLOTS_THEME` and
    /// `HETERONYM_PLOTS_MAX_WORDS` when set
    pub fn from_env<P: Into<PathBuf>, Q: Into<PathBuf>>(data_dir: P, out_dir: Q) -> Result<Self> {
        let config = Self::new(data_dir, out_dir)
            .with_overrides(env::var(ENV_THEME_FILE).ok(), env::var(ENV_MAX_WORDS).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies raw override values; blank values are ignored
    pub fn with_overrides(mut self, theme_file: Option<String>, max_words: Option<String>) -> Result<Self> {
        if let Some(path) = theme_file
            && !path.trim().is_empty()
        {
            self.theme = ChartTheme::load_from_file(path.trim())?;
        }

        if let Some(raw) = max_words
            && !raw.trim().is_empty()
        {
            self.max_words = raw.trim().parse().map_err(|_| {
                HeteronymError::Config(format!("{ENV_MAX_WORDS} must be a positive integer, got '{raw}'"))
            })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.out_dir.exists() && !self.out_dir.is_dir() {
            return Err(HeteronymError::Config(format!(
                "Output path is not a directory: {}",
                self.out_dir.display()
            )));
        }
        if self.max_words == 0 {
            return Err(HeteronymError::Config("max_words must be at least 1".to_string()));
        }
        self.theme.validate()
    }
}
