use crate::constants::WHISKER_IQR;
use crate::record::{Dataset, SenseKey};

use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Composite grouping key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct WordKey {
    pub language: String,
    pub word: String,
}

/// Distinct values seen for one (language, word) group
#[derive(Debug, Clone, Default)]
struct WordStats<'a> {
    ipas: BTreeSet<&'a str>,
    senses: BTreeSet<SenseKey<'a>>,
}

/// Per-group variant and sense counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub language: String,
    pub word: String,
    pub n_variants: usize,
    pub n_senses: usize,
}

/// Word card contents for one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCard {
    pub language: String,
    pub word: String,
    /// Sorted distinct non-empty IPA strings
    pub ipas: Vec<String>,
    /// Sorted distinct (ipa, meaning) pairs with both present
    pub meanings: Vec<(String, String)>,
}

/// Single pass over the records; missing ipa / sense ids are not counted
fn group_stats(data: &Dataset) -> BTreeMap<WordKey, WordStats<'_>> {
    let mut groups: BTreeMap<WordKey, WordStats<'_>> = BTreeMap::new();
    for rec in data.records() {
        let key = WordKey {
            language: rec.language.clone(),
            word: rec.word.clone(),
        };
        let stats = groups.entry(key).or_default();
        if rec.has_ipa() {
            stats.ipas.insert(&rec.ipa);
        }
        if rec.has_sense() {
            stats.senses.insert(rec.sense_key());
        }
    }
    groups
}

fn word_counts(data: &Dataset) -> Vec<WordCount> {
    group_stats(data)
        .into_iter()
        .map(|(key, stats)| WordCount {
            language: key.language,
            word: key.word,
            n_variants: stats.ipas.len(),
            n_senses: stats.senses.len(),
        })
        .collect()
}

/// language asc, variants desc, senses desc, word asc
pub fn variant_chart_order(a: &WordCount, b: &WordCount) -> Ordering {
    a.language
        .cmp(&b.language)
        .then_with(|| b.n_variants.cmp(&a.n_variants))
        .then_with(|| b.n_senses.cmp(&a.n_senses))
        .then_with(|| a.word.cmp(&b.word))
}

/// variants desc, language asc, word asc
pub fn word_card_order(a: &WordCount, b: &WordCount) -> Ordering {
    b.n_variants
        .cmp(&a.n_variants)
        .then_with(|| a.language.cmp(&b.language))
        .then_with(|| a.word.cmp(&b.word))
}

/// Every (language, word) group, sorted for the variant count chart
pub fn variant_counts(data: &Dataset) -> Vec<WordCount> {
    let mut counts = word_counts(data);
    counts.sort_by(variant_chart_order);
    counts
}

/// Splits sorted counts into per-language runs, keeping order
pub fn by_language(counts: &[WordCount]) -> Vec<(String, Vec<WordCount>)> {
    let chunks = counts.iter().chunk_by(|c| c.language.as_str());
    let facets = chunks
        .into_iter()
        .map(|(language, group)| (language.to_string(), group.cloned().collect()))
        .collect();
    facets
}

/// The `max_words` groups with the most variants
pub fn top_words(data: &Dataset, max_words: usize) -> Vec<WordCount> {
    let mut counts = word_counts(data);
    counts.sort_by(word_card_order);
    counts.truncate(max_words);
    counts
}

/// Card contents for the top `max_words` groups
pub fn word_cards(data: &Dataset, max_words: usize) -> Vec<WordCard> {
    top_words(data, max_words)
        .into_iter()
        .map(|wc| {
            let rows = data
                .records()
                .iter()
                .filter(|r| r.language == wc.language && r.word == wc.word);

            let ipas = rows
                .clone()
                .filter(|r| r.has_ipa())
                .map(|r| r.ipa.clone())
                .sorted()
                .dedup()
                .collect();
            let meanings = rows
                .filter(|r| r.has_ipa() && r.has_meaning())
                .map(|r| (r.ipa.clone(), r.meaning.clone()))
                .sorted()
                .dedup()
                .collect();

            WordCard {
                language: wc.language,
                word: wc.word,
                ipas,
                meanings,
            }
        })
        .collect()
}

/// IPA lengths per language; languages in order of first appearance
pub fn ipa_lengths(data: &Dataset) -> Vec<(String, Vec<usize>)> {
    let mut lengths: Vec<(String, Vec<usize>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for rec in data.records() {
        let slot = *index.entry(rec.language.as_str()).or_insert_with(|| {
            lengths.push((rec.language.clone(), Vec::new()));
            lengths.len() - 1
        });
        lengths[slot].1.push(rec.ipa_len());
    }
    lengths
}

/// Box-and-whisker summary
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Returns None for an empty sample
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let reach = WHISKER_IQR * (q3 - q1);
        let (lo_fence, hi_fence) = (q1 - reach, q3 + reach);

        let inside = sorted.iter().copied().filter(|v| *v >= lo_fence && *v <= hi_fence);
        let whisker_low = inside.clone().fold(f64::INFINITY, f64::min).min(q1);
        let whisker_high = inside.fold(f64::NEG_INFINITY, f64::max).max(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < lo_fence || *v > hi_fence)
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

/// Linear-interpolated quantile of sorted data
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
