/// One row of heteronym pronunciation data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PronunciationRecord {
    pub language: String,
    pub word: String,
    /// Sense identifier; integer-looking ids compare by value
    pub sense_id: String,
    pub meaning: String,
    pub ipa: String,
    /// File name the row was read from
    pub source_file: String,
}

impl PronunciationRecord {
    /// Trims `language`, `word`, `sense_id` and `ipa`. Idempotent.
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.language);
        trim_in_place(&mut self.word);
        trim_in_place(&mut self.sense_id);
        trim_in_place(&mut self.ipa);
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn has_ipa(&self) -> bool {
        !self.ipa.is_empty()
    }

    pub fn has_sense(&self) -> bool {
        !self.sense_id.is_empty()
    }

    /// Key for distinct-sense counting: `1`, `01` and `+1` are the same sense
    pub fn sense_key(&self) -> SenseKey<'_> {
        match self.sense_id.parse::<i64>() {
            Ok(n) => SenseKey::Number(n),
            Err(_) => SenseKey::Text(&self.sense_id),
        }
    }

    pub fn has_meaning(&self) -> bool {
        !self.meaning.is_empty()
    }

    /// IPA length in Unicode scalar values
    pub fn ipa_len(&self) -> usize {
        self.ipa.chars().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SenseKey<'a> {
    Number(i64),
    Text(&'a str),
}

fn trim_in_place(s: &mut String) {
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        *s = trimmed.to_string();
    }
}

/// Normalized, read-only table of all loaded records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<PronunciationRecord>,
}

impl Dataset {
    /// Builds a dataset, normalizing every record once
    pub fn new(records: Vec<PronunciationRecord>) -> Self {
        let records = records
            .into_iter()
            .map(PronunciationRecord::normalized)
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[PronunciationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct source file names in load order
    pub fn source_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = Vec::new();
        for rec in &self.records {
            if files.last() != Some(&rec.source_file.as_str()) {
                files.push(&rec.source_file);
            }
        }
        files
    }

    /// Records read from the given file
    pub fn rows_from<'a>(
        &'a self,
        source_file: &'a str,
    ) -> impl Iterator<Item = &'a PronunciationRecord> + 'a {
        self.records
            .iter()
            .filter(move |rec| rec.source_file == source_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded() -> PronunciationRecord {
        PronunciationRecord {
            language: "  en ".to_string(),
            word: "\tread\n".to_string(),
            sense_id: " 1 ".to_string(),
            meaning: " past tense ".to_string(),
            ipa: " rɛd  ".to_string(),
            source_file: "heteronyms_en.csv".to_string(),
        }
    }

    #[test]
    fn test_normalize_trims_key_fields_only() {
        let rec = padded().normalized();
        assert_eq!(rec.language, "en");
        assert_eq!(rec.word, "read");
        assert_eq!(rec.ipa, "rɛd");
        assert_eq!(rec.sense_id, "1");
        // meaning keeps its raw text
        assert_eq!(rec.meaning, " past tense ");
    }

    #[test]
    fn test_sense_key_compares_integers_by_value() {
        let with_sense = |id: &str| {
            PronunciationRecord {
                sense_id: id.to_string(),
                ..Default::default()
            }
            .normalized()
        };
        let (a, b, c) = (with_sense("1"), with_sense(" 1"), with_sense("01"));
        assert_eq!(a.sense_key(), SenseKey::Number(1));
        assert_eq!(b.sense_key(), a.sense_key());
        assert_eq!(c.sense_key(), a.sense_key());

        let text = with_sense("1a");
        assert_eq!(text.sense_key(), SenseKey::Text("1a"));
        assert_ne!(with_sense("2").sense_key(), a.sense_key());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = padded().normalized();
        let twice = once.clone().normalized();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_ipa_len_counts_chars() {
        let rec = PronunciationRecord {
            ipa: "banˈɑːn".to_string(),
            ..Default::default()
        };
        assert_eq!(rec.ipa_len(), 7);
        assert!(rec.ipa.len() > 7);
    }

    #[test]
    fn test_dataset_source_files_and_rows() {
        let mk = |file: &str, word: &str| PronunciationRecord {
            word: word.to_string(),
            source_file: file.to_string(),
            ..Default::default()
        };
        let data = Dataset::new(vec![
            mk("heteronyms_a.csv", "x"),
            mk("heteronyms_a.csv", "y"),
            mk("heteronyms_b.csv", "z"),
        ]);

        assert_eq!(data.len(), 3);
        assert_eq!(data.source_files(), vec!["heteronyms_a.csv", "heteronyms_b.csv"]);
        assert_eq!(data.rows_from("heteronyms_a.csv").count(), 2);
        assert_eq!(data.rows_from("heteronyms_c.csv").count(), 0);
    }
}
