use crate::constants::{
    COL_IPA, COL_LANGUAGE, COL_MEANING, COL_SENSE_ID, COL_WORD, INPUT_FILE_PREFIX,
    INPUT_FILE_SUFFIX, REQUIRED_COLUMNS,
};
use crate::error::{HeteronymError, Result};
use crate::record::{Dataset, PronunciationRecord};

use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};
use std::collections::{BTreeSet, HashMap};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

/// Returns true for file names of the form `heteronyms_*.csv`
pub fn is_input_file_name(name: &str) -> bool {
    name.len() >= INPUT_FILE_PREFIX.len() + INPUT_FILE_SUFFIX.len()
        && name.starts_with(INPUT_FILE_PREFIX)
        && name.ends_with(INPUT_FILE_SUFFIX)
}

/// Lists matching input files in `dir`, sorted by file name.
/// A missing directory yields an empty list.
pub fn discover_input_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(HeteronymError::ReadFile {
                path: dir.to_path_buf(),
                source: e,
            });
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_input_file_name);
        if matches {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// One parsed input file before concatenation
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub source_file: String,
    pub columns: Vec<String>,
    pub records: Vec<PronunciationRecord>,
}

/// Reads every `heteronyms_*.csv` in `data_dir` into one normalized dataset.
///
/// Rows keep file-name order, then in-file order. Fails with
/// [`HeteronymError::NoInput`] when nothing matches and with
/// [`HeteronymError::MissingColumns`] when a required column is absent
/// from every file.
pub fn load_data<P: AsRef<Path>>(data_dir: P) -> Result<Dataset> {
    let data_dir = data_dir.as_ref();
    let files = discover_input_files(data_dir)?;
    if files.is_empty() {
        return Err(HeteronymError::NoInput {
            dir: data_dir.to_path_buf(),
            pattern: format!("{}*{}", INPUT_FILE_PREFIX, INPUT_FILE_SUFFIX),
        });
    }

    let mut tables = Vec::with_capacity(files.len());
    for path in &files {
        let table = read_table_file(path)?;
        debug!(
            "Read {} rows from {}",
            table.records.len(),
            table.source_file
        );
        tables.push(table);
    }

    let dataset = concat_tables(data_dir, tables)?;
    info!(
        "Loaded {} records from {} CSV files in {}",
        dataset.len(),
        files.len(),
        data_dir.display()
    );
    Ok(dataset)
}

/// Reads one CSV file, tagging rows with its file name
pub fn read_table_file<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| HeteronymError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    let source_file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    read_table_from_reader(file, &source_file).map_err(|e| match e {
        HeteronymError::Csv(source) => HeteronymError::CsvFile {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Reads CSV with a header row. Columns are located by name; extra
/// columns are ignored and absent ones read as empty.
pub fn read_table_from_reader<R: Read>(reader: R, source_file: &str) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // short rows yield empty cells
        .from_reader(reader);

    let columns = header_names(rdr.headers()?);
    let index = ColumnIndex::new(&columns);

    let mut records = Vec::new();
    for result in rdr.records() {
        let rec = result?;
        records.push(index.record(&rec, source_file));
    }

    Ok(RawTable {
        source_file: source_file.to_string(),
        columns,
        records,
    })
}

fn header_names(headers: &StringRecord) -> Vec<String> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect()
}

/// Position of each required column within one file
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn new(columns: &[String]) -> Self {
        let positions = REQUIRED_COLUMNS
            .iter()
            .filter_map(|&name| columns.iter().position(|c| c == name).map(|i| (name, i)))
            .collect();
        Self { positions }
    }

    fn field(&self, rec: &StringRecord, name: &str) -> String {
        self.positions
            .get(name)
            .and_then(|&i| rec.get(i))
            .unwrap_or_default()
            .to_string()
    }

    fn record(&self, rec: &StringRecord, source_file: &str) -> PronunciationRecord {
        PronunciationRecord {
            language: self.field(rec, COL_LANGUAGE),
            word: self.field(rec, COL_WORD),
            sense_id: self.field(rec, COL_SENSE_ID),
            meaning: self.field(rec, COL_MEANING),
            ipa: self.field(rec, COL_IPA),
            source_file: source_file.to_string(),
        }
    }
}

/// Concatenates tables in order and checks the combined schema
pub fn concat_tables(data_dir: &Path, tables: Vec<RawTable>) -> Result<Dataset> {
    let present: BTreeSet<&str> = tables
        .iter()
        .flat_map(|t| t.columns.iter().map(String::as_str))
        .collect();
    let missing = missing_columns(&present);
    if !missing.is_empty() {
        return Err(HeteronymError::MissingColumns {
            dir: data_dir.to_path_buf(),
            missing,
        });
    }

    let records = tables.into_iter().flat_map(|t| t.records).collect();
    Ok(Dataset::new(records))
}

/// Required columns absent from `present`, in required order
pub fn missing_columns(present: &BTreeSet<&str>) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|c| !present.contains(*c))
        .map(|c| c.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_is_input_file_name() {
        assert!(is_input_file_name("heteronyms_en.csv"));
        assert!(is_input_file_name("heteronyms_.csv"));
        assert!(!is_input_file_name("heteronyms.csv"));
        assert!(!is_input_file_name("heteronyms_en.tsv"));
        assert!(!is_input_file_name("other_en.csv"));
    }

    #[test]
    fn test_load_data_counts_and_attribution() {
        let temp_dir = TempDir::new().unwrap();
        write(
            temp_dir.path(),
            "heteronyms_en.csv",
            "language,word,sense_id,meaning,ipa\n\
             en,read,1,present tense,riːd\n\
             en,read,2,past tense,rɛd\n",
        );
        write(
            temp_dir.path(),
            "heteronyms_sv.csv",
            "language,word,sense_id,meaning,ipa\nsv,banan,1,fruit,banˈɑːn\n",
        );
        write(temp_dir.path(), "notes.csv", "language,word\nxx,ignored\n");

        let data = load_data(temp_dir.path()).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.rows_from("heteronyms_en.csv").count(), 2);
        assert_eq!(data.rows_from("heteronyms_sv.csv").count(), 1);
        assert_eq!(data.records()[2].word, "banan");
        assert_eq!(data.records()[2].source_file, "heteronyms_sv.csv");
    }

    #[test]
    fn test_load_data_orders_by_file_name() {
        let temp_dir = TempDir::new().unwrap();
        let header = "language,word,sense_id,meaning,ipa\n";
        write(temp_dir.path(), "heteronyms_b.csv", &format!("{header}b,two,1,m,x\n"));
        write(temp_dir.path(), "heteronyms_a.csv", &format!("{header}a,one,1,m,x\na,uno,1,m,x\n"));

        let data = load_data(temp_dir.path()).unwrap();
        let words: Vec<&str> = data.records().iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["one", "uno", "two"]);
    }

    #[test]
    fn test_load_data_any_column_order_and_extra_columns() {
        let temp_dir = TempDir::new().unwrap();
        write(
            temp_dir.path(),
            "heteronyms_x.csv",
            "ipa,notes,meaning,word,language,sense_id\n  riːd ,n,present, read ,en ,1\n",
        );

        let data = load_data(temp_dir.path()).unwrap();
        let rec = &data.records()[0];
        assert_eq!(rec.language, "en");
        assert_eq!(rec.word, "read");
        assert_eq!(rec.ipa, "riːd");
        assert_eq!(rec.sense_id, "1");
        assert_eq!(rec.meaning, "present");
    }

    #[test]
    fn test_load_data_no_input() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "other.csv", "language\nen\n");

        let result = load_data(temp_dir.path());
        assert!(matches!(result, Err(HeteronymError::NoInput { .. })));
    }

    #[test]
    fn test_load_data_nonexistent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let result = load_data(&missing);
        assert!(matches!(result, Err(HeteronymError::NoInput { .. })));
    }

    #[test]
    fn test_load_data_missing_columns_named() {
        let temp_dir = TempDir::new().unwrap();
        write(
            temp_dir.path(),
            "heteronyms_en.csv",
            "language,word,meaning\nen,read,past\n",
        );

        match load_data(temp_dir.path()) {
            Err(HeteronymError::MissingColumns { missing, .. }) => {
                assert_eq!(missing, vec!["sense_id".to_string(), "ipa".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_columns_checked_on_combined_table() {
        let temp_dir = TempDir::new().unwrap();
        write(
            temp_dir.path(),
            "heteronyms_a.csv",
            "language,word,sense_id,meaning,ipa\nen,read,1,past,rɛd\n",
        );
        write(temp_dir.path(), "heteronyms_b.csv", "language,word,ipa\nsv,banan,banˈɑːn\n");

        let data = load_data(temp_dir.path()).unwrap();
        assert_eq!(data.len(), 2);
        let sv = &data.records()[1];
        assert_eq!(sv.sense_id, "");
        assert_eq!(sv.meaning, "");
    }

    #[test]
    fn test_read_table_keeps_delimiter_only_rows() {
        let input = "\u{feff}language,word,sense_id,meaning,ipa\nen,read,1\n\n,,,,\n";
        let table = read_table_from_reader(input.as_bytes(), "heteronyms_t.csv").unwrap();

        assert_eq!(table.columns[0], "language");
        // the empty line is skipped, the delimiter-only row is a record
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].sense_id, "1");
        assert_eq!(table.records[0].ipa, "");
        assert_eq!(table.records[1], PronunciationRecord {
            source_file: "heteronyms_t.csv".to_string(),
            ..Default::default()
        });
    }

    #[test]
    fn test_row_count_is_sum_of_file_rows() {
        let temp_dir = TempDir::new().unwrap();
        let header = "language,word,sense_id,meaning,ipa\n";
        write(temp_dir.path(), "heteronyms_a.csv", &format!("{header}en,read,1,a,riːd\n,,,,\n"));
        write(temp_dir.path(), "heteronyms_b.csv", &format!("{header}sv,banan,1,fruit,banˈɑːn\n"));

        let data = load_data(temp_dir.path()).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.rows_from("heteronyms_a.csv").count(), 2);
    }
}
