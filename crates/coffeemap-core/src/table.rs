// crates/coffeemap-core/src/table.rs

//! # Reshape / Aggregate
//!
//! Wide statistical tables (one column per year) are read from CSV, melted
//! into long `(country, coffee type, year, value)` records and summed per
//! country for a year/type selection. The result feeds the matcher with the
//! set of country names that need a region.

use crate::error::{ColumnKind, CoffeeMapError, Result};
use crate::text::equals_folded;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Header names recognised as the country column, checked in this order.
pub const COUNTRY_CANDIDATES: [&str; 7] = [
    "Country",
    "country",
    "Country or Area",
    "Country or area",
    "Country/Area",
    "country/area",
    "Country name",
];

/// Header of the coffee type column, and the variant some files use.
pub const COFFEE_TYPE_HEADER: &str = "Coffee type";
const COFFEE_TYPE_HEADER_ALT: &str = "Coffee Type";

/// Types listed first, in this order, when present.
pub const PREFERRED_COFFEE_TYPES: [&str; 3] = ["Arabica", "Robusta", "Robusta/Arabica"];

/// Returned by [`year_label_to_int`] for labels without a leading year.
pub const UNKNOWN_YEAR: u32 = 9999;

const HEURISTIC_SAMPLE: usize = 20;
const HEURISTIC_ALPHA_RATIO: f64 = 0.6;

static YEAR_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d{4}(\s*[-/]\s*\d{2,4})?\s*$").expect("year label pattern is valid")
});

static LEADING_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{4})").expect("leading year pattern is valid"));

/// A wide table as read from CSV. Cells are trimmed; blanks are `None`.
#[derive(Clone, Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Read a CSV with a header row. Ragged rows are padded or cut to the
    /// header width.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|cell| {
                    let cell = cell.trim();
                    (!cell.is_empty()).then(|| cell.to_owned())
                })
                .collect();
            rows.push(row);
        }

        Ok(Self::new(headers, rows))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            CoffeeMapError::NotFound(format!("Table not found at {}: {}", path.display(), e))
        })?;
        let table = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            columns = table.headers.len(),
            rows = table.rows.len(),
            "loaded table"
        );
        Ok(table)
    }

    /// Cells of column `idx`, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = Option<&str>> {
        self.rows
            .iter()
            .map(move |row| row.get(idx).and_then(|c| c.as_deref()))
    }

    fn position(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Index of the coffee type column, accepting the `Coffee Type` spelling.
    pub fn coffee_type_column(&self) -> Option<usize> {
        self.position(COFFEE_TYPE_HEADER)
            .or_else(|| self.position(COFFEE_TYPE_HEADER_ALT))
    }

    /// Wide to long: one record per (row, year column).
    ///
    /// Fails with [`CoffeeMapError::MissingColumn`] when no country column or
    /// no year column can be found. Rows without a country are dropped; cells
    /// that are not numbers become `None`.
    pub fn melt(&self) -> Result<LongTable> {
        let country_col =
            detect_country_column(self).ok_or(CoffeeMapError::MissingColumn(ColumnKind::Country))?;
        let year_cols = detect_year_columns(&self.headers);
        if year_cols.is_empty() {
            return Err(CoffeeMapError::MissingColumn(ColumnKind::Year));
        }
        let type_col = self.coffee_type_column();
        debug!(
            country = %self.headers[country_col],
            years = year_cols.len(),
            coffee_type = type_col.is_some(),
            "melting table"
        );

        let mut records = Vec::with_capacity(self.rows.len() * year_cols.len());
        for row in &self.rows {
            let Some(country) = row[country_col].as_deref() else {
                continue;
            };
            let coffee_type = type_col
                .and_then(|idx| row[idx].as_deref())
                .map(canonical_coffee_type);

            for &idx in &year_cols {
                let year_label = &self.headers[idx];
                records.push(LongRecord {
                    country: country.to_owned(),
                    coffee_type: coffee_type.clone(),
                    year_label: year_label.clone(),
                    year: year_label_to_int(year_label),
                    value: parse_value(row[idx].as_deref()),
                });
            }
        }

        Ok(LongTable {
            records,
            has_coffee_type: type_col.is_some(),
        })
    }
}

/// Find the column holding country names.
///
/// Known headers win. Otherwise the first non-numeric column whose first
/// non-empty values are mostly alphabetic is taken.
pub fn detect_country_column(table: &Table) -> Option<usize> {
    if let Some(idx) = COUNTRY_CANDIDATES
        .iter()
        .find_map(|candidate| table.position(candidate))
    {
        return Some(idx);
    }

    (0..table.headers.len()).find(|&idx| looks_like_names(table, idx))
}

fn looks_like_names(table: &Table, idx: usize) -> bool {
    let values: Vec<&str> = table.column(idx).flatten().collect();
    // Empty or fully numeric columns are not text columns.
    if values.iter().all(|v| parse_value(Some(v)).is_some()) {
        return false;
    }
    let sample = &values[..values.len().min(HEURISTIC_SAMPLE)];
    let alphabetic = sample
        .iter()
        .filter(|v| v.chars().any(|c| c.is_ascii_alphabetic()))
        .count();
    alphabetic as f64 / sample.len().max(1) as f64 > HEURISTIC_ALPHA_RATIO
}

/// Header positions that look like years: `1990`, `1990/91`, `1990-91`.
pub fn detect_year_columns(headers: &[String]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, h)| YEAR_LABEL.is_match(h.trim()))
        .map(|(idx, _)| idx)
        .collect()
}

/// Leading year of a label for ordering: `"1990/91"` -> `1990`.
///
/// Labels without four leading digits sort last as [`UNKNOWN_YEAR`].
pub fn year_label_to_int(label: &str) -> u32 {
    LEADING_YEAR
        .captures(label)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(UNKNOWN_YEAR)
}

/// Numeric coercion: blanks, text and `NaN` become missing.
pub fn parse_value(cell: Option<&str>) -> Option<f64> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| !v.is_nan())
}

/// Trim a coffee type and fold the mixed-type spellings into one label.
pub fn canonical_coffee_type(raw: &str) -> String {
    match raw.trim() {
        "Arabica/Robusta" | "Arabica / Robusta" | "Robusta / Arabica" => {
            "Robusta/Arabica".to_owned()
        }
        other => other.to_owned(),
    }
}

/// One melted cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LongRecord {
    pub country: String,
    pub coffee_type: Option<String>,
    pub year_label: String,
    pub year: u32,
    pub value: Option<f64>,
}

/// Coffee type selector.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub enum TypeFilter {
    #[default]
    All,
    Only(String),
}

impl TypeFilter {
    /// `"all"` (any case) or an empty label selects everything.
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case("all") {
            TypeFilter::All
        } else {
            TypeFilter::Only(label.to_owned())
        }
    }

    fn accepts(&self, coffee_type: Option<&str>) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => equals_folded(coffee_type.unwrap_or(""), wanted),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("All"),
            TypeFilter::Only(label) => f.write_str(label),
        }
    }
}

/// Year and coffee type picked by the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub year_label: String,
    pub coffee_type: TypeFilter,
}

impl Selection {
    pub fn new(year_label: impl Into<String>, coffee_type: TypeFilter) -> Self {
        Self {
            year_label: year_label.into(),
            coffee_type,
        }
    }
}

/// Aggregated value of one country for a selection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CountryValue {
    pub country: String,
    pub value: f64,
}

/// Long-form records of one dataset.
#[derive(Clone, Debug, Default)]
pub struct LongTable {
    records: Vec<LongRecord>,
    has_coffee_type: bool,
}

impl LongTable {
    pub fn records(&self) -> &[LongRecord] {
        &self.records
    }

    pub fn has_coffee_type(&self) -> bool {
        self.has_coffee_type
    }

    /// Distinct year labels ordered by their leading year.
    pub fn years(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut labels: Vec<(u32, &str)> = self
            .records
            .iter()
            .filter(|r| seen.insert(r.year_label.as_str()))
            .map(|r| (r.year, r.year_label.as_str()))
            .collect();
        labels.sort_by_key(|(year, _)| *year);
        labels.into_iter().map(|(_, label)| label.to_owned()).collect()
    }

    pub fn latest_year(&self) -> Option<String> {
        self.years().pop()
    }

    /// Type selectors: `All`, the preferred types present, then the rest sorted.
    pub fn coffee_types(&self) -> Vec<TypeFilter> {
        let mut out = vec![TypeFilter::All];
        if !self.has_coffee_type {
            return out;
        }
        let present: BTreeSet<&str> = self
            .records
            .iter()
            .filter_map(|r| r.coffee_type.as_deref())
            .collect();

        for preferred in PREFERRED_COFFEE_TYPES {
            if present.contains(preferred) {
                out.push(TypeFilter::Only(preferred.to_owned()));
            }
        }
        for label in present {
            if !PREFERRED_COFFEE_TYPES.contains(&label) {
                out.push(TypeFilter::Only(label.to_owned()));
            }
        }
        out
    }

    /// Whether `filter` names a coffee type present in the data. Tables
    /// without a coffee type column ignore the filter and accept any.
    pub fn offers(&self, filter: &TypeFilter) -> bool {
        matches!(filter, TypeFilter::All)
            || !self.has_coffee_type
            || self
                .records
                .iter()
                .any(|r| filter.accepts(r.coffee_type.as_deref()))
    }

    /// Sum values per country for `selection`, sorted by country.
    ///
    /// Missing values are skipped; a country whose selected values are all
    /// missing still appears, with `0.0`. The type filter is ignored for
    /// datasets without a coffee type column.
    pub fn aggregate(&self, selection: &Selection) -> Vec<CountryValue> {
        let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
        for record in &self.records {
            if record.year_label != selection.year_label {
                continue;
            }
            if self.has_coffee_type && !selection.coffee_type.accepts(record.coffee_type.as_deref())
            {
                continue;
            }
            let sum = sums.entry(record.country.as_str()).or_insert(0.0);
            if let Some(value) = record.value {
                *sum += value;
            }
        }
        sums.into_iter()
            .map(|(country, value)| CountryValue {
                country: country.to_owned(),
                value,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|c| (!c.is_empty()).then(|| c.to_string()))
                        .collect()
                })
                .collect(),
        )
    }

    #[test]
    fn year_headers() {
        let headers: Vec<String> = ["Country", "1990", "1990/91", " 1991-92 ", "1992 / 1993", "Total", "19901", "90/91"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(detect_year_columns(&headers), [1, 2, 3, 4]);
    }

    #[test]
    fn year_labels_to_ints() {
        assert_eq!(year_label_to_int("1990/91"), 1990);
        assert_eq!(year_label_to_int(" 2004-05"), 2004);
        assert_eq!(year_label_to_int("2019"), 2019);
        assert_eq!(year_label_to_int("Total"), UNKNOWN_YEAR);
    }

    #[test]
    fn value_coercion() {
        assert_eq!(parse_value(Some(" 12.5 ")), Some(12.5));
        assert_eq!(parse_value(Some("1e3")), Some(1000.0));
        assert_eq!(parse_value(Some("n/a")), None);
        assert_eq!(parse_value(Some("1,234")), None);
        assert_eq!(parse_value(Some("NaN")), None);
        assert_eq!(parse_value(None), None);
    }

    #[test]
    fn candidate_header_wins() {
        let t = table(&["Region", "Country or Area", "1990"], &[&["Americas", "Peru", "1"]]);
        assert_eq!(detect_country_column(&t), Some(1));
    }

    #[test]
    fn heuristic_picks_first_alphabetic_text_column() {
        let t = table(
            &["id", "code", "Nation", "1990"],
            &[
                &["1", "X1", "Peru", "10"],
                &["2", "12", "Brazil", "20"],
                &["3", "13", "Kenya", ""],
            ],
        );
        // "code" is text but only 1 of 3 values has a letter.
        assert_eq!(detect_country_column(&t), Some(2));
    }

    #[test]
    fn heuristic_finds_nothing_in_numeric_tables() {
        let t = table(&["a", "1990"], &[&["1", "2"], &["3", ""]]);
        assert_eq!(detect_country_column(&t), None);
    }

    #[test]
    fn coffee_type_spellings_are_unified() {
        assert_eq!(canonical_coffee_type(" Arabica / Robusta "), "Robusta/Arabica");
        assert_eq!(canonical_coffee_type("Robusta / Arabica"), "Robusta/Arabica");
        assert_eq!(canonical_coffee_type("Arabica"), "Arabica");
    }

    #[test]
    fn type_filter_parsing() {
        assert_eq!(TypeFilter::parse("ALL"), TypeFilter::All);
        assert_eq!(TypeFilter::parse(" "), TypeFilter::All);
        assert_eq!(TypeFilter::parse(" Robusta "), TypeFilter::Only("Robusta".into()));
        assert!(TypeFilter::Only("robusta".into()).accepts(Some("Robusta")));
        assert!(!TypeFilter::Only("robusta".into()).accepts(None));
    }

    #[test]
    fn missing_columns_are_terminal() {
        let no_years = table(&["Country", "Total"], &[&["Peru", "1"]]);
        assert!(matches!(
            no_years.melt(),
            Err(CoffeeMapError::MissingColumn(ColumnKind::Year))
        ));

        let no_country = table(&["1990", "1991"], &[&["1", "2"]]);
        assert!(matches!(
            no_country.melt(),
            Err(CoffeeMapError::MissingColumn(ColumnKind::Country))
        ));
    }

    #[test]
    fn ragged_rows_are_padded() {
        let t = Table::new(
            vec!["Country".into(), "1990".into(), "1991".into()],
            vec![vec![Some("Peru".into())]],
        );
        let long = t.melt().unwrap();
        assert_eq!(long.records().len(), 2);
        assert!(long.records().iter().all(|r| r.value.is_none()));
    }
}
