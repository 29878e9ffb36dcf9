use std::collections::BTreeMap;
use std::io::Read;

/// One parsed shortlist row: column name → cell value. Column names are
/// lowercased and trimmed at parse time so header casing in the uploaded
/// file never matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortlistRow {
    fields: BTreeMap<String, String>,
}

impl ShortlistRow {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut row = Self::default();
        for (column, value) in pairs {
            row.set(column, value);
        }
        row
    }

    pub fn set(&mut self, column: &str, value: &str) {
        self.fields
            .insert(normalize_column(column), value.trim().to_string());
    }

    /// The cell under `column`, if present and non-empty.
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields
            .get(&normalize_column(column))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn email(&self) -> Option<&str> {
        self.field("email")
    }

    pub fn usn(&self) -> Option<&str> {
        self.field("usn")
    }
}

/// A fully parsed shortlist upload: the normalized header row plus every
/// data row. Headers are kept separately so structural validation works
/// even for a file with no data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortlistTable {
    pub columns: Vec<String>,
    pub rows: Vec<ShortlistRow>,
}

impl ShortlistTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(normalize_column)
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let mut row = ShortlistRow::default();
            for (column, value) in columns.iter().zip(record.iter()) {
                row.fields
                    .insert(column.clone(), value.trim().to_string());
            }
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Whether the file carries at least one of the student identifier
    /// columns.
    pub fn has_identifier_column(&self) -> bool {
        self.columns
            .iter()
            .any(|column| column == "email" || column == "usn")
    }
}

fn normalize_column(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}
