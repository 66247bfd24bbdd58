//! Ledger and catalog files.
//!
//! A ledger is either a JSON array of entries or a CSV file with the header
//! `id,date,type,amount,amount_converted,category,cost_center,description`.
//! CSV dates are RFC 3339 timestamps or plain `YYYY-MM-DD` days (read as
//! midnight UTC). The catalog is a JSON document with `categories`,
//! `cost_centers` and `creators` maps.
use std::{fs::File, io::BufReader, path::Path};

use chrono::{DateTime, NaiveDate, Utc};
use engine::{CategoryRef, LedgerEntry, MemoryCatalog, MemoryLedger};
use serde::Deserialize;

use crate::error::{CliError, Result};

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    date: String,
    #[serde(rename = "type")]
    raw_type: String,
    amount: String,
    amount_converted: Option<String>,
    category: Option<String>,
    cost_center: Option<String>,
    description: Option<String>,
}

impl CsvRow {
    fn into_entry(self, row: usize) -> Result<LedgerEntry> {
        let date = parse_date(&self.date).ok_or_else(|| CliError::InvalidRow {
            row,
            reason: format!("invalid date {:?}", self.date),
        })?;
        Ok(LedgerEntry {
            id: self.id,
            date,
            raw_type: self.raw_type,
            amount: self.amount,
            amount_converted: self.amount_converted,
            category: self
                .category
                .filter(|id| !id.trim().is_empty())
                .map(CategoryRef::Id),
            cost_center: self.cost_center,
            description: self.description,
        })
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|time| time.and_utc())
}

/// Load a ledger, picking the format from the file extension.
pub fn load_ledger(path: &Path) -> Result<MemoryLedger> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let entries = match extension.as_str() {
        "csv" => read_csv(File::open(path)?)?,
        "json" => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        other => return Err(CliError::UnsupportedFormat(other.to_string())),
    };
    let ledger = MemoryLedger::new(entries);
    tracing::info!(path = %path.display(), entries = ledger.len(), "ledger loaded");
    Ok(ledger)
}

fn read_csv<R: std::io::Read>(reader: R) -> Result<Vec<LedgerEntry>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(index, row)| row?.into_entry(index + 1))
        .collect()
}

/// Load the catalog, or an empty one when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<MemoryCatalog> {
    let Some(path) = path else {
        return Ok(MemoryCatalog::default());
    };
    let catalog: MemoryCatalog = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    tracing::info!(
        path = %path.display(),
        categories = catalog.categories.len(),
        cost_centers = catalog.cost_centers.len(),
        creators = catalog.creators.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::TimeZone;
    use engine::{Catalog, CreatorDirectory, LedgerQuery, LedgerSource};

    use super::*;

    fn write_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_csv_ledger() {
        let file = write_file(
            ".csv",
            "id,date,type,amount,amount_converted,category,cost_center,description\n\
             a,2024-01-10,Ingreso,100.50,,royalties,BOOK-1,first sale\n\
             b,2024-01-11T09:30:00+02:00,gasto,40,,,,\n",
        );

        let ledger = load_ledger(file.path()).unwrap();
        let entries = ledger.entries(&LedgerQuery::default()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
        assert_eq!(entries[0].category, Some(CategoryRef::Id("royalties".to_string())));
        assert_eq!(entries[0].amount_converted, None);
        assert_eq!(entries[1].date, Utc.with_ymd_and_hms(2024, 1, 11, 7, 30, 0).unwrap());
        assert_eq!(entries[1].category, None);
        assert_eq!(entries[1].cost_center, None);
    }

    #[test]
    fn rejects_bad_csv_date() {
        let file = write_file(
            ".csv",
            "id,date,type,amount,amount_converted,category,cost_center,description\n\
             a,yesterday,income,1,,,,\n",
        );
        assert!(matches!(
            load_ledger(file.path()),
            Err(CliError::InvalidRow { row: 1, .. })
        ));
    }

    #[test]
    fn reads_json_ledger() {
        let file = write_file(
            ".json",
            r#"[
                {"id": "a", "date": "2024-01-10T10:00:00Z", "type": "income", "amount": "10",
                 "category": {"id": "c1", "name": "Royalties", "color": "plum"}},
                {"id": "b", "date": "2024-01-12T10:00:00Z", "type": "expense", "amount": "5",
                 "amount_converted": "4.50", "cost_center": "undefined"}
            ]"#,
        );

        let ledger = load_ledger(file.path()).unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_file(".xml", "<ledger/>");
        assert!(matches!(
            load_ledger(file.path()),
            Err(CliError::UnsupportedFormat(ext)) if ext == "xml"
        ));
    }

    #[test]
    fn reads_catalog() {
        let file = write_file(
            ".json",
            r##"{
                "categories": {"royalties": {"name": "Royalties", "color": "#0f0"}},
                "cost_centers": {"BOOK-1": {"name": "First novel"}},
                "creators": {"author-1": ["BOOK-1"]}
            }"##,
        );

        let catalog = load_catalog(Some(file.path())).unwrap();
        assert_eq!(catalog.category("royalties").unwrap().name, "Royalties");
        assert_eq!(catalog.cost_center("BOOK-1").unwrap().color, None);
        assert_eq!(catalog.cost_centers("author-1").unwrap(), vec!["BOOK-1"]);
        assert_eq!(load_catalog(None).unwrap(), MemoryCatalog::default());
    }
}
