use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::record::CanonicalJobRecord;

pub const DEFAULT_CSV_PATH: &str = "job_postings.csv";

/// Header row, in file order.
pub const COLUMNS: [&str; 8] = [
    "Job Role",
    "Role Code",
    "Company",
    "Location",
    "Job Description",
    "Salary Estimate",
    "Education",
    "Years of Experience",
];

/// One flattened CSV line. Field order must follow [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Job Role")]
    pub role: String,
    #[serde(rename = "Role Code")]
    pub role_code: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Job Description")]
    pub description: String,
    #[serde(rename = "Salary Estimate")]
    pub salary_estimate: String,
    #[serde(rename = "Education")]
    pub education: String,
    #[serde(rename = "Years of Experience")]
    pub years_experience: String,
}

impl From<&CanonicalJobRecord> for ExportRow {
    fn from(r: &CanonicalJobRecord) -> Self {
        ExportRow {
            role: r.role.clone(),
            role_code: r.role_code.clone(),
            company: r.company.clone(),
            location: r.location.clone(),
            description: r.description.clone(),
            salary_estimate: r.additional_details.salary_estimate.to_string(),
            education: r.additional_details.education.clone(),
            years_experience: r.additional_details.years_experience.to_string(),
        }
    }
}

/// Write records as CSV with a header row. Writes nothing for an
/// empty batch. Returns whether a file was written.
pub fn export(records: &[CanonicalJobRecord], path: &Path) -> Result<bool> {
    if records.is_empty() {
        info!(path = ?path, "no job postings to save");
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    wtr.write_record(COLUMNS)
        .with_context(|| format!("Failed to write header to {:?}", path))?;
    for record in records {
        wtr.serialize(ExportRow::from(record))
            .with_context(|| format!("Failed to write row to {:?}", path))?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to flush {:?}", path))?;

    info!(path = ?path, rows = records.len(), "csv export written");
    Ok(true)
}

#[cfg(test)]
pub fn read_back(path: &Path) -> Result<Vec<ExportRow>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    anyhow::ensure!(headers == COLUMNS, "unexpected header {:?}", headers);
    let rows = rdr.deserialize().collect::<Result<Vec<ExportRow>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AdditionalDetails, FieldValue, NOT_FOUND};

    fn record(role: &str, description: &str, salary: FieldValue) -> CanonicalJobRecord {
        CanonicalJobRecord {
            role: role.into(),
            role_code: "3".into(),
            company: "Initech, Inc.".into(),
            location: "Austin".into(),
            description: description.into(),
            additional_details: AdditionalDetails {
                salary_estimate: salary,
                education: NOT_FOUND.into(),
                years_experience: FieldValue::Number(36.into()),
            },
        }
    }

    #[test]
    fn header_and_rows_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("job_postings.csv");
        let records = vec![
            record(
                "Business Analyst",
                "Line one\nline \"two\", with commas",
                FieldValue::Text("$90,000".into()),
            ),
            record("Analyst II", NOT_FOUND, FieldValue::NotFound),
        ];

        assert!(export(&records, &path).unwrap());

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with(
            "Job Role,Role Code,Company,Location,Job Description,Salary Estimate,Education,Years of Experience\n"
        ));

        let rows = read_back(&path).unwrap();
        assert_eq!(rows.len(), 2);
        for (row, rec) in rows.iter().zip(&records) {
            assert_eq!(row, &ExportRow::from(rec));
        }
        assert_eq!(rows[0].company, "Initech, Inc.");
        assert_eq!(rows[0].description, "Line one\nline \"two\", with commas");
        assert_eq!(rows[1].salary_estimate, NOT_FOUND);
        assert_eq!(rows[1].education, NOT_FOUND);
        assert_eq!(rows[1].years_experience, "36");
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job_postings.csv");
        assert!(!export(&[], &path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn header_uses_fixed_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.csv");
        export(&[record("A", "d", FieldValue::NotFound)], &path).unwrap();
        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = rdr.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, COLUMNS);
    }
}
