//! File exports for the admin survey listing. Both formats serialize the
//! currently loaded (possibly filtered) rows, never the full remote table.

use rust_xlsxwriter::Workbook;

use crate::{error::AppError, models::SurveyResponse};

/// The eleven survey columns, in form order.
pub const CSV_HEADERS: [&str; 11] = [
    "Name",
    "Phone",
    "Find Work?",
    "Work Frequency",
    "Satisfied?",
    "Problems",
    "Needs",
    "Payment",
    "Smartphone",
    "Apps Comfortable",
    "Pay Fee",
];

/// Literal placeholder for null fields in exports.
pub const MISSING: &str = "—";

pub const CSV_FILENAME: &str = "survey_data.csv";
pub const XLSX_FILENAME: &str = "survey_data.xlsx";
pub const SHEET_NAME: &str = "Surveys";

fn cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| MISSING.to_string())
}

fn multi_cell(values: &Option<Vec<String>>) -> String {
    match values {
        Some(set) => set.join(", "),
        None => MISSING.to_string(),
    }
}

fn grid_row(row: &SurveyResponse) -> [String; 11] {
    [
        cell(&row.full_name),
        cell(&row.phone),
        cell(&row.q3),
        cell(&row.q4),
        cell(&row.q5),
        multi_cell(&row.q6),
        multi_cell(&row.q7),
        cell(&row.q8),
        cell(&row.q9),
        cell(&row.q10),
        cell(&row.q11),
    ]
}

/// One header row plus one line per loaded row; multi-valued answers are
/// flattened into a single cell joined with ", ".
pub fn to_csv(rows: &[SurveyResponse]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADERS)
        .map_err(AppError::internal)?;
    for row in rows {
        writer
            .write_record(grid_row(row))
            .map_err(AppError::internal)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(e.to_string()))?;

    String::from_utf8(bytes).map_err(AppError::internal)
}

/// The same grid as [`to_csv`] in a single-sheet workbook.
pub fn to_xlsx(rows: &[SurveyResponse]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    sheet
        .set_name(SHEET_NAME)
        .map_err(|e| AppError::internal(e.to_string()))?;

    for (col, header) in CSV_HEADERS.iter().enumerate() {
        sheet
            .write(0, col as u16, *header)
            .map_err(|e| AppError::internal(e.to_string()))?;
    }

    for (i, row) in rows.iter().enumerate() {
        for (col, value) in grid_row(row).iter().enumerate() {
            sheet
                .write((i + 1) as u32, col as u16, value.as_str())
                .map_err(|e| AppError::internal(e.to_string()))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| AppError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: Option<&str>, q6: Option<Vec<&str>>) -> SurveyResponse {
        SurveyResponse {
            id: 1,
            created_at: None,
            full_name: name.map(String::from),
            phone: Some("9876543210".to_string()),
            q3: Some("street".to_string()),
            q4: Some("daily".to_string()),
            q5: Some("yes".to_string()),
            q6: q6.map(|v| v.into_iter().map(String::from).collect()),
            q7: None,
            q8: Some("cash".to_string()),
            q9: Some("yes".to_string()),
            q10: None,
            q11: Some("maybe".to_string()),
        }
    }

    #[test]
    fn test_csv_line_count() {
        let rows = vec![
            sample(Some("Ramesh"), None),
            sample(Some("Suresh"), None),
            sample(None, None),
        ];

        let csv = to_csv(&rows).unwrap();
        assert_eq!(csv.trim_end().lines().count(), rows.len() + 1);
    }

    #[test]
    fn test_csv_header_row() {
        let csv = to_csv(&[]).unwrap();
        let header = csv.trim_end().lines().next().unwrap();

        assert_eq!(header.split(',').count(), 11);
        assert!(header.starts_with("Name,Phone,"));
    }

    #[test]
    fn test_missing_fields_use_placeholder() {
        let csv = to_csv(&[sample(None, None)]).unwrap();
        let data_line = csv.trim_end().lines().nth(1).unwrap();

        assert!(data_line.starts_with(MISSING));
        assert!(data_line.contains(&format!(",{MISSING},")));
    }

    #[test]
    fn test_multi_valued_cell_round_trips() {
        let rows = vec![sample(Some("Ramesh"), Some(vec!["wages", "trust"]))];
        let csv = to_csv(&rows).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();

        assert_eq!(&record[5], "wages, trust");
    }

    #[test]
    fn test_empty_set_is_not_placeholder() {
        let csv = to_csv(&[sample(Some("Ramesh"), Some(vec![]))]).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();

        assert_eq!(&record[5], "");
    }

    #[test]
    fn test_xlsx_produces_a_workbook() {
        let bytes = to_xlsx(&[sample(Some("Ramesh"), None)]).unwrap();

        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }
}
