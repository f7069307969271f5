use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use rust_xlsxwriter::{Format, Workbook};

use super::model::{DerivedRecord, REPORT_COLUMNS, ReportCell};

// ---------------------------------------------------------------------------
// Report export
// ---------------------------------------------------------------------------

/// Write the report for `rows` to `path`, choosing the format by extension
/// (`.xlsx` or `.csv`).
pub fn save_report(path: &Path, rows: &[&DerivedRecord]) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let bytes = match ext.as_str() {
        "xlsx" => to_xlsx(rows)?,
        "csv" => to_csv(rows)?,
        other => bail!("Unsupported export format: .{other}"),
    };
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

/// Serialize the report columns to an `.xlsx` workbook in memory.
///
/// Header in row 0, one well per following row, no index column. Null
/// values (missing labels, undefined ratios) are left as blank cells.
pub fn to_xlsx(rows: &[&DerivedRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Cost Report")?;

    for (col, name) in REPORT_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.report_cells().iter().enumerate() {
            let c = col as u16;
            match *cell {
                ReportCell::Text(Some(s)) => {
                    worksheet.write_string(r, c, s)?;
                }
                ReportCell::Number(Some(v)) => {
                    worksheet.write_number(r, c, v)?;
                }
                ReportCell::Text(None) | ReportCell::Number(None) => {}
            }
        }
    }

    let buffer = workbook.save_to_buffer().context("serializing workbook")?;
    Ok(buffer)
}

/// Serialize the report columns to CSV bytes. Null values become empty
/// fields.
pub fn to_csv(rows: &[&DerivedRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_COLUMNS)?;

    for row in rows {
        let fields: Vec<String> = row
            .report_cells()
            .iter()
            .map(|cell| match *cell {
                ReportCell::Text(s) => s.unwrap_or_default().to_string(),
                ReportCell::Number(v) => v.map(|v| v.to_string()).unwrap_or_default(),
            })
            .collect();
        writer.write_record(&fields)?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV: {}", e.error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CostRates;
    use crate::data::derive::derive;
    use crate::data::filter::{FilterState, filtered_indices};
    use crate::data::loader::{read_csv, read_xlsx};
    use crate::data::model::{DerivedDataset, WellDataset, WellRecord};

    fn well(id: &str, op: Option<&str>, dil: f64, haul: f64, len: f64, dow: f64) -> WellRecord {
        WellRecord {
            well_job_id: id.into(),
            operator: op.map(Into::into),
            contractor: Some("C1".into()),
            total_dil: dil,
            haul_off: haul,
            int_length: len,
            dow,
        }
    }

    fn derived() -> DerivedDataset {
        let dataset = WellDataset {
            records: vec![
                well("W1", Some("OpA"), 10.0, 5.0, 100.0, 2.0),
                well("W2", Some("OpB"), 123.456, 78.9, 3210.5, 7.0),
                well("W3", None, 1.0 / 3.0, 2.0 / 7.0, 0.0, 3.0),
                well("W4", Some("OpA"), 42.0, 0.5, 17.25, 0.0),
            ],
        };
        derive(&dataset, &CostRates::default())
    }

    fn assert_close(a: Option<f64>, b: Option<f64>) {
        match (a, b) {
            (Some(a), Some(b)) => assert!((a - b).abs() < 1e-9, "{a} != {b}"),
            (None, None) => {}
            other => panic!("mismatch: {other:?}"),
        }
    }

    fn assert_same_metrics(expected: &[&DerivedRecord], actual: &DerivedDataset) {
        assert_eq!(expected.len(), actual.len());
        for (e, a) in expected.iter().zip(&actual.rows) {
            assert_eq!(e.record.well_job_id, a.record.well_job_id);
            assert_eq!(e.record.operator, a.record.operator);
            let (em, am) = (e.metrics, a.metrics);
            assert_close(Some(em.mud_cost), Some(am.mud_cost));
            assert_close(Some(em.haul_off_cost), Some(am.haul_off_cost));
            assert_close(em.dilution_cost_per_foot, am.dilution_cost_per_foot);
            assert_close(em.haul_off_cost_per_foot, am.haul_off_cost_per_foot);
            assert_close(Some(em.cumulative_cost), Some(am.cumulative_cost));
            assert_close(em.cost_per_day, am.cost_per_day);
        }
    }

    #[test]
    fn xlsx_export_reloads_with_identical_metrics() {
        let ds = derived();
        let rows: Vec<&DerivedRecord> = ds.rows.iter().collect();

        let bytes = to_xlsx(&rows).unwrap();
        let table = read_xlsx(bytes).unwrap();
        assert_eq!(table.headers, REPORT_COLUMNS);

        let reloaded = derive(&WellDataset::from_table(&table).unwrap(), &CostRates::default());
        assert_same_metrics(&rows, &reloaded);
    }

    #[test]
    fn csv_export_reloads_with_identical_metrics() {
        let ds = derived();
        let rows: Vec<&DerivedRecord> = ds.rows.iter().collect();

        let bytes = to_csv(&rows).unwrap();
        let table = read_csv(bytes.as_slice()).unwrap();
        assert_eq!(table.headers, REPORT_COLUMNS);

        let reloaded = derive(&WellDataset::from_table(&table).unwrap(), &CostRates::default());
        assert_same_metrics(&rows, &reloaded);
    }

    #[test]
    fn export_contains_only_the_filtered_rows() {
        let ds = derived();
        let filters = FilterState {
            operators: ["OpA".to_string()].into(),
            ..Default::default()
        };
        let rows: Vec<&DerivedRecord> = filtered_indices(&ds, &filters)
            .into_iter()
            .map(|i| &ds.rows[i])
            .collect();

        let table = read_xlsx(to_xlsx(&rows).unwrap()).unwrap();
        let ids: Vec<String> = table.rows.iter().map(|r| r[0].to_string()).collect();
        assert_eq!(ids, vec!["W1", "W4"]);
    }

    #[test]
    fn undefined_metrics_are_blank_in_csv() {
        let ds = derived();
        let rows = vec![&ds.rows[2]];
        let text = String::from_utf8(to_csv(&rows).unwrap()).unwrap();
        let line = text.lines().nth(1).unwrap();
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 13);
        assert_eq!(fields[1], "");
        assert_eq!(fields[9], "");
        assert_eq!(fields[10], "");
        assert!(!fields[12].is_empty());
    }

    #[test]
    fn empty_selection_exports_header_only() {
        let table = read_csv(to_csv(&[]).unwrap().as_slice()).unwrap();
        assert_eq!(table.headers.len(), 13);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn save_report_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_report(&dir.path().join("report.pdf"), &[]).unwrap_err();
        assert!(err.to_string().contains("Unsupported export format"));
    }

    #[test]
    fn save_report_writes_xlsx_to_disk() {
        let ds = derived();
        let rows: Vec<&DerivedRecord> = ds.rows.iter().collect();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drilling_cost_report.xlsx");

        save_report(&path, &rows).unwrap();
        let reloaded = crate::data::loader::load_file(&path).unwrap();
        assert_eq!(reloaded.len(), 4);
    }
}
