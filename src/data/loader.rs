use std::io::{Cursor, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use calamine::{Data, Reader, Xlsx};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::SchemaError;
use super::model::{CellValue, RawTable, WellDataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a well dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx`    – first worksheet, header in the first used row
/// * `.csv`     – header row, comma separated
/// * `.json`    – `[{ "Well_Job_ID": "W1", "Total_Dil": 10, ... }, ...]`
/// * `.parquet` – flat columns named after the fields
pub fn load_file(path: &Path) -> Result<WellDataset> {
    let table = read_table(path)?;
    let dataset = WellDataset::from_table(&table)
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(dataset)
}

/// Parse a file into an untyped [`RawTable`] without applying the schema.
pub fn read_table(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" => {
            let bytes = std::fs::read(path).context("reading Excel file")?;
            read_xlsx(bytes)
        }
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            read_json(&text)
        }
        "parquet" | "pq" => read_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

/// Read the first worksheet of an `.xlsx` workbook held in memory.
pub fn read_xlsx(bytes: Vec<u8>) -> Result<RawTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).context("opening Excel workbook")?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("No sheets found in Excel file")?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("reading worksheet '{sheet_name}'"))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| c.to_string()).collect(),
        None => return Err(SchemaError::EmptySheet.into()),
    };

    let rows = rows
        .map(|row| row.iter().map(xlsx_to_cell).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn xlsx_to_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::from_text(s),
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one well per line.
pub fn read_csv<R: Read>(input: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        rows.push(record.iter().map(CellValue::from_text).collect());
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Columns are the union of keys across all objects.
pub fn read_json(text: &str) -> Result<RawTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {} is not a JSON object", i + 1))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Empty))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::from_text(s),
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => CellValue::Number(f),
            None => CellValue::Text(n.to_string()),
        },
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns: Vec<ArrayRef> = batch
            .columns()
            .iter()
            .map(normalize_column)
            .collect::<Result<_>>()?;

        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| arrow_to_cell(col, row)).collect());
        }
    }

    Ok(RawTable { headers, rows })
}

// -- Parquet / Arrow helpers --

/// Widen every numeric column to Float64 so rows can be read uniformly.
fn normalize_column(col: &ArrayRef) -> Result<ArrayRef> {
    if col.data_type().is_numeric() && col.data_type() != &DataType::Float64 {
        cast(col, &DataType::Float64)
            .with_context(|| format!("casting {:?} column to Float64", col.data_type()))
    } else {
        Ok(col.clone())
    }
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_to_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Empty;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::from_text(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => CellValue::from_text(col.as_string::<i64>().value(row)),
        DataType::Float64 => CellValue::Number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        other => CellValue::Text(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    const CSV: &str = "\
Well_Job_ID,Operator,Contractor,Total_Dil,Haul_OFF,IntLength,DOW,Comment
W1,OpA,C1,10,5,100,2,first
W2,,C2,3.5,1,0,4,
";

    #[test]
    fn csv_rows_bind_to_schema() {
        let table = read_csv(CSV.as_bytes()).unwrap();
        assert_eq!(table.headers.len(), 8);
        let ds = WellDataset::from_table(&table).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].operator, None);
        assert_eq!(ds.records[1].total_dil, 3.5);
        assert_eq!(ds.records[1].int_length, 0.0);
    }

    #[test]
    fn json_records_bind_to_schema() {
        let text = r#"[
            {"Well_Job_ID": "W1", "Operator": "OpA", "Contractor": "C1",
             "Total_Dil": 10, "Haul_OFF": 5, "IntLength": 100, "DOW": 2},
            {"Well_Job_ID": 17, "Operator": null, "Contractor": "C1",
             "Total_Dil": 1.5, "Haul_OFF": 0, "IntLength": 10, "DOW": 1}
        ]"#;
        let ds = WellDataset::from_table(&read_json(text).unwrap()).unwrap();
        assert_eq!(ds.records[0].well_job_id, "W1");
        assert_eq!(ds.records[1].well_job_id, "17");
        assert_eq!(ds.records[1].operator, None);
    }

    #[test]
    fn json_must_be_an_array() {
        assert!(read_json(r#"{"Well_Job_ID": "W1"}"#).is_err());
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records[0].well_job_id, "W1");
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }

    #[test]
    fn missing_columns_surface_through_load_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"Well_Job_ID,Operator\nW1,OpA\n").unwrap();
        let err = load_file(file.path()).unwrap_err();
        let schema = err.downcast_ref::<SchemaError>().unwrap();
        assert!(matches!(schema, SchemaError::MissingColumns(cols) if cols.len() == 5));
        assert!(format!("{err:#}").contains("Contractor, Total_Dil, Haul_OFF, IntLength, DOW"));
    }

    #[test]
    fn garbage_xlsx_is_an_error() {
        assert!(read_xlsx(b"definitely not a zip archive".to_vec()).is_err());
    }

    #[test]
    fn parquet_columns_are_widened_and_bound() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Well_Job_ID", DataType::Utf8, false),
            Field::new("Operator", DataType::Utf8, true),
            Field::new("Contractor", DataType::Utf8, true),
            Field::new("Total_Dil", DataType::Float64, false),
            Field::new("Haul_OFF", DataType::Int64, false),
            Field::new("IntLength", DataType::Int64, false),
            Field::new("DOW", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["W1", "W2"])),
                Arc::new(StringArray::from(vec![Some("OpA"), None])),
                Arc::new(StringArray::from(vec![Some("C1"), Some("C2")])),
                Arc::new(Float64Array::from(vec![10.0, 2.5])),
                Arc::new(Int64Array::from(vec![5, 1])),
                Arc::new(Int64Array::from(vec![100, 20])),
                Arc::new(Float64Array::from(vec![2.0, 1.0])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].haul_off, 5.0);
        assert_eq!(ds.records[0].int_length, 100.0);
        assert_eq!(ds.records[1].operator, None);
    }
}
