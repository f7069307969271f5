use std::collections::BTreeSet;
use std::fmt;

use super::error::SchemaError;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const WELL_JOB_ID: &str = "Well_Job_ID";
pub const OPERATOR: &str = "Operator";
pub const CONTRACTOR: &str = "Contractor";
pub const TOTAL_DIL: &str = "Total_Dil";
pub const HAUL_OFF: &str = "Haul_OFF";
pub const INT_LENGTH: &str = "IntLength";
pub const DOW: &str = "DOW";

/// Columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    WELL_JOB_ID,
    OPERATOR,
    CONTRACTOR,
    TOTAL_DIL,
    HAUL_OFF,
    INT_LENGTH,
    DOW,
];

/// Columns of the report table and the exported file, in order.
pub const REPORT_COLUMNS: [&str; 13] = [
    WELL_JOB_ID,
    OPERATOR,
    CONTRACTOR,
    TOTAL_DIL,
    HAUL_OFF,
    INT_LENGTH,
    DOW,
    "Mud_Cost",
    "Haul_Off_Cost",
    "Dilution_Cost_Per_Foot",
    "Haul_Off_Cost_Per_Foot",
    "Cumulative_Cost",
    "Cost_Per_Day",
];

// ---------------------------------------------------------------------------
// CellValue – a single cell of a freshly parsed table
// ---------------------------------------------------------------------------

/// A loosely-typed cell as produced by the file parsers, before the schema
/// is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Empty => write!(f, "<empty>"),
        }
    }
}

impl CellValue {
    /// Wrap a textual field (CSV). Numbers stay text until the schema asks
    /// for them, so identifiers like `"007"` keep their leading zeros.
    pub fn from_text(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }

    /// Interpret the cell as a label. Integral numbers print without a
    /// fractional part so `101.0` becomes `"101"`.
    pub fn as_label(&self) -> Option<String> {
        match self {
            CellValue::Text(s) if s.trim().is_empty() => None,
            CellValue::Text(s) => Some(s.trim().to_string()),
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                Some(format!("{}", *v as i64))
            }
            CellValue::Number(v) => Some(v.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Empty => None,
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

// ---------------------------------------------------------------------------
// RawTable – header + rows, format independent
// ---------------------------------------------------------------------------

/// A parsed tabular file: one header row plus data rows.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

// ---------------------------------------------------------------------------
// WellRecord – one typed row
// ---------------------------------------------------------------------------

/// One well/job row after the schema has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct WellRecord {
    pub well_job_id: String,
    pub operator: Option<String>,
    pub contractor: Option<String>,
    /// Total dilution volume (bbl).
    pub total_dil: f64,
    /// Hauled-off volume (bbl).
    pub haul_off: f64,
    /// Interval length (ft).
    pub int_length: f64,
    /// Days on well.
    pub dow: f64,
}

// ---------------------------------------------------------------------------
// WellDataset – the validated record set
// ---------------------------------------------------------------------------

/// The immutable record set of one upload.
#[derive(Debug, Clone, Default)]
pub struct WellDataset {
    pub records: Vec<WellRecord>,
}

impl WellDataset {
    /// Bind a raw table to the well schema.
    ///
    /// All missing columns are reported together. Extra columns are ignored.
    /// Row numbers in errors are 1-based data rows (the header is not
    /// counted).
    pub fn from_table(table: &RawTable) -> Result<Self, SchemaError> {
        let position = |name: &str| table.headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|&&col| position(col).is_none())
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns(missing));
        }

        // Checked above, every lookup succeeds.
        let idx = |name: &str| position(name).unwrap_or_default();
        let id_idx = idx(WELL_JOB_ID);
        let op_idx = idx(OPERATOR);
        let con_idx = idx(CONTRACTOR);
        let dil_idx = idx(TOTAL_DIL);
        let haul_idx = idx(HAUL_OFF);
        let len_idx = idx(INT_LENGTH);
        let dow_idx = idx(DOW);

        let mut records = Vec::with_capacity(table.rows.len());
        for (i, row) in table.rows.iter().enumerate() {
            let row_no = i + 1;
            // Fully blank lines (common at the end of worksheets) are skipped.
            if row.iter().all(CellValue::is_empty) {
                continue;
            }
            let cell = |col: usize| row.get(col).unwrap_or(&EMPTY_CELL);

            let well_job_id =
                cell(id_idx)
                    .as_label()
                    .ok_or_else(|| SchemaError::MissingValue {
                        row: row_no,
                        column: WELL_JOB_ID.to_string(),
                    })?;

            records.push(WellRecord {
                well_job_id,
                operator: cell(op_idx).as_label(),
                contractor: cell(con_idx).as_label(),
                total_dil: numeric(cell(dil_idx), row_no, TOTAL_DIL)?,
                haul_off: numeric(cell(haul_idx), row_no, HAUL_OFF)?,
                int_length: numeric(cell(len_idx), row_no, INT_LENGTH)?,
                dow: numeric(cell(dow_idx), row_no, DOW)?,
            });
        }

        Ok(WellDataset { records })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn numeric(cell: &CellValue, row: usize, column: &str) -> Result<f64, SchemaError> {
    match cell {
        CellValue::Number(v) if v.is_finite() => Ok(*v),
        CellValue::Number(v) if v.is_infinite() => Err(SchemaError::NotNumeric {
            row,
            column: column.to_string(),
            value: v.to_string(),
        }),
        CellValue::Text(s) if !s.trim().is_empty() => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(SchemaError::NotNumeric {
                row,
                column: column.to_string(),
                value: s.clone(),
            }),
        },
        CellValue::Bool(b) => Err(SchemaError::NotNumeric {
            row,
            column: column.to_string(),
            value: b.to_string(),
        }),
        _ => Err(SchemaError::MissingValue {
            row,
            column: column.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// CostMetrics / DerivedRecord / DerivedDataset
// ---------------------------------------------------------------------------

/// The six derived cost columns of one record. Quotients are `None` when the
/// divisor is zero (or the result is otherwise not finite).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostMetrics {
    pub mud_cost: f64,
    pub haul_off_cost: f64,
    pub dilution_cost_per_foot: Option<f64>,
    pub haul_off_cost_per_foot: Option<f64>,
    pub cumulative_cost: f64,
    pub cost_per_day: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRecord {
    pub record: WellRecord,
    pub metrics: CostMetrics,
}

/// One cell of the report, shared by the table view and the exporters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportCell<'a> {
    Text(Option<&'a str>),
    Number(Option<f64>),
}

impl DerivedRecord {
    /// The row's values in [`REPORT_COLUMNS`] order.
    pub fn report_cells(&self) -> [ReportCell<'_>; 13] {
        let r = &self.record;
        let m = &self.metrics;
        [
            ReportCell::Text(Some(r.well_job_id.as_str())),
            ReportCell::Text(r.operator.as_deref()),
            ReportCell::Text(r.contractor.as_deref()),
            ReportCell::Number(Some(r.total_dil)),
            ReportCell::Number(Some(r.haul_off)),
            ReportCell::Number(Some(r.int_length)),
            ReportCell::Number(Some(r.dow)),
            ReportCell::Number(Some(m.mud_cost)),
            ReportCell::Number(Some(m.haul_off_cost)),
            ReportCell::Number(m.dilution_cost_per_foot),
            ReportCell::Number(m.haul_off_cost_per_foot),
            ReportCell::Number(Some(m.cumulative_cost)),
            ReportCell::Number(m.cost_per_day),
        ]
    }
}

/// The derived set with the selector menus pre-computed.
#[derive(Debug, Clone, Default)]
pub struct DerivedDataset {
    pub rows: Vec<DerivedRecord>,
    /// Distinct non-null operators, sorted.
    pub operators: BTreeSet<String>,
    /// Distinct non-null contractors, sorted.
    pub contractors: BTreeSet<String>,
}

impl DerivedDataset {
    pub fn from_rows(rows: Vec<DerivedRecord>) -> Self {
        let operators = rows
            .iter()
            .filter_map(|r| r.record.operator.clone())
            .collect();
        let contractors = rows
            .iter()
            .filter_map(|r| r.record.contractor.clone())
            .collect();
        DerivedDataset {
            rows,
            operators,
            contractors,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
