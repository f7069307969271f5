use std::collections::BTreeSet;

use super::model::{DerivedDataset, DerivedRecord};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per categorical field
// ---------------------------------------------------------------------------

/// The two filter selectors. An empty set means "no filter" for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub operators: BTreeSet<String>,
    pub contractors: BTreeSet<String>,
}

/// Which categorical field a selector applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Operator,
    Contractor,
}

impl FilterField {
    pub fn label(self) -> &'static str {
        match self {
            FilterField::Operator => "Operator",
            FilterField::Contractor => "Contractor",
        }
    }

    /// The row's value for this field.
    pub fn value(self, row: &DerivedRecord) -> Option<&str> {
        match self {
            FilterField::Operator => row.record.operator.as_deref(),
            FilterField::Contractor => row.record.contractor.as_deref(),
        }
    }
}

impl FilterState {
    pub fn selected(&self, field: FilterField) -> &BTreeSet<String> {
        match field {
            FilterField::Operator => &self.operators,
            FilterField::Contractor => &self.contractors,
        }
    }

    pub fn selected_mut(&mut self, field: FilterField) -> &mut BTreeSet<String> {
        match field {
            FilterField::Operator => &mut self.operators,
            FilterField::Contractor => &mut self.contractors,
        }
    }

    /// Whether any selector restricts the rows.
    pub fn is_active(&self) -> bool {
        !self.operators.is_empty() || !self.contractors.is_empty()
    }

    /// Whether a single row passes both selectors.
    ///
    /// * Empty selector → passes (no constraint)
    /// * Row value in the selector → passes
    /// * Null row value under a non-empty selector → fails
    pub fn matches(&self, row: &DerivedRecord) -> bool {
        [FilterField::Operator, FilterField::Contractor]
            .into_iter()
            .all(|field| {
                let selected = self.selected(field);
                selected.is_empty()
                    || field
                        .value(row)
                        .is_some_and(|v| selected.contains(v))
            })
    }
}

/// Return indices of rows that pass all active filters, in input order.
pub fn filtered_indices(dataset: &DerivedDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| filters.matches(row))
        .map(|(i, _)| i)
        .collect()
}
