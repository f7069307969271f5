use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::derive::derive;
use crate::data::export::save_report;
use crate::data::filter::{FilterField, FilterState, filtered_indices};
use crate::data::loader::load_file;
use crate::data::model::{DerivedDataset, DerivedRecord, WellDataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state of one session, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Derived dataset of the last successful upload (None until then).
    pub dataset: Option<DerivedDataset>,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Operator / contractor selections.
    pub filters: FilterState,

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Bar colours keyed by operator.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Informational message (e.g. where a report was saved).
    pub notice: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            dataset: None,
            source: None,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            color_map: ColorMap::default(),
            status_message: None,
            notice: None,
        }
    }

    /// "File uploaded": load, validate and derive. On failure the previous
    /// dataset stays in place and the error is shown.
    pub fn open(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                log::info!("Loaded {} wells from {}", dataset.len(), path.display());
                self.set_dataset(&dataset);
                self.source = Some(path.to_path_buf());
                if dataset.is_empty() {
                    log::warn!("{} has headers but no well rows", path.display());
                    self.notice = Some("The uploaded file contains no wells.".to_string());
                }
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Derive metrics for a freshly loaded record set and reset the filters.
    pub fn set_dataset(&mut self, dataset: &WellDataset) {
        let derived = derive(dataset, &self.config.rates);
        self.filters = FilterState::default();
        self.visible_indices = (0..derived.len()).collect();
        self.color_map = ColorMap::new(&derived.operators);
        self.dataset = Some(derived);
        self.status_message = None;
        self.notice = None;
    }

    /// "Filter changed": recompute `visible_indices` against the already
    /// derived rows.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filters);
            log::debug!(
                "Filter {:?} keeps {}/{} wells",
                self.filters,
                self.visible_indices.len(),
                ds.len()
            );
        }
    }

    /// Toggle a single value in a field's selector.
    pub fn toggle_filter_value(&mut self, field: FilterField, value: &str) {
        let selected = self.filters.selected_mut(field);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Clear a selector, lifting its restriction.
    pub fn clear_filter(&mut self, field: FilterField) {
        self.filters.selected_mut(field).clear();
        self.refilter();
    }

    /// Rows passing the current filters, in input order.
    pub fn visible_rows(&self) -> Vec<&DerivedRecord> {
        match &self.dataset {
            Some(ds) => self.visible_indices.iter().map(|&i| &ds.rows[i]).collect(),
            None => Vec::new(),
        }
    }

    /// "Download": write the visible rows to `path`.
    pub fn export(&self, path: &Path) -> Result<()> {
        let rows = self.visible_rows();
        save_report(path, &rows)?;
        log::info!("Exported {} wells to {}", rows.len(), path.display());
        Ok(())
    }
}
