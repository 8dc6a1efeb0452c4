pub mod filter;

use std::collections::HashSet;

use tracing::{debug, info};

use crate::columns::{self, ColumnDef};
use crate::model::{Record, RecordId};

pub use filter::{FilterOp, RowFilter};

/// The operations the session needs from a data grid.
pub trait DataGrid {
    fn append_rows(&mut self, rows: Vec<Record>);

    fn clear_rows(&mut self);

    fn set_filter(&mut self, field: &str, op: FilterOp, value: &str) -> Result<(), String>;

    fn clear_filter(&mut self);

    /// Replaces the column set wholesale.
    fn set_columns(&mut self, columns: Vec<ColumnDef>);

    fn columns(&self) -> &[ColumnDef];

    /// Single-selection grid: at most one row.
    fn select_row(&mut self, id: &RecordId);

    fn selected_rows(&self) -> Vec<&Record>;

    fn flag_row(&mut self, id: &RecordId);

    fn is_flagged(&self, id: &RecordId) -> bool;

    /// Rows that pass the current filter, in load order.
    fn visible_rows(&self) -> Vec<&Record>;

    fn row_count(&self) -> usize;
}

/// In-memory grid: accumulates rows page after page and filters locally.
#[derive(Clone, Debug)]
pub struct TableGrid {
    rows: Vec<Record>,
    columns: Vec<ColumnDef>,
    filter: Option<RowFilter>,
    selected: Option<RecordId>,
    flagged: HashSet<RecordId>,
}

impl Default for TableGrid {
    fn default() -> Self {
        Self::new(columns::CATALOG.to_vec())
    }
}

impl TableGrid {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self {
            rows: Vec::new(),
            columns,
            filter: None,
            selected: None,
            flagged: HashSet::new(),
        }
    }

    pub fn filter(&self) -> Option<&RowFilter> {
        self.filter.as_ref()
    }

    pub fn selected_id(&self) -> Option<&RecordId> {
        self.selected.as_ref()
    }

    /// Row at a 1-based position among the visible rows.
    pub fn visible_row(&self, position: usize) -> Option<&Record> {
        position
            .checked_sub(1)
            .and_then(|idx| self.visible_rows().get(idx).copied())
    }
}

impl DataGrid for TableGrid {
    fn append_rows(&mut self, rows: Vec<Record>) {
        debug!(added = rows.len(), "grid rows appended");
        self.rows.extend(rows);
    }

    fn clear_rows(&mut self) {
        self.rows.clear();
        self.selected = None;
    }

    fn set_filter(&mut self, field: &str, op: FilterOp, value: &str) -> Result<(), String> {
        let filter = RowFilter::new(field, op, value)?;
        info!(field, op = op.symbol(), value, "filter set");
        self.filter = Some(filter);
        Ok(())
    }

    fn clear_filter(&mut self) {
        self.filter = None;
    }

    fn set_columns(&mut self, columns: Vec<ColumnDef>) {
        debug!(count = columns.len(), "grid columns replaced");
        self.columns = columns;
    }

    fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    fn select_row(&mut self, id: &RecordId) {
        self.selected = Some(id.clone());
    }

    fn selected_rows(&self) -> Vec<&Record> {
        let Some(selected) = self.selected.as_ref() else {
            return Vec::new();
        };
        self.rows
            .iter()
            .find(|r| r.id().as_ref() == Some(selected))
            .into_iter()
            .collect()
    }

    fn flag_row(&mut self, id: &RecordId) {
        self.flagged.insert(id.clone());
    }

    fn is_flagged(&self, id: &RecordId) -> bool {
        self.flagged.contains(id)
    }

    fn visible_rows(&self) -> Vec<&Record> {
        match &self.filter {
            Some(filter) => self.rows.iter().filter(|r| filter.matches(r)).collect(),
            None => self.rows.iter().collect(),
        }
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }
}
