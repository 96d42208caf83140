//! Column plan derivation.
//!
//! Turns the declared columns of a record type into the ordered set that is written:
//! ignored columns are dropped, the rest are stable-sorted by explicit position with
//! unpositioned columns last in declaration order.

use tracing::debug;

use super::column::{Column, FieldDescriptor, Record};

/// Ordered columns that appear in the output.
pub struct ColumnPlan<R> {
    columns: Vec<Column<R>>,
}

impl<R: Record> ColumnPlan<R> {
    /// Derives the plan from `R`'s declared columns.
    pub fn derive() -> Self {
        Self::from_columns(R::columns())
    }
}

impl<R> ColumnPlan<R> {
    /// Builds a plan from columns given in declaration order.
    pub fn from_columns(columns: Vec<Column<R>>) -> Self {
        let declared = columns.len();
        let mut columns: Vec<Column<R>> =
            columns.into_iter().filter(|c| !c.is_ignored()).collect();

        // sort_by_key is stable: equal keys keep declaration order
        columns.sort_by_key(|c| sort_key(c.index()));

        debug!(declared, included = columns.len(), "Derived column plan");
        Self { columns }
    }

    /// Included columns in output order.
    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    /// Header labels in output order.
    pub fn labels(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.label().to_string()).collect()
    }

    /// Metadata of the included columns in output order.
    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        self.columns.iter().map(Column::descriptor).collect()
    }

    /// Number of included columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when every declared column is ignored.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Explicit positions first in ascending order, then every unpositioned column.
fn sort_key(index: Option<i32>) -> (bool, i32) {
    match index {
        Some(i) => (false, i),
        None => (true, 0),
    }
}
