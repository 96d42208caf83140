//! CSV handler module
//!
//! Declares record columns, derives the column plan and writes records as CSV.

pub mod column;
pub mod dialect;
pub mod generator;
pub mod plan;

pub use column::{Cell, Column, FieldDescriptor, Record};
pub use generator::CsvGenerator;
pub use plan::ColumnPlan;
