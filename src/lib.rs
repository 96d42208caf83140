//! Record CSV Library
//!
//! Serializes an in-memory collection of uniformly-typed records as CSV. Record types
//! declare their fields through the [`csv_handler::Record`] trait, including display
//! names, explicit column positions and ignored fields. The output is written to any
//! [`std::io::Write`] sink or to a `<directory>/<name>.csv` file.

pub mod config;
pub mod csv_handler;
pub mod error;
