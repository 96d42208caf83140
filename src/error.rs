//! Error module
//!
//! Defines the error type for CSV export using `thiserror`.
//! Input-shape failures, unreadable cells and sink failures are distinct variants so
//! callers can tell them apart without inspecting messages.

use thiserror::Error;

/// The main error type for record serialization.
///
/// # Error Categories
///
/// - **Input shape**: [`EmptyInput`](Self::EmptyInput) and
///   [`HeterogeneousInput`](Self::HeterogeneousInput), raised at construction
/// - **Cell errors**: [`FieldAccess`](Self::FieldAccess) and [`NullField`](Self::NullField),
///   raised only when the configured policy aborts instead of degrading the cell
/// - **Sink errors**: [`SinkWrite`](Self::SinkWrite), [`InvalidFileName`](Self::InvalidFileName)
///   and [`Unencodable`](Self::Unencodable)
/// - **Configuration errors**: [`InvalidConfig`](Self::InvalidConfig) and [`Json`](Self::Json)
///
/// # Example
///
/// ```rust,ignore
/// use record_csv::error::CsvExportError;
///
/// fn example() -> Result<(), CsvExportError> {
///     let file = std::fs::File::open("nonexistent.json")?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum CsvExportError {
    /// The record collection has no elements.
    #[error("Empty input: at least one record is required")]
    EmptyInput,

    /// A record's type differs from the type of the first record.
    #[error("Heterogeneous input: record {index} is of type `{found}`, expected `{expected}`")]
    HeterogeneousInput {
        /// Position of the first deviating record.
        index: usize,
        /// Type of the first record.
        expected: String,
        /// Type of the deviating record.
        found: String,
    },

    /// A field's value could not be read.
    #[error("Field access error: row {row}, field `{field}`: {reason}")]
    FieldAccess {
        /// Zero-based record position.
        row: usize,
        /// Field identifier.
        field: String,
        /// Message reported by the accessor.
        reason: String,
    },

    /// A field's value was absent.
    #[error("Null field: row {row}, field `{field}` has no value")]
    NullField {
        /// Zero-based record position.
        row: usize,
        /// Field identifier.
        field: String,
    },

    /// Opening or writing the destination failed.
    ///
    /// Raised by both sinks: the output file of `generate` and the caller's writer
    /// passed to `write_to`.
    #[error("Sink write error: {destination}: {source}")]
    SinkWrite {
        /// Destination that could not be written: the file path, or `writer`.
        destination: String,
        #[source]
        source: std::io::Error,
    },

    /// The output file name would place the file outside the target directory.
    #[error("Invalid file name `{name}`: {reason}")]
    InvalidFileName {
        /// Name as given by the caller.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// The rendered text contains characters the output encoding cannot represent.
    #[error("Text cannot be encoded as {encoding}")]
    Unencodable {
        /// Name of the output encoding.
        encoding: String,
    },

    /// Invalid generator configuration (e.g., unknown encoding label).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error from the underlying csv writer (RFC 4180 dialect).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// General I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error while loading a configuration file.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
