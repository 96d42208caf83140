//! Generator configuration
//!
//! Controls output dialect, how unreadable and absent cell values are handled, and
//! the byte encoding of the written file. Configuration can be built in code or
//! loaded from a JSON file.
//!
//! # Example
//!
//! ```rust,ignore
//! use record_csv::config::GeneratorConfig;
//! use std::path::Path;
//!
//! let config = GeneratorConfig::from_json_file(Path::new("export.json"))?;
//! ```
//!
//! Expected JSON format (every key optional):
//! ```json
//! {
//!     "dialect": "plain",
//!     "on_unreadable": "degrade",
//!     "on_null": { "policy": "render", "text": "" },
//!     "encoding": "utf-8",
//!     "extension": "csv"
//! }
//! ```

use crate::error::CsvExportError;
use encoding_rs::Encoding;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default file extension appended to the output name.
pub const DEFAULT_EXTENSION: &str = "csv";

/// Default output encoding label.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Line format of the generated output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Fields joined with `", "`, lines ended by `\n`, values written verbatim.
    #[default]
    Plain,
    /// Comma-delimited with RFC 4180 quoting of commas, quotes and newlines.
    Rfc4180,
}

impl Dialect {
    /// Field separator used by this dialect.
    #[must_use]
    pub fn delimiter(&self) -> &'static str {
        match self {
            Dialect::Plain => ", ",
            Dialect::Rfc4180 => ",",
        }
    }
}

/// What to do when a field accessor reports that a value cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellFailurePolicy {
    /// Emit an empty cell, log a warning and continue.
    #[default]
    Degrade,
    /// Stop and return [`CsvExportError::FieldAccess`].
    Abort,
}

/// What to do when a field has no value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum NullPolicy {
    /// Emit `text` in place of the absent value.
    Render {
        #[serde(default)]
        text: String,
    },
    /// Stop and return [`CsvExportError::NullField`].
    Abort,
}

impl Default for NullPolicy {
    fn default() -> Self {
        NullPolicy::Render {
            text: String::new(),
        }
    }
}

/// Settings for a [`CsvGenerator`](crate::csv_handler::CsvGenerator).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Output line format.
    pub dialect: Dialect,
    /// Handling of unreadable field values.
    pub on_unreadable: CellFailurePolicy,
    /// Handling of absent field values.
    pub on_null: NullPolicy,
    /// WHATWG encoding label for the written bytes.
    ///
    /// The default `utf-8` is variable-width. Use `windows-1252` (also reachable as
    /// `latin1` or `iso-8859-1`) for one byte per character; characters outside that
    /// code page then fail with [`CsvExportError::Unencodable`].
    pub encoding: String,
    /// Extension appended to the output file name, without the dot.
    pub extension: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            on_unreadable: CellFailurePolicy::default(),
            on_null: NullPolicy::default(),
            encoding: DEFAULT_ENCODING.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Load and validate a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened (IO error)
    /// - The file contains invalid JSON or unknown values (JSON parsing error)
    /// - The encoding label or extension is invalid (configuration error)
    pub fn from_json_file(path: &Path) -> Result<Self, CsvExportError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: GeneratorConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configured encoding label.
    ///
    /// Labels whose encoder writes a different encoding (`utf-16le`, `utf-16be` and
    /// `replacement` all encode as UTF-8 in `encoding_rs`) are rejected, so the bytes
    /// on disk always match the configured label.
    pub fn output_encoding(&self) -> Result<&'static Encoding, CsvExportError> {
        let encoding = Encoding::for_label(self.encoding.trim().as_bytes()).ok_or_else(|| {
            CsvExportError::InvalidConfig(format!("unknown encoding label: {}", self.encoding))
        })?;

        if encoding.output_encoding() != encoding {
            return Err(CsvExportError::InvalidConfig(format!(
                "encoding {} cannot be used for output",
                encoding.name()
            )));
        }
        Ok(encoding)
    }

    /// Check the configuration for values that would fail at write time.
    pub fn validate(&self) -> Result<(), CsvExportError> {
        self.output_encoding()?;

        if self.extension.is_empty() {
            return Err(CsvExportError::InvalidConfig(
                "extension must not be empty".to_string(),
            ));
        }
        if self.extension.contains(['/', '\\']) {
            return Err(CsvExportError::InvalidConfig(format!(
                "extension must not contain path separators: {}",
                self.extension
            )));
        }
        Ok(())
    }
}
