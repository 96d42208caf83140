use encoding_rs::{Encoding, UTF_8};
use std::fs::File;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::column::{Cell, Column, FieldDescriptor, Record};
use super::dialect;
use super::plan::ColumnPlan;
use crate::config::{CellFailurePolicy, GeneratorConfig, NullPolicy};
use crate::error::CsvExportError;

/// Destination reported in [`CsvExportError::SinkWrite`] for [`CsvGenerator::write_to`].
pub const WRITER_DESTINATION: &str = "writer";

/// Serializes a non-empty, homogeneous slice of records as CSV.
///
/// The generator borrows the records and validates their shape on construction. No
/// serialization happens until [`render`](Self::render), [`write_to`](Self::write_to)
/// or [`generate`](Self::generate) is called, and each call derives its own
/// [`ColumnPlan`].
///
/// # CSV Format
///
/// With the default configuration the output is a header line of column labels
/// followed by one line per record, values joined with `", "` and each line ended by
/// `\n`. Values are written verbatim.
///
/// # Example
///
/// ```
/// use record_csv::csv_handler::{Column, CsvGenerator, Record};
///
/// struct Person {
///     id: u32,
///     name: String,
/// }
///
/// impl Record for Person {
///     fn columns() -> Vec<Column<Self>> {
///         vec![
///             Column::new("id", |p: &Person| p.id),
///             Column::new("name", |p: &Person| p.name.clone()),
///         ]
///     }
/// }
///
/// let people = vec![
///     Person { id: 1, name: "Ada".to_string() },
///     Person { id: 2, name: "Grace".to_string() },
/// ];
/// let generator = CsvGenerator::new(&people).unwrap();
/// assert_eq!(generator.render().unwrap(), "id, name\n1, Ada\n2, Grace\n");
/// ```
pub struct CsvGenerator<'a, R: Record> {
    records: &'a [R],
    config: GeneratorConfig,
}

impl<'a, R: Record> CsvGenerator<'a, R> {
    /// Creates a generator with the default configuration.
    ///
    /// # Errors
    ///
    /// - [`CsvExportError::EmptyInput`] if `records` is empty
    /// - [`CsvExportError::HeterogeneousInput`] if any record's type differs from the first
    pub fn new(records: &'a [R]) -> Result<Self, CsvExportError> {
        Self::with_config(records, GeneratorConfig::default())
    }

    /// Creates a generator with an explicit configuration.
    ///
    /// Fails like [`new`](Self::new), and with [`CsvExportError::InvalidConfig`] when
    /// the configuration does not validate.
    pub fn with_config(records: &'a [R], config: GeneratorConfig) -> Result<Self, CsvExportError> {
        let first = records.first().ok_or(CsvExportError::EmptyInput)?;
        let expected = first.record_type();

        if let Some((index, found)) = records
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, r)| (i, r.record_type()))
            .find(|(_, found)| *found != expected)
        {
            return Err(CsvExportError::HeterogeneousInput {
                index,
                expected: expected.into_owned(),
                found: found.into_owned(),
            });
        }

        config.validate()?;

        Ok(Self { records, config })
    }

    /// Number of records; the output has one more line than this.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Configuration in effect.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Columns that will be written, in output order.
    pub fn column_plan(&self) -> Vec<FieldDescriptor> {
        ColumnPlan::<R>::derive().descriptors()
    }

    /// Header labels in output order.
    pub fn header(&self) -> Vec<String> {
        ColumnPlan::<R>::derive().labels()
    }

    /// Renders the header and all rows as one text blob.
    ///
    /// # Errors
    ///
    /// Only when a cell policy is set to abort:
    /// - [`CsvExportError::FieldAccess`] for the first unreadable value
    /// - [`CsvExportError::NullField`] for the first absent value
    pub fn render(&self) -> Result<String, CsvExportError> {
        let plan = ColumnPlan::<R>::derive();
        let header = plan.labels();

        let rows = self
            .records
            .iter()
            .enumerate()
            .map(|(row, record)| self.render_row(&plan, row, record))
            .collect::<Result<Vec<_>, _>>()?;

        let text = dialect::render(self.config.dialect, &header, &rows)?;
        debug!(
            rows = rows.len(),
            columns = plan.len(),
            dialect = ?self.config.dialect,
            "Rendered CSV text"
        );
        Ok(text)
    }

    /// Renders and encodes the output with the configured encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CsvExportError> {
        let text = self.render()?;
        encode(&text, self.config.output_encoding()?)
    }

    /// Writes the encoded output to `writer` in one shot, returning the byte count.
    ///
    /// A failing writer is reported as [`CsvExportError::SinkWrite`] with destination
    /// `writer`, the same kind [`generate`](Self::generate) uses for file failures.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize, CsvExportError> {
        let bytes = self.to_bytes()?;

        if let Err(source) = writer.write_all(&bytes).and_then(|()| writer.flush()) {
            error!(error = %source, "Failed to write CSV output");
            return Err(CsvExportError::SinkWrite {
                destination: WRITER_DESTINATION.to_string(),
                source,
            });
        }
        Ok(bytes.len())
    }

    /// Destination for [`generate`](Self::generate): `<directory>/<name>.<extension>`.
    ///
    /// `name` must be a single plain path component, so the file always lands directly
    /// inside `directory`. Absolute names, names with separators, `.` and `..` fail with
    /// [`CsvExportError::InvalidFileName`].
    pub fn output_path(&self, directory: &Path, name: &str) -> Result<PathBuf, CsvExportError> {
        check_file_name(name)?;
        Ok(directory.join(format!("{}.{}", name, self.config.extension)))
    }

    /// Writes the output to `<directory>/<name>.<extension>`, replacing any existing file.
    ///
    /// The file is only created once rendering has succeeded, so a cell error leaves an
    /// existing destination untouched.
    ///
    /// # Errors
    ///
    /// - [`CsvExportError::InvalidFileName`] if `name` is not a plain file name
    /// - [`CsvExportError::SinkWrite`] if the file cannot be created or written
    /// - Any error from [`to_bytes`](Self::to_bytes)
    pub fn generate(&self, directory: &Path, name: &str) -> Result<PathBuf, CsvExportError> {
        let path = self.output_path(directory, name)?;
        let bytes = self.to_bytes()?;

        if let Err(source) = write_file(&path, &bytes) {
            error!(path = %path.display(), error = %source, "Failed to write CSV file");
            return Err(CsvExportError::SinkWrite {
                destination: path.display().to_string(),
                source,
            });
        }

        info!(
            path = %path.display(),
            bytes = bytes.len(),
            rows = self.records.len(),
            "Wrote CSV file"
        );
        Ok(path)
    }

    fn render_row(
        &self,
        plan: &ColumnPlan<R>,
        row: usize,
        record: &R,
    ) -> Result<Vec<String>, CsvExportError> {
        plan.columns()
            .iter()
            .map(|column| self.render_cell(column, row, record))
            .collect()
    }

    fn render_cell(
        &self,
        column: &Column<R>,
        row: usize,
        record: &R,
    ) -> Result<String, CsvExportError> {
        match column.read(record) {
            Cell::Value(value) => Ok(value),
            Cell::Null => match &self.config.on_null {
                NullPolicy::Render { text } => Ok(text.clone()),
                NullPolicy::Abort => Err(CsvExportError::NullField {
                    row,
                    field: column.id().to_string(),
                }),
            },
            Cell::Unreadable(reason) => match self.config.on_unreadable {
                CellFailurePolicy::Degrade => {
                    warn!(
                        row,
                        field = column.id(),
                        reason = %reason,
                        "Field unreadable, writing empty cell"
                    );
                    Ok(String::new())
                }
                CellFailurePolicy::Abort => Err(CsvExportError::FieldAccess {
                    row,
                    field: column.id().to_string(),
                    reason,
                }),
            },
        }
    }
}

/// Encodes `text`, failing if any character has no representation in `encoding`.
fn encode(text: &str, encoding: &'static Encoding) -> Result<Vec<u8>, CsvExportError> {
    if encoding == UTF_8 {
        return Ok(text.as_bytes().to_vec());
    }

    let (bytes, used, had_unmappable) = encoding.encode(text);
    if had_unmappable {
        return Err(CsvExportError::Unencodable {
            encoding: used.name().to_string(),
        });
    }
    Ok(bytes.into_owned())
}

/// Accepts only names that form exactly one normal path component.
fn check_file_name(name: &str) -> Result<(), CsvExportError> {
    let reject = |reason: &str| {
        Err(CsvExportError::InvalidFileName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return reject("name is empty");
    }
    if name.contains(['/', '\\']) {
        return reject("name contains a path separator");
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => reject("name must be a plain file name"),
    }
}

/// Creates (or truncates) `path` and writes `bytes`. The handle is closed on drop.
fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.flush()
}
