//! Line rendering for each output dialect.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::config::Dialect;
use crate::error::CsvExportError;

/// Line terminator shared by every dialect.
pub const LINE_TERMINATOR: &str = "\n";

/// Renders the header line followed by one line per row.
///
/// With [`Dialect::Plain`] values are joined verbatim. With [`Dialect::Rfc4180`] the
/// csv crate quotes fields containing commas, quotes or newlines.
///
/// A plan without columns renders as bare line terminators in every dialect, so the
/// output always has one line per record plus the header.
pub fn render(
    dialect: Dialect,
    header: &[String],
    rows: &[Vec<String>],
) -> Result<String, CsvExportError> {
    match dialect {
        Dialect::Rfc4180 if !header.is_empty() => render_quoted(header, rows),
        _ => Ok(render_plain(dialect.delimiter(), header, rows)),
    }
}

fn render_plain(delimiter: &str, header: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for line in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        out.push_str(&line.join(delimiter));
        out.push_str(LINE_TERMINATOR);
    }
    out
}

fn render_quoted(header: &[String], rows: &[Vec<String>]) -> Result<String, CsvExportError> {
    let mut writer = WriterBuilder::new()
        .delimiter(b',')
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CsvExportError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| CsvExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
