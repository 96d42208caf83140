//! Record and column declarations.
//!
//! A record type lists its fields through [`Record::columns`]. Each [`Column`] pairs a
//! field identifier with an accessor and the optional metadata that shapes the output:
//! a display name, an explicit position, and an ignore marker.

use std::borrow::Cow;
use std::fmt::{self, Display};

/// Outcome of reading one field of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// The textual form of the value.
    Value(String),
    /// The field holds no value.
    Null,
    /// The value could not be read; carries the reason.
    Unreadable(String),
}

type Accessor<R> = Box<dyn Fn(&R) -> Cell>;

/// One declared field of a record type.
///
/// # Example
///
/// ```
/// use record_csv::csv_handler::Column;
///
/// struct Person {
///     id: u32,
///     name: String,
/// }
///
/// let id = Column::new("id", |p: &Person| p.id).named("ID").at(1);
/// let name = Column::new("name", |p: &Person| p.name.clone()).at(0);
///
/// assert_eq!(id.label(), "ID");
/// assert_eq!(name.label(), "name");
/// assert_eq!(name.index(), Some(0));
/// ```
pub struct Column<R> {
    id: String,
    display_name: Option<String>,
    index: Option<i32>,
    ignored: bool,
    accessor: Accessor<R>,
}

impl<R> Column<R> {
    /// Declares a field whose value is always present, rendered with [`Display`].
    pub fn new<T, F>(id: impl Into<String>, accessor: F) -> Self
    where
        T: Display,
        F: Fn(&R) -> T + 'static,
    {
        Self::with_accessor(id, move |record| Cell::Value(accessor(record).to_string()))
    }

    /// Declares a field that may be absent. `None` is reported as [`Cell::Null`].
    pub fn optional<T, F>(id: impl Into<String>, accessor: F) -> Self
    where
        T: Display,
        F: Fn(&R) -> Option<T> + 'static,
    {
        Self::with_accessor(id, move |record| match accessor(record) {
            Some(value) => Cell::Value(value.to_string()),
            None => Cell::Null,
        })
    }

    /// Declares a field whose read may fail. `Err` is reported as [`Cell::Unreadable`].
    pub fn fallible<T, E, F>(id: impl Into<String>, accessor: F) -> Self
    where
        T: Display,
        E: Display,
        F: Fn(&R) -> Result<T, E> + 'static,
    {
        Self::with_accessor(id, move |record| match accessor(record) {
            Ok(value) => Cell::Value(value.to_string()),
            Err(e) => Cell::Unreadable(e.to_string()),
        })
    }

    /// Declares a field from a raw [`Cell`] accessor.
    pub fn with_accessor<F>(id: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> Cell + 'static,
    {
        Self {
            id: id.into(),
            display_name: None,
            index: None,
            ignored: false,
            accessor: Box::new(accessor),
        }
    }

    /// Sets the header label. An empty name falls back to the identifier.
    #[must_use]
    pub fn named(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the explicit column position. Lower positions come first.
    #[must_use]
    pub fn at(mut self, index: i32) -> Self {
        self.index = Some(index);
        self
    }

    /// Excludes the field from header and rows.
    #[must_use]
    pub fn ignore(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Field identifier, used as the header label when no display name is set.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Header label override, if any.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Explicit position, if any.
    pub fn index(&self) -> Option<i32> {
        self.index
    }

    /// Whether the field is excluded from the output.
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Header label: the display name when set and non-empty, otherwise the identifier.
    pub fn label(&self) -> &str {
        resolve_label(&self.id, self.display_name.as_deref())
    }

    /// Reads this field from `record`.
    pub fn read(&self, record: &R) -> Cell {
        (self.accessor)(record)
    }

    /// Metadata of this column without its accessor.
    pub fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            index: self.index,
            included: !self.ignored,
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("index", &self.index)
            .field("ignored", &self.ignored)
            .finish_non_exhaustive()
    }
}

/// Column metadata detached from any record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field identifier.
    pub id: String,
    /// Header label override.
    pub display_name: Option<String>,
    /// Explicit position; `None` sorts after every explicit position.
    pub index: Option<i32>,
    /// False when the field is marked ignored.
    pub included: bool,
}

impl FieldDescriptor {
    /// Header label, resolved the same way as [`Column::label`].
    pub fn label(&self) -> &str {
        resolve_label(&self.id, self.display_name.as_deref())
    }
}

fn resolve_label<'a>(id: &'a str, display_name: Option<&'a str>) -> &'a str {
    match display_name {
        Some(name) if !name.is_empty() => name,
        _ => id,
    }
}

/// A type whose values can be serialized as CSV rows.
///
/// # Example
///
/// ```
/// use record_csv::csv_handler::{Column, Record};
///
/// struct Person {
///     id: u32,
///     name: String,
///     password: String,
/// }
///
/// impl Record for Person {
///     fn columns() -> Vec<Column<Self>> {
///         vec![
///             Column::new("id", |p: &Person| p.id),
///             Column::new("name", |p: &Person| p.name.clone()).named("Full name"),
///             Column::new("password", |p: &Person| p.password.clone()).ignore(),
///         ]
///     }
/// }
/// ```
pub trait Record: Sized {
    /// Declared fields in declaration order.
    fn columns() -> Vec<Column<Self>>;

    /// Runtime type of this record. All records serialized together must agree.
    ///
    /// Defaults to the Rust type name. Enums whose variants are distinct record kinds
    /// override this to report the variant.
    fn record_type(&self) -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }
}
