//! Schema diff model
//!
//! A [`SchemaDiff`] is the structured delta the schema engine emits when it
//! compares a stored snapshot with a freshly observed schema. It is pure
//! data: rendering lives in [`crate::sql_gen`].
//!
//! The JSON wire format uses externally tagged objects
//! (`{"create_table": {...}}`, `{"drop_column": "legacy"}`) and every ordered
//! sequence may arrive bare or wrapped as `{"items": [...]}`. Both shapes are
//! normalized here, so nothing downstream ever sees the wrapper.

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::{default_true, ordered_seq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered sequence of structural changes.
///
/// Entry order is significant: the engine emits entries in a dependency-safe
/// order and the generator renders them in exactly that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SchemaDiff {
    entries: Vec<DiffEntry>,
}

impl SchemaDiff {
    /// Create a diff from entries, preserving their order.
    pub fn new(entries: Vec<DiffEntry>) -> Self {
        Self { entries }
    }

    /// Parse a diff document in either the bare or the wrapped list form.
    pub fn from_json(text: &str) -> CoreResult<Self> {
        serde_json::from_str(text).map_err(|e| CoreError::DiffParseError {
            message: e.to_string(),
        })
    }

    /// Entries in source order.
    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the engine found no structural changes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for SchemaDiff {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ordered_seq(deserializer).map(SchemaDiff::new)
    }
}

impl From<Vec<DiffEntry>> for SchemaDiff {
    fn from(entries: Vec<DiffEntry>) -> Self {
        Self::new(entries)
    }
}

impl<'a> IntoIterator for &'a SchemaDiff {
    type Item = &'a DiffEntry;
    type IntoIter = std::slice::Iter<'a, DiffEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// One atomic structural change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffEntry {
    /// A table that exists in the new schema only
    CreateTable(CreateTable),
    /// Name of a table that no longer exists
    DropTable(String),
    /// Column-level changes within one table
    AlterTable(AlterTable),
}

/// Definition of a new table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTable {
    pub table: String,

    /// Owning schema, when the engine reports one. Not rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, deserialize_with = "ordered_seq")]
    pub columns: Vec<Column>,

    /// Columns of a table-level (composite) primary key
    #[serde(default, deserialize_with = "ordered_seq")]
    pub primary_key_columns: Vec<String>,
}

/// Changes to an existing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterTable {
    #[serde(rename = "name")]
    pub table: String,

    #[serde(default, deserialize_with = "ordered_seq")]
    pub changes: Vec<TableChange>,
}

/// A single column-level change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableChange {
    AddColumn(Column),
    /// Name of the column to drop
    DropColumn(String),
    ModifyColumn(ColumnModification),
}

/// Column definition as observed by the schema engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,

    pub data_type: String,

    #[serde(default = "default_true")]
    pub nullable: bool,

    #[serde(default)]
    pub primary_key: bool,

    #[serde(default)]
    pub unique: bool,

    /// Raw SQL literal or expression, rendered verbatim
    #[serde(default)]
    pub default: Option<String>,

    #[serde(default)]
    pub references: Option<ForeignKey>,
}

impl Column {
    /// Create a nullable column with no constraints.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            primary_key: false,
            unique: false,
            default: None,
            references: None,
        }
    }

    /// The default expression, treating an empty string as absent.
    pub fn default_expr(&self) -> Option<&str> {
        self.default.as_deref().filter(|d| !d.is_empty())
    }
}

/// Foreign key target of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    /// Referential action such as `CASCADE`, rendered verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
}

/// Independent modifications to an existing column.
///
/// Any subset of the three fields may be present at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnModification {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_changed: Option<String>,

    /// New nullability: `true` means the column becomes nullable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable_changed: Option<bool>,

    #[serde(
        default,
        deserialize_with = "default_change",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_changed: Option<DefaultChange>,
}

impl ColumnModification {
    /// A modification of `name` with no changes set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_changed: None,
            nullable_changed: None,
            default_changed: None,
        }
    }

    /// The new column type, treating an empty string as unchanged.
    pub fn changed_type(&self) -> Option<&str> {
        self.type_changed.as_deref().filter(|t| !t.is_empty())
    }
}

/// New default for a column.
///
/// On the wire an explicit `null` means [`DefaultChange::Drop`] while an
/// absent field means "unchanged".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultChange {
    /// Raw SQL expression to set as the default
    Set(String),
    /// Remove the default
    Drop,
}

impl Serialize for DefaultChange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DefaultChange::Set(value) => serializer.serialize_str(value),
            DefaultChange::Drop => serializer.serialize_none(),
        }
    }
}

/// Only invoked when the field is present, so `null` maps to `Drop`.
fn default_change<'de, D>(deserializer: D) -> Result<Option<DefaultChange>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(match Option::<String>::deserialize(deserializer)? {
        Some(value) => DefaultChange::Set(value),
        None => DefaultChange::Drop,
    }))
}

#[cfg(test)]
#[path = "diff_test.rs"]
mod tests;
