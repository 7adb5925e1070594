//! Diff-to-SQL generation
//!
//! Renders a [`SchemaDiff`] into a PostgreSQL-flavored migration script.
//! Rendering is pure and deterministic: the same diff always yields
//! byte-identical output, statements follow diff order exactly, and nothing
//! is validated. Malformed or contradictory diffs are rendered as written.
//!
//! Column drops are never emitted as live statements. They are written as a
//! commented-out `ALTER TABLE ... DROP COLUMN` preceded by a safeguard
//! warning, so data loss always requires a manual edit of the migration.

use crate::diff::{
    AlterTable, Column, ColumnModification, CreateTable, DefaultChange, DiffEntry, ForeignKey,
    SchemaDiff, TableChange,
};
use crate::sql_utils::{quote_ident, quote_ident_list};

/// Separator between rendered statements.
pub const STATEMENT_SEPARATOR: &str = "\n\n";

/// Warning emitted in front of every commented-out column drop.
pub const DROP_COLUMN_SAFEGUARD: &str =
    "-- SAFEGUARD: The following line drops data. Uncomment to execute.";

/// Render the whole diff as a single SQL script.
pub fn generate(diff: &SchemaDiff) -> String {
    statements(diff).join(STATEMENT_SEPARATOR)
}

/// Render the diff as an ordered list of statements (and comment blocks).
pub fn statements(diff: &SchemaDiff) -> Vec<String> {
    let mut out = Vec::new();
    for entry in diff {
        match entry {
            DiffEntry::CreateTable(table) => out.push(create_table(table)),
            DiffEntry::DropTable(name) => {
                out.push(format!("DROP TABLE IF EXISTS {};", quote_ident(name)))
            }
            DiffEntry::AlterTable(alter) => alter_table(alter, &mut out),
        }
    }
    out
}

fn create_table(table: &CreateTable) -> String {
    let mut defs: Vec<String> = table
        .columns
        .iter()
        .map(|col| format!("  {}", column_definition(col)))
        .collect();

    // Additive to any per-column PRIMARY KEY flags.
    if !table.primary_key_columns.is_empty() {
        defs.push(format!(
            "  PRIMARY KEY {}",
            quote_ident_list(&table.primary_key_columns[..])
        ));
    }

    format!(
        "CREATE TABLE {} (\n{}\n);",
        quote_ident(&table.table),
        defs.join(",\n")
    )
}

/// Column definition inside `CREATE TABLE`.
fn column_definition(col: &Column) -> String {
    let mut def = format!("{} {}", quote_ident(&col.name), col.data_type);
    if !col.nullable {
        def.push_str(" NOT NULL");
    }
    if let Some(default) = col.default_expr() {
        def.push_str(" DEFAULT ");
        def.push_str(default);
    }
    if col.primary_key {
        def.push_str(" PRIMARY KEY");
    }
    if col.unique {
        def.push_str(" UNIQUE");
    }
    if let Some(fk) = &col.references {
        def.push_str(&references_clause(fk, true));
    }
    def
}

/// Column definition inside `ALTER TABLE ... ADD COLUMN`.
///
/// Only nullability, default, and the foreign key target are rendered here.
/// `ON DELETE` is deliberately left out for added columns.
fn added_column_definition(col: &Column) -> String {
    let mut def = format!("{} {}", quote_ident(&col.name), col.data_type);
    if !col.nullable {
        def.push_str(" NOT NULL");
    }
    if let Some(default) = col.default_expr() {
        def.push_str(" DEFAULT ");
        def.push_str(default);
    }
    if let Some(fk) = &col.references {
        def.push_str(&references_clause(fk, false));
    }
    def
}

fn references_clause(fk: &ForeignKey, with_on_delete: bool) -> String {
    let mut clause = format!(" REFERENCES {}", quote_ident(&fk.table));
    if let Some(column) = &fk.column {
        clause.push_str(&quote_ident_list(&[column]));
    }
    if with_on_delete {
        if let Some(action) = &fk.on_delete {
            clause.push_str(" ON DELETE ");
            clause.push_str(action);
        }
    }
    clause
}

fn alter_table(alter: &AlterTable, out: &mut Vec<String>) {
    let table = quote_ident(&alter.table);
    for change in &alter.changes {
        match change {
            TableChange::AddColumn(col) => out.push(format!(
                "ALTER TABLE {} ADD COLUMN {};",
                table,
                added_column_definition(col)
            )),
            TableChange::DropColumn(name) => {
                out.push(DROP_COLUMN_SAFEGUARD.to_string());
                out.push(format!(
                    "-- ALTER TABLE {} DROP COLUMN {};",
                    table,
                    quote_ident(name)
                ));
            }
            TableChange::ModifyColumn(modification) => {
                modify_column(&table, modification, out);
            }
        }
    }
}

/// Up to three statements, always in type, nullability, default order.
fn modify_column(table: &str, modification: &ColumnModification, out: &mut Vec<String>) {
    let prefix = format!(
        "ALTER TABLE {} ALTER COLUMN {}",
        table,
        quote_ident(&modification.name)
    );

    if let Some(data_type) = modification.changed_type() {
        out.push(format!("{} TYPE {};", prefix, data_type));
    }
    if let Some(nullable) = modification.nullable_changed {
        let action = if nullable { "DROP NOT NULL" } else { "SET NOT NULL" };
        out.push(format!("{} {};", prefix, action));
    }
    match &modification.default_changed {
        Some(DefaultChange::Set(value)) => out.push(format!("{} SET DEFAULT {};", prefix, value)),
        Some(DefaultChange::Drop) => out.push(format!("{} DROP DEFAULT;", prefix)),
        None => {}
    }
}

#[cfg(test)]
#[path = "sql_gen_test.rs"]
mod tests;
