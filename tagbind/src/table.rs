//! Conversion of fixture tables into maps, columns and structs.
//!
//! Every binder is all-or-nothing: it returns a fully built result or an
//! error, never a half-populated value. Cells are passed through the
//! [`Resolver`] before they are stored or converted.

use std::collections::BTreeMap;

use crate::convert::FromFixture;
use crate::{BindError, BindResult, Bindable, Resolver, Value};

/// Ordered rows of string cells, as supplied by a Gherkin data table.
///
/// ```rust
/// use tagbind::Table;
///
/// let table = Table::from_rows(&[&["name", "alice"], &["role", "admin"]]);
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.rows()[1][0], "role");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Wrap owned rows.
    #[must_use]
    pub const fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Build a table from borrowed cells.
    #[must_use]
    pub fn from_rows(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| (*cell).to_owned()).collect())
                .collect(),
        )
    }

    /// Borrow the rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows, header included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Vec<String>>> for Table {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

/// Split a two-column row into its key and value cells.
fn pair(row_index: usize, row: &[String]) -> BindResult<(&str, &str)> {
    match row {
        [key, value] => Ok((key.as_str(), value.as_str())),
        _ => Err(BindError::TableShape {
            row: row_index,
            expected: 2,
            found: row.len(),
        }),
    }
}

/// Convert a two-column table into a map of resolved values.
///
/// Keys are used verbatim; a repeated key keeps its last value.
///
/// # Errors
///
/// Returns [`BindError::TableShape`] when a row does not have exactly two
/// cells.
pub fn to_map(resolver: &Resolver<'_>, table: &Table) -> BindResult<BTreeMap<String, Value>> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let (key, value) = pair(idx, row)?;
            Ok((key.to_owned(), resolver.resolve(value)))
        })
        .collect()
}

/// Convert a two-column table into a map of string lists.
///
/// Both cells are resolved to strings. Repeated keys accumulate their
/// values in row order, which suits multi-valued headers or query
/// parameters.
///
/// # Errors
///
/// Returns [`BindError::TableShape`] when a row does not have exactly two
/// cells.
pub fn to_multi_map(
    resolver: &Resolver<'_>,
    table: &Table,
) -> BindResult<BTreeMap<String, Vec<String>>> {
    let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let (key, value) = pair(idx, row)?;
        out.entry(resolver.resolve_as_string(key))
            .or_default()
            .push(resolver.resolve_as_string(value));
    }
    Ok(out)
}

/// Convert a single-column table into its resolved cells.
///
/// # Errors
///
/// Returns [`BindError::TableShape`] when a row does not have exactly one
/// cell.
pub fn to_column(resolver: &Resolver<'_>, table: &Table) -> BindResult<Vec<Value>> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| match row.as_slice() {
            [cell] => Ok(resolver.resolve(cell)),
            _ => Err(BindError::TableShape {
                row: idx,
                expected: 1,
                found: row.len(),
            }),
        })
        .collect()
}

/// Convert a table whose first row names the fields into one `T` per data
/// row, in row order.
///
/// A table holding only the header yields an empty vector.
///
/// # Errors
///
/// Returns [`BindError::TableShape`] when the table has no header row or a
/// data row's width differs from the header, and propagates field lookup
/// and conversion failures.
pub fn to_struct_slice<T>(resolver: &Resolver<'_>, table: &Table) -> BindResult<Vec<T>>
where
    T: Bindable + Default,
{
    let Some((header, rows)) = table.rows.split_first() else {
        return Err(BindError::TableShape {
            row: 0,
            expected: 1,
            found: 0,
        });
    };
    rows.iter()
        .enumerate()
        .map(|(offset, row)| {
            if row.len() != header.len() {
                return Err(BindError::TableShape {
                    row: offset + 1,
                    expected: header.len(),
                    found: row.len(),
                });
            }
            let mut item = T::default();
            for (name, cell) in header.iter().zip(row) {
                assign(resolver, &mut item, name, cell)?;
            }
            Ok(item)
        })
        .collect()
}

/// Convert a header-less table of `(field, value)` rows into a new `T`.
///
/// # Errors
///
/// Returns [`BindError::TableShape`] when a row does not have exactly two
/// cells, and propagates field lookup and conversion failures.
pub fn to_struct<T>(resolver: &Resolver<'_>, table: &Table) -> BindResult<T>
where
    T: Bindable + Default,
{
    let mut target = T::default();
    apply_pairs(resolver, table, &mut target)?;
    Ok(target)
}

/// Apply a header-less table of `(field, value)` rows to an existing value.
///
/// The rows are applied to a copy; `target` is only replaced once every row
/// has been bound successfully.
///
/// # Errors
///
/// Same as [`to_struct`]. On error `target` is left unchanged.
pub fn update_struct<T>(resolver: &Resolver<'_>, table: &Table, target: &mut T) -> BindResult<()>
where
    T: Bindable + Clone,
{
    let mut staged = target.clone();
    apply_pairs(resolver, table, &mut staged)?;
    *target = staged;
    Ok(())
}

fn apply_pairs<T: Bindable>(
    resolver: &Resolver<'_>,
    table: &Table,
    target: &mut T,
) -> BindResult<()> {
    for (idx, row) in table.rows.iter().enumerate() {
        let (name, cell) = pair(idx, row)?;
        assign(resolver, target, name, cell)?;
    }
    Ok(())
}

fn assign<T: Bindable>(
    resolver: &Resolver<'_>,
    target: &mut T,
    name: &str,
    cell: &str,
) -> BindResult<()> {
    let value = resolver.resolve(cell);
    tracing::debug!(
        field = name,
        target_type = T::target_name(),
        kind = value.kind(),
        "binding fixture cell"
    );
    target.bind(name, &value)
}

/// Convert `value` and store it in `slot`, attaching field context to
/// conversion failures.
///
/// Called by `#[derive(Bindable)]` expansions.
///
/// # Errors
///
/// Returns [`BindError::Field`] wrapping the converter's error.
pub fn bind_field<F: FromFixture>(
    slot: &mut F,
    field: &str,
    target: &str,
    value: &Value,
) -> BindResult<()> {
    *slot = F::from_fixture(value).map_err(|err| err.in_field(field, target))?;
    Ok(())
}
