//! Column type inference for CSV tables.
//!
//! Each column is classified from its non-empty cells, then mapped onto one of
//! the three storage types. Per-table overrides replace the inferred type.

use anyhow::{ensure, Result};

/// What the cells of a column look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnKind {
    pub fn classify(cell: &str) -> Self {
        if cell.parse::<i64>().is_ok() {
            Self::Integer
        } else if parse_bool(cell).is_some() {
            Self::Boolean
        } else if parse_float(cell).is_some() {
            Self::Float
        } else {
            Self::Text
        }
    }

    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (Self::Integer, Self::Float) | (Self::Float, Self::Integer) => Self::Float,
            _ => Self::Text,
        }
    }
}

/// Destination column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Real,
    Text,
}

impl From<ColumnKind> for SqlType {
    fn from(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Integer | ColumnKind::Boolean => Self::Integer,
            ColumnKind::Float => Self::Real,
            ColumnKind::Text => Self::Text,
        }
    }
}

/// How one CSV file becomes one table.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub primary_key: &'static str,
    pub overrides: &'static [(&'static str, SqlType)],
}

impl TableSpec {
    pub fn override_for(&self, column: &str) -> Option<SqlType> {
        self.overrides
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, sql_type)| *sql_type)
    }
}

pub const TABLE_SPECS: &[TableSpec] = &[
    TableSpec {
        name: "users",
        primary_key: "user_id",
        overrides: &[
            ("phone", SqlType::Text),
            ("postal_code", SqlType::Text),
            ("date_joined", SqlType::Text),
            ("is_active", SqlType::Integer),
        ],
    },
    TableSpec {
        name: "products",
        primary_key: "product_id",
        overrides: &[("created_at", SqlType::Text), ("is_active", SqlType::Integer)],
    },
    TableSpec {
        name: "orders",
        primary_key: "order_id",
        overrides: &[
            ("order_date", SqlType::Text),
            ("ship_date", SqlType::Text),
            ("shipping_postal_code", SqlType::Text),
        ],
    },
    TableSpec {
        name: "order_items",
        primary_key: "order_item_id",
        overrides: &[],
    },
    TableSpec {
        name: "payments",
        primary_key: "payment_id",
        overrides: &[("payment_date", SqlType::Text)],
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub sql_type: SqlType,
    pub primary_key: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<ColumnSchema>,
}

/// Empty cells carry no type information; an all-empty column is text.
pub fn infer_kind<'a, I>(cells: I) -> ColumnKind
where
    I: IntoIterator<Item = &'a str>,
{
    cells
        .into_iter()
        .filter(|cell| !cell.is_empty())
        .map(ColumnKind::classify)
        .reduce(ColumnKind::merge)
        .unwrap_or(ColumnKind::Text)
}

pub fn infer_type<'a, I>(cells: I) -> SqlType
where
    I: IntoIterator<Item = &'a str>,
{
    infer_kind(cells).into()
}

pub fn table_schema(
    spec: &TableSpec,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<TableSchema> {
    ensure!(!headers.is_empty(), "table '{}' has no columns", spec.name);
    ensure!(
        headers.iter().any(|header| header == spec.primary_key),
        "table '{}' has no primary key column '{}'",
        spec.name,
        spec.primary_key
    );
    let columns = headers
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let sql_type = spec.override_for(name).unwrap_or_else(|| {
                infer_type(rows.iter().map(|row| row.get(index).map_or("", String::as_str)))
            });
            ColumnSchema {
                name: name.clone(),
                sql_type,
                primary_key: name == spec.primary_key,
            }
        })
        .collect();
    Ok(TableSchema {
        table: spec.name.to_owned(),
        columns,
    })
}

pub fn parse_bool(cell: &str) -> Option<bool> {
    match cell {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Rejects the textual specials (`inf`, `NaN`) `f64::from_str` accepts.
pub fn parse_float(cell: &str) -> Option<f64> {
    if !cell.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    cell.parse::<f64>().ok()
}
