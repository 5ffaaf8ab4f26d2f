use crate::infer::{
    parse_bool, parse_float, table_schema, SqlType, TableSchema, TableSpec, TABLE_SPECS,
};
use anyhow::{anyhow, Context, Result};
use sea_orm::sea_query::{Alias, ColumnDef, Query, Table, TableCreateStatement};
use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, TransactionTrait, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Data directory not found: {}", .0.display())]
    DataDirNotFound(PathBuf),

    #[error("Missing CSV file: {}", .0.display())]
    MissingCsv(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub batch_size: usize,
}

impl From<&super::Args> for Config {
    fn from(args: &super::Args) -> Self {
        Self {
            data_dir: args.data_dir.clone(),
            batch_size: match args.command {
                super::SubCommandArgs::Load { batch_size } => batch_size,
                super::SubCommandArgs::Generate { .. } => unreachable!(),
            },
        }
    }
}

/// A CSV file with trimmed header names.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: String,
    pub rows: usize,
}

/// Replaces one table per entry of [`TABLE_SPECS`] inside a single transaction.
///
/// Nothing is committed unless every table loads, so a failure leaves the
/// database exactly as it was.
pub async fn execute<T: Into<Config>>(
    db: &DatabaseConnection,
    config: T,
) -> Result<Vec<LoadedTable>> {
    execute_specs(db, &config.into(), TABLE_SPECS).await
}

pub async fn execute_specs(
    db: &DatabaseConnection,
    config: &Config,
    specs: &[TableSpec],
) -> Result<Vec<LoadedTable>> {
    if !config.data_dir.is_dir() {
        return Err(LoadError::DataDirNotFound(config.data_dir.clone()).into());
    }
    let txn = db.begin().await.context("Failed to begin transaction")?;
    match load_tables(&txn, config, specs).await {
        Ok(loaded) => {
            txn.commit().await.context("Failed to commit")?;
            info!(tables = loaded.len(), "load committed");
            Ok(loaded)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                error!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

async fn load_tables(
    txn: &DatabaseTransaction,
    config: &Config,
    specs: &[TableSpec],
) -> Result<Vec<LoadedTable>> {
    let mut loaded = Vec::with_capacity(specs.len());
    for spec in specs {
        let rows = load_table(txn, config, spec)
            .await
            .with_context(|| format!("Failed to load table '{}'", spec.name))?;
        println!("Inserted {} rows into '{}'.", rows, spec.name);
        loaded.push(LoadedTable {
            table: spec.name.to_owned(),
            rows,
        });
    }
    Ok(loaded)
}

pub fn read_csv(dir: &Path, table: &str) -> Result<CsvTable> {
    let path = dir.join(format!("{table}.csv"));
    if !path.is_file() {
        return Err(LoadError::MissingCsv(path).into());
    }
    let mut reader = csv::Reader::from_path(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let headers = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_owned())
        .collect();
    let rows = reader
        .records()
        .map(|record| record.map(|record| record.iter().map(str::to_owned).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(CsvTable { headers, rows })
}

async fn load_table(
    txn: &DatabaseTransaction,
    config: &Config,
    spec: &TableSpec,
) -> Result<usize> {
    let csv = read_csv(&config.data_dir, spec.name)?;
    let schema = table_schema(spec, &csv.headers, &csv.rows)?;
    debug!(table = spec.name, columns = ?schema.columns, "schema inferred");

    let backend = txn.get_database_backend();
    let mut drop_stmt = Table::drop();
    drop_stmt.table(Alias::new(spec.name)).if_exists();
    txn.execute(backend.build(&drop_stmt)).await?;
    txn.execute(backend.build(&create_statement(&schema))).await?;

    for chunk in csv.rows.chunks(config.batch_size.max(1)) {
        let mut insert = Query::insert();
        insert
            .into_table(Alias::new(spec.name))
            .columns(schema.columns.iter().map(|column| Alias::new(&column.name)));
        for row in chunk {
            let values = schema
                .columns
                .iter()
                .zip(row)
                .map(|(column, cell)| coerce(column.sql_type, cell));
            insert
                .values(values.map(Into::into))
                .map_err(|err| anyhow!("invalid row for '{}': {err:?}", spec.name))?;
        }
        txn.execute(backend.build(&insert)).await?;
    }
    debug!(table = spec.name, rows = csv.rows.len(), "rows inserted");
    Ok(csv.rows.len())
}

pub fn create_statement(schema: &TableSchema) -> TableCreateStatement {
    let mut create = Table::create();
    create.table(Alias::new(&schema.table));
    for column in &schema.columns {
        let mut def = ColumnDef::new(Alias::new(&column.name));
        match column.sql_type {
            SqlType::Integer => def.big_integer(),
            SqlType::Real => def.double(),
            SqlType::Text => def.text(),
        };
        if column.primary_key {
            def.primary_key();
        }
        create.col(&mut def);
    }
    create
}

/// Cells that do not fit their column type are kept as text.
pub fn coerce(sql_type: SqlType, cell: &str) -> Value {
    if cell.is_empty() {
        return match sql_type {
            SqlType::Integer => Value::BigInt(None),
            SqlType::Real => Value::Double(None),
            SqlType::Text => Value::String(None),
        };
    }
    match sql_type {
        SqlType::Integer => match (cell.parse::<i64>(), parse_bool(cell)) {
            (Ok(number), _) => number.into(),
            (Err(_), Some(flag)) => i64::from(flag).into(),
            (Err(_), None) => cell.to_owned().into(),
        },
        SqlType::Real => match parse_float(cell) {
            Some(number) => number.into(),
            None => cell.to_owned().into(),
        },
        SqlType::Text => cell.to_owned().into(),
    }
}
