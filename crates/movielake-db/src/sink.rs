//! Postgres implementation of the [`TableSink`] contract.
//!
//! Output tables have partly data-driven shapes (structured dimensions grow
//! a column per entity attribute seen in the batch), so writes are built
//! dynamically: overwrite drops and recreates the table from the incoming
//! column definitions, append creates it only if absent. Each table write
//! runs in its own transaction; there is no cross-table rollback.

use movielake_core::{CellValue, ColumnType, TableData, TableSink, WriteMode};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::DbError;

/// Postgres bind-parameter hard limit is u16; stay under it per statement.
const MAX_BIND_PARAMS: usize = 60_000;

pub struct PgTableSink {
    pool: PgPool,
}

impl PgTableSink {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TableSink for PgTableSink {
    type Error = DbError;

    async fn write_table(&self, table: &TableData, mode: WriteMode) -> Result<(), DbError> {
        validate_table(table)?;

        let mut tx = self.pool.begin().await?;

        match mode {
            WriteMode::Overwrite => {
                sqlx::query(&format!("DROP TABLE IF EXISTS {}", quote(&table.name)))
                    .execute(&mut *tx)
                    .await?;
                sqlx::query(&create_table_sql(table, false))
                    .execute(&mut *tx)
                    .await?;
            }
            WriteMode::Append => {
                sqlx::query(&create_table_sql(table, true))
                    .execute(&mut *tx)
                    .await?;
            }
        }

        for chunk in table.rows.chunks(rows_per_statement(table.columns.len())) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(insert_prefix(table));
            builder.push_values(chunk, |mut b, row| {
                for (cell, column) in row.iter().zip(&table.columns) {
                    match cell {
                        CellValue::Text(s) => b.push_bind(s.clone()),
                        CellValue::BigInt(i) => b.push_bind(*i),
                        CellValue::Double(f) => b.push_bind(*f),
                        CellValue::Date(d) => b.push_bind(*d),
                        CellValue::Null => match column.ty {
                            ColumnType::Text => b.push_bind(None::<String>),
                            ColumnType::BigInt => b.push_bind(None::<i64>),
                            ColumnType::Double => b.push_bind(None::<f64>),
                            ColumnType::Date => b.push_bind(None::<chrono::NaiveDate>),
                        },
                    };
                }
            });
            builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;

        tracing::info!(
            table = %table.name,
            rows = table.rows.len(),
            mode = ?mode,
            "table written"
        );
        Ok(())
    }
}

/// Accepts only `[A-Za-z_][A-Za-z0-9_]*` — everything the normalizer names
/// today, and nothing that could smuggle SQL through a dynamic statement.
fn is_safe_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_table(table: &TableData) -> Result<(), DbError> {
    if table.columns.is_empty() {
        return Err(DbError::NoColumns(table.name.clone()));
    }
    if !is_safe_identifier(&table.name) {
        return Err(DbError::InvalidIdentifier(table.name.clone()));
    }
    for column in &table.columns {
        if !is_safe_identifier(&column.name) {
            return Err(DbError::InvalidIdentifier(column.name.clone()));
        }
    }
    Ok(())
}

/// Double-quotes a validated identifier so mixed-case table names like
/// `DimContent` survive Postgres case folding.
fn quote(identifier: &str) -> String {
    format!("\"{identifier}\"")
}

fn sql_type(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Text => "TEXT",
        ColumnType::BigInt => "BIGINT",
        ColumnType::Double => "DOUBLE PRECISION",
        ColumnType::Date => "DATE",
    }
}

fn create_table_sql(table: &TableData, if_not_exists: bool) -> String {
    let columns = table
        .columns
        .iter()
        .map(|c| format!("{} {}", quote(&c.name), sql_type(c.ty)))
        .collect::<Vec<_>>()
        .join(", ");
    let clause = if if_not_exists { " IF NOT EXISTS" } else { "" };
    format!("CREATE TABLE{clause} {} ({columns})", quote(&table.name))
}

fn insert_prefix(table: &TableData) -> String {
    let columns = table
        .columns
        .iter()
        .map(|c| quote(&c.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO {} ({columns}) ", quote(&table.name))
}

fn rows_per_statement(column_count: usize) -> usize {
    (MAX_BIND_PARAMS / column_count.max(1)).clamp(1, 1_000)
}
