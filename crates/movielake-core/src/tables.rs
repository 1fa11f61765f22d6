//! Generic table shapes handed to a [`TableSink`].
//!
//! The normalizer produces tables whose column sets are partly data-driven
//! (structured dimension columns are the union of entity attributes seen in
//! the batch), so the sink contract works on a dynamic `TableData` rather
//! than one row struct per table.

use chrono::NaiveDate;

/// Declared type of an output column. Drives both DDL and the null policy:
/// text columns carry `""` for missing values, the others carry NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    BigInt,
    Double,
    Date,
}

#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: String,
    pub ty: ColumnType,
}

impl ColumnDef {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A single cell. `Null` is only ever produced for non-text columns.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    BigInt(i64),
    Double(f64),
    Date(NaiveDate),
    Null,
}

impl From<Option<i64>> for CellValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(CellValue::Null, CellValue::BigInt)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(CellValue::Null, CellValue::Double)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// A named table ready for persistence: column definitions plus rows of
/// cells, one cell per column in declaration order.
#[derive(Debug, Clone)]
pub struct TableData {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<Vec<CellValue>>,
}

impl TableData {
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    ///
    /// # Panics
    ///
    /// Panics if the row length does not match the column count; producers
    /// build rows positionally from the same column list, so a mismatch is a
    /// programming error, not a data error.
    pub fn push_row(&mut self, row: Vec<CellValue>) {
        assert_eq!(
            row.len(),
            self.columns.len(),
            "row width {} does not match column count {} for table {}",
            row.len(),
            self.columns.len(),
            self.name
        );
        self.rows.push(row);
    }
}

/// How a table write treats existing data.
///
/// Dimension, bridge, and content tables are rebuilt wholesale each run
/// (`Overwrite`); the popularity fact accumulates across runs (`Append`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Overwrite,
    Append,
}

/// Abstract persistence seam. The pipeline only ever sees this contract;
/// storage specifics live behind it.
pub trait TableSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn write_table(
        &self,
        table: &TableData,
        mode: WriteMode,
    ) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send;
}
