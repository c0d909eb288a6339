//! In-memory column table loaded from delimited text.
//!
//! Strategy: read all cells as strings, then type each column by attempting
//! numeric parsing. Columns where every non-empty cell parses as f64 become
//! Float; everything else stays Str. Empty cells are missing values in both.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One typed column. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Numeric column.
    Float(Vec<Option<f64>>),
    /// Text column.
    Str(Vec<Option<String>>),
}

impl Column {
    pub fn dtype(&self) -> &'static str {
        match self {
            Column::Float(_) => "float64",
            Column::Str(_) => "str",
        }
    }

    pub fn null_count(&self) -> usize {
        match self {
            Column::Float(v) => v.iter().filter(|c| c.is_none()).count(),
            Column::Str(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    fn cell_text(&self, row: usize) -> String {
        match self {
            Column::Float(v) => v[row].map_or("NA".to_string(), |x| format!("{x}")),
            Column::Str(v) => v[row].clone().unwrap_or_else(|| "NA".to_string()),
        }
    }

    fn is_null(&self, row: usize) -> bool {
        match self {
            Column::Float(v) => v[row].is_none(),
            Column::Str(v) => v[row].is_none(),
        }
    }
}

/// Immutable rectangular table. Cleaning operations return a new table.
#[derive(Debug, Clone)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Name/column pairs in table order.
    pub fn columns(&self) -> impl Iterator<Item = (&String, &Column)> {
        self.names.iter().zip(&self.columns)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        let idx = self
            .names
            .iter()
            .position(|n| n == name)
            .with_context(|| format!("column '{}' not found — available: {:?}", name, self.names))?;
        Ok(&self.columns[idx])
    }

    /// Read a CSV/TSV file; delimiter picked from the extension.
    pub fn read_csv(path: &PathBuf) -> Result<Table> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();
        let delimiter = if ext == "tsv" { b'\t' } else { b',' };

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let names: Vec<String> =
            rdr.headers().context("failed to read CSV headers")?.iter().map(String::from).collect();
        if names.is_empty() {
            anyhow::bail!("CSV file has no columns");
        }

        let n_cols = names.len();
        let mut raw: Vec<Vec<String>> = vec![Vec::new(); n_cols];
        for result in rdr.records() {
            let record = result.context("failed to read CSV row")?;
            for (j, field) in record.iter().enumerate() {
                if j < n_cols {
                    raw[j].push(field.trim().to_string());
                }
            }
        }
        if raw[0].is_empty() {
            anyhow::bail!("CSV file contains no data rows");
        }
        let n_rows = raw[0].len();

        let columns = raw
            .into_iter()
            .map(|cells| {
                let all_numeric = cells.iter().all(|s| s.is_empty() || s.parse::<f64>().is_ok());
                let any_numeric = cells.iter().any(|s| s.parse::<f64>().is_ok());
                if all_numeric && any_numeric {
                    Column::Float(
                        cells
                            .iter()
                            .map(|s| if s.is_empty() { None } else { s.parse::<f64>().ok() })
                            .collect(),
                    )
                } else {
                    Column::Str(
                        cells
                            .into_iter()
                            .map(|s| if s.is_empty() { None } else { Some(s) })
                            .collect(),
                    )
                }
            })
            .collect();

        Ok(Table { names, columns, n_rows })
    }

    /// New table keeping only rows with no missing cell in any column.
    pub fn drop_nulls(&self) -> Table {
        let keep: Vec<usize> = (0..self.n_rows)
            .filter(|&i| self.columns.iter().all(|c| !c.is_null(i)))
            .collect();

        let columns = self
            .columns
            .iter()
            .map(|c| match c {
                Column::Float(v) => Column::Float(keep.iter().map(|&i| v[i]).collect()),
                Column::Str(v) => Column::Str(keep.iter().map(|&i| v[i].clone()).collect()),
            })
            .collect();

        Table { names: self.names.clone(), columns, n_rows: keep.len() }
    }

    /// Missing-cell count per column, in column order.
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(n, c)| (n.clone(), c.null_count()))
            .collect()
    }

    /// Split a numeric column by the levels of a categorical column.
    ///
    /// Rows where either cell is missing are skipped. Levels come back in
    /// sorted label order so output is deterministic.
    pub fn numeric_by_group(&self, group_col: &str, value_col: &str) -> Result<Vec<(String, Vec<f64>)>> {
        let labels = match self.column(group_col)? {
            Column::Str(v) => v.clone(),
            Column::Float(v) => v
                .iter()
                .map(|c| c.map(|x| format!("{x}")))
                .collect(),
        };
        let values = match self.column(value_col)? {
            Column::Float(v) => v,
            Column::Str(_) => {
                anyhow::bail!("column '{}' is not numeric", value_col)
            }
        };

        let mut by_level: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (label, value) in labels.iter().zip(values) {
            if let (Some(l), Some(x)) = (label, value) {
                by_level.entry(l.clone()).or_default().push(*x);
            }
        }
        if by_level.is_empty() {
            anyhow::bail!(
                "no complete rows for group '{}' and value '{}'",
                group_col,
                value_col
            );
        }
        Ok(by_level.into_iter().collect())
    }

    /// First `n` rows rendered as aligned text.
    pub fn head_text(&self, n: usize) -> String {
        let n = n.min(self.n_rows);
        let mut cells: Vec<Vec<String>> = vec![self.names.clone()];
        for i in 0..n {
            cells.push(self.columns.iter().map(|c| c.cell_text(i)).collect());
        }
        let widths: Vec<usize> = (0..self.n_cols())
            .map(|j| cells.iter().map(|row| row[j].len()).max().unwrap_or(0))
            .collect();
        cells
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&widths)
                    .map(|(cell, w)| format!("{cell:>w$}"))
                    .collect::<Vec<_>>()
                    .join("  ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
