//! Delimited text tables.
//!
//! All input files share one layout: a header line naming the columns,
//! then one record per line. Fields are split on tabs when the header
//! contains one, otherwise on runs of whitespace.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};

/// Header plus string records of a delimited file.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read table: {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Malformed table: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let mut lines = contents.lines().filter(|l| !l.trim().is_empty());
        let header_line = lines.next().ok_or_else(|| anyhow!("Empty table"))?;
        let tabbed = header_line.contains('\t');
        let split = |line: &str| -> Vec<String> {
            if tabbed {
                line.split('\t').map(|s| s.trim().to_string()).collect()
            } else {
                line.split_whitespace().map(str::to_string).collect()
            }
        };

        let headers = split(header_line);
        let mut rows = Vec::new();
        for (k, line) in lines.enumerate() {
            let fields = split(line);
            if fields.len() != headers.len() {
                bail!(
                    "Record {} has {} fields, header has {}",
                    k + 1,
                    fields.len(),
                    headers.len()
                );
            }
            rows.push(fields);
        }
        Ok(Self { headers, rows })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Index of the first header matching any of `names`, case-insensitive.
    pub fn column(&self, names: &[&str]) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
            .ok_or_else(|| anyhow!("None of the columns {:?} found in header", names))
    }

    /// All values of one column.
    pub fn values(&self, col: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |r| r[col].as_str())
    }
}

/// Parse a numeric field, treating the usual missing markers as NaN.
pub fn parse_value(s: &str) -> f64 {
    match s {
        "NA" | "na" | "Na" | "." | "" | "-" | "NaN" | "nan" => f64::NAN,
        _ => s.parse().unwrap_or(f64::NAN),
    }
}
