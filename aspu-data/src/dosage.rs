//! Sample-by-SNP dosage table.
//!
//! Header: a sample ID column followed by one column per SNP ID. Each
//! record holds one sample's dosages (0..2, NA for missing).

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::table::{parse_value, Table};

#[derive(Debug, Clone)]
pub struct DosageTable {
    pub sample_ids: Vec<String>,
    pub snp_ids: Vec<String>,
    /// columns[j][i] = dosage of SNP j for sample i (NaN if missing).
    pub columns: Vec<Vec<f64>>,
}

impl DosageTable {
    pub fn from_table(table: &Table) -> Result<Self> {
        if table.headers.len() < 2 {
            bail!("Dosage table needs a sample column and at least one SNP column");
        }
        let columns = (1..table.headers.len())
            .map(|j| table.values(j).map(parse_value).collect())
            .collect();
        Ok(Self {
            sample_ids: table.values(0).map(str::to_string).collect(),
            snp_ids: table.headers[1..].to_vec(),
            columns,
        })
    }

    pub fn read(path: &Path) -> Result<Self> {
        let dosages = Self::from_table(&Table::read(path)?)
            .with_context(|| format!("Failed to parse dosage file: {}", path.display()))?;
        info!(
            "Read dosages for {} samples x {} SNPs from {}",
            dosages.n_samples(),
            dosages.n_snps(),
            path.display()
        );
        Ok(dosages)
    }

    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    pub fn n_snps(&self) -> usize {
        self.snp_ids.len()
    }

    /// Column `j` restricted to `rows`, missing values replaced by the
    /// mean of the observed ones (0 if none are observed).
    pub fn imputed_column(&self, j: usize, rows: &[usize]) -> Vec<f64> {
        let mut values: Vec<f64> = rows.iter().map(|&i| self.columns[j][i]).collect();
        impute_missing_mean(&mut values);
        values
    }
}

/// Replace NaN entries with the mean of the finite ones.
pub fn impute_missing_mean(dosages: &mut [f64]) -> usize {
    let (sum, n) = dosages
        .iter()
        .filter(|d| !d.is_nan())
        .fold((0.0, 0usize), |(s, n), d| (s + d, n + 1));
    let fill = if n > 0 { sum / n as f64 } else { 0.0 };
    let missing = dosages.len() - n;
    for d in dosages.iter_mut().filter(|d| d.is_nan()) {
        *d = fill;
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_dosages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geno.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "IID rs1 rs2").unwrap();
        writeln!(f, "S1 0 2").unwrap();
        writeln!(f, "S2 1 NA").unwrap();
        writeln!(f, "S3 2 1").unwrap();

        let d = DosageTable::read(&path).unwrap();
        assert_eq!(d.n_samples(), 3);
        assert_eq!(d.snp_ids, vec!["rs1", "rs2"]);
        assert_eq!(d.columns[0], vec![0.0, 1.0, 2.0]);
        assert!(d.columns[1][1].is_nan());
        assert_eq!(d.imputed_column(1, &[0, 1, 2]), vec![2.0, 1.5, 1.0]);
        assert_eq!(d.imputed_column(1, &[1]), vec![0.0]);
    }

    #[test]
    fn test_impute_counts_missing() {
        let mut v = vec![f64::NAN, 1.0, 3.0, f64::NAN];
        assert_eq!(impute_missing_mean(&mut v), 2);
        assert_eq!(v, vec![2.0, 1.0, 3.0, 2.0]);
    }

    #[test]
    fn test_sample_column_only_rejected() {
        let t = Table::parse("IID\nS1\n").unwrap();
        assert!(DosageTable::from_table(&t).is_err());
    }
}
