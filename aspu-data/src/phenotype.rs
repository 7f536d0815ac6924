//! Phenotype and covariate table.
//!
//! One row per sample: an ID column, the phenotype column and any number
//! of covariate columns. Missing markers parse to NaN.

use std::path::Path;

use anyhow::{Context, Result};
use aspu_linalg::DenseMatrix;
use tracing::info;

use crate::table::{parse_value, Table};

#[derive(Debug, Clone)]
pub struct PhenotypeData {
    /// Sample IDs in file order.
    pub sample_ids: Vec<String>,
    /// Phenotype values (NaN for missing).
    pub phenotype: Vec<f64>,
    /// covariates[j][i] = covariate j of sample i.
    pub covariates: Vec<Vec<f64>>,
    pub covariate_names: Vec<String>,
}

impl PhenotypeData {
    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    /// Samples with a phenotype and every covariate present.
    pub fn complete_samples(&self) -> Vec<usize> {
        (0..self.n_samples())
            .filter(|&i| !self.phenotype[i].is_nan())
            .filter(|&i| self.covariates.iter().all(|c| !c[i].is_nan()))
            .collect()
    }

    /// Covariate matrix restricted to `rows`; `None` without covariates.
    pub fn covariate_matrix(&self, rows: &[usize]) -> Option<DenseMatrix> {
        if self.covariates.is_empty() {
            return None;
        }
        let columns: Vec<Vec<f64>> = self
            .covariates
            .iter()
            .map(|c| rows.iter().map(|&i| c[i]).collect())
            .collect();
        Some(DenseMatrix::from_columns(&columns))
    }
}

pub fn phenotype_from_table(
    table: &Table,
    pheno_col: &str,
    covar_cols: &[String],
    sample_id_col: &str,
) -> Result<PhenotypeData> {
    let id_idx = table.column(&[sample_id_col])?;
    let pheno_idx = table.column(&[pheno_col])?;
    let covar_indices = covar_cols
        .iter()
        .map(|name| table.column(&[name.as_str()]))
        .collect::<Result<Vec<_>>>()?;

    Ok(PhenotypeData {
        sample_ids: table.values(id_idx).map(str::to_string).collect(),
        phenotype: table.values(pheno_idx).map(parse_value).collect(),
        covariates: covar_indices
            .iter()
            .map(|&c| table.values(c).map(parse_value).collect())
            .collect(),
        covariate_names: covar_cols.to_vec(),
    })
}

/// Read a phenotype/covariate file.
///
/// # Arguments
/// - `pheno_col`: name of the phenotype column
/// - `covar_cols`: names of covariate columns (may be empty)
/// - `sample_id_col`: name of the sample ID column
pub fn parse_phenotype_file(
    path: &Path,
    pheno_col: &str,
    covar_cols: &[String],
    sample_id_col: &str,
) -> Result<PhenotypeData> {
    let table = Table::read(path)?;
    let data = phenotype_from_table(&table, pheno_col, covar_cols, sample_id_col)
        .with_context(|| format!("Failed to parse phenotype file: {}", path.display()))?;
    info!(
        "Read phenotype '{}' and {} covariates for {} samples",
        pheno_col,
        covar_cols.len(),
        data.n_samples()
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_phenotype_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pheno.tsv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "IID\ty\tage\tsex").unwrap();
        writeln!(f, "S1\t1\t45\t1").unwrap();
        writeln!(f, "S2\t0\t50\t2").unwrap();
        writeln!(f, "S3\tNA\t55\t1").unwrap();

        let data =
            parse_phenotype_file(&path, "y", &["age".to_string(), "sex".to_string()], "IID")
                .unwrap();
        assert_eq!(data.sample_ids, vec!["S1", "S2", "S3"]);
        assert_eq!(data.phenotype[..2], [1.0, 0.0]);
        assert!(data.phenotype[2].is_nan());
        assert_eq!(data.covariates[0], vec![45.0, 50.0, 55.0]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let t = Table::parse("IID y\nS1 1\n").unwrap();
        assert!(phenotype_from_table(&t, "y", &["bmi".to_string()], "IID").is_err());
        assert!(phenotype_from_table(&t, "z", &[], "IID").is_err());
    }

    #[test]
    fn test_complete_samples_and_covariate_matrix() {
        let data = PhenotypeData {
            sample_ids: vec!["S1".into(), "S2".into(), "S3".into(), "S4".into()],
            phenotype: vec![1.0, 0.0, f64::NAN, 1.0],
            covariates: vec![vec![1.0, f64::NAN, 3.0, 4.0]],
            covariate_names: vec!["x".into()],
        };
        let rows = data.complete_samples();
        assert_eq!(rows, vec![0, 3]);
        let cov = data.covariate_matrix(&rows).unwrap();
        assert_eq!(cov.col(0), vec![1.0, 4.0]);
    }

    #[test]
    fn test_no_covariates() {
        let t = Table::parse("IID y\nS1 1\nS2 .\n").unwrap();
        let data = phenotype_from_table(&t, "y", &[], "IID").unwrap();
        assert_eq!(data.complete_samples(), vec![0]);
        assert!(data.covariate_matrix(&[0]).is_none());
    }
}
