//! Assemble aligned model inputs from the loaded tables.
//!
//! Samples: those with a complete phenotype/covariate record that also
//! appear in the dosage table, in phenotype-file order. SNPs: dosage
//! columns with an annotation row, in dosage-file order; missing dosages
//! are mean-imputed over the kept samples.

use std::collections::HashMap;

use anyhow::{bail, Result};
use aspu_core::{GeneInfo, PathwayData, SnpInfo, TraitType};
use aspu_linalg::DenseMatrix;
use tracing::{debug, info, warn};

use crate::dosage::DosageTable;
use crate::phenotype::PhenotypeData;
use crate::sample::{intersect_samples, reorder_f64};

/// Model-ready inputs for one pathway.
#[derive(Debug, Clone)]
pub struct PathwayInput {
    pub sample_ids: Vec<String>,
    pub phenotype: Vec<f64>,
    pub covariates: Option<DenseMatrix>,
    pub genotypes: DenseMatrix,
    /// One annotation per genotype column.
    pub snps: Vec<SnpInfo>,
}

impl PathwayInput {
    pub fn data<'a>(&'a self, trait_type: TraitType, genes: &'a [GeneInfo]) -> PathwayData<'a> {
        PathwayData {
            phenotype: &self.phenotype,
            genotypes: &self.genotypes,
            covariates: self.covariates.as_ref(),
            trait_type,
            snps: &self.snps,
            genes,
        }
    }
}

pub fn align_inputs(
    pheno: &PhenotypeData,
    dosages: &DosageTable,
    snp_info: &[SnpInfo],
) -> Result<PathwayInput> {
    let complete = pheno.complete_samples();
    if complete.len() < pheno.n_samples() {
        info!(
            "Dropped {} samples with missing phenotype or covariates",
            pheno.n_samples() - complete.len()
        );
    }
    let complete_ids: Vec<String> = complete.iter().map(|&i| pheno.sample_ids[i].clone()).collect();
    let shared = intersect_samples(&[&complete_ids, &dosages.sample_ids]);
    if shared.ids.is_empty() {
        bail!("No sample has both a complete phenotype record and dosages");
    }
    let pheno_rows: Vec<usize> = shared.indices[0].iter().map(|&k| complete[k]).collect();
    let dosage_rows = &shared.indices[1];
    info!("{} samples in common", shared.ids.len());

    let annotation: HashMap<&str, &SnpInfo> = snp_info.iter().map(|s| (s.id.as_str(), s)).collect();
    let mut snps = Vec::new();
    let mut columns = Vec::new();
    for (j, id) in dosages.snp_ids.iter().enumerate() {
        let Some(info) = annotation.get(id.as_str()) else {
            debug!("SNP {} has no annotation, skipped", id);
            continue;
        };
        snps.push((*info).clone());
        columns.push(dosages.imputed_column(j, dosage_rows));
    }
    if snps.is_empty() {
        bail!("No dosage column has a matching SNP annotation");
    }
    if snps.len() < dosages.n_snps() {
        warn!(
            "{} of {} dosage columns lack SNP annotation and were skipped",
            dosages.n_snps() - snps.len(),
            dosages.n_snps()
        );
    }

    Ok(PathwayInput {
        sample_ids: shared.ids,
        phenotype: reorder_f64(&pheno.phenotype, &pheno_rows),
        covariates: pheno.covariate_matrix(&pheno_rows),
        genotypes: DenseMatrix::from_columns(&columns),
        snps,
    })
}
