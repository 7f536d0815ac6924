//! SNP and gene annotation readers.
//!
//! SNP info: one row per SNP with id, chromosome and base-pair position.
//! Gene info: one row per gene with id, chromosome and an inclusive
//! `[start, end]` window. Chromosome labels are normalized so `chr1`,
//! `Chr1` and `1` compare equal.

use std::path::Path;

use anyhow::{Context, Result};
use aspu_core::{GeneInfo, SnpInfo};
use tracing::info;

use crate::table::Table;

const SNP_ID: &[&str] = &["SNP", "ID", "RSID", "MarkerID"];
const GENE_ID: &[&str] = &["Gene", "GeneID", "ID", "Symbol"];
const CHROM: &[&str] = &["CHR", "Chrom", "Chromosome", "#CHROM"];
const POS: &[&str] = &["POS", "BP", "Position"];
const START: &[&str] = &["Start", "TxStart", "From"];
const END: &[&str] = &["End", "TxEnd", "To"];

/// Strip a leading `chr` in any case.
pub fn normalize_chrom(chrom: &str) -> String {
    let c = chrom.trim();
    match c.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("chr") => c[3..].to_string(),
        _ => c.to_string(),
    }
}

fn parse_coordinate(s: &str, what: &str, row: usize) -> Result<u64> {
    s.parse::<u64>()
        .with_context(|| format!("Row {}: invalid {} '{}'", row + 1, what, s))
}

pub fn snp_info_from_table(table: &Table) -> Result<Vec<SnpInfo>> {
    let id = table.column(SNP_ID)?;
    let chrom = table.column(CHROM)?;
    let pos = table.column(POS)?;
    table
        .rows
        .iter()
        .enumerate()
        .map(|(k, r)| -> Result<SnpInfo> {
            Ok(SnpInfo {
                id: r[id].clone(),
                chrom: normalize_chrom(&r[chrom]),
                pos: parse_coordinate(&r[pos], "position", k)?,
            })
        })
        .collect()
}

pub fn gene_info_from_table(table: &Table) -> Result<Vec<GeneInfo>> {
    let id = table.column(GENE_ID)?;
    let chrom = table.column(CHROM)?;
    let start = table.column(START)?;
    let end = table.column(END)?;
    table
        .rows
        .iter()
        .enumerate()
        .map(|(k, r)| -> Result<GeneInfo> {
            let gene = GeneInfo {
                id: r[id].clone(),
                chrom: normalize_chrom(&r[chrom]),
                start: parse_coordinate(&r[start], "start", k)?,
                end: parse_coordinate(&r[end], "end", k)?,
            };
            anyhow::ensure!(
                gene.start <= gene.end,
                "Gene {}: start {} after end {}",
                gene.id,
                gene.start,
                gene.end
            );
            Ok(gene)
        })
        .collect()
}

pub fn read_snp_info(path: &Path) -> Result<Vec<SnpInfo>> {
    let snps = snp_info_from_table(&Table::read(path)?)
        .with_context(|| format!("Failed to parse SNP info: {}", path.display()))?;
    info!("Read {} SNP annotations from {}", snps.len(), path.display());
    Ok(snps)
}

pub fn read_gene_info(path: &Path) -> Result<Vec<GeneInfo>> {
    let genes = gene_info_from_table(&Table::read(path)?)
        .with_context(|| format!("Failed to parse gene info: {}", path.display()))?;
    info!("Read {} gene windows from {}", genes.len(), path.display());
    Ok(genes)
}
