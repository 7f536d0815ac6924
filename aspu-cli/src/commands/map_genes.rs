//! Show which SNPs each gene window receives.
//!
//! aspu map-genes --snp-info ... --gene-info ...

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use aspu_core::mapping::map_snps_to_genes;
use aspu_data::{read_gene_info, read_snp_info};

#[derive(Args)]
pub struct MapGenesArgs {
    /// SNP annotation table (SNP, CHR, POS)
    #[arg(long)]
    snp_info: PathBuf,

    /// Gene window table (Gene, CHR, Start, End)
    #[arg(long)]
    gene_info: PathBuf,
}

pub fn run(args: MapGenesArgs) -> Result<()> {
    let snps = read_snp_info(&args.snp_info)?;
    let genes = read_gene_info(&args.gene_info)?;
    let groups = map_snps_to_genes(&snps, &genes);

    println!("GENE\tN_SNPS\tSNPS");
    for group in &groups {
        let ids: Vec<&str> = group
            .snp_indices
            .iter()
            .map(|&i| snps[i].id.as_str())
            .collect();
        println!("{}\t{}\t{}", group.gene_id, ids.len(), ids.join(","));
    }
    eprintln!(
        "{} of {} genes received SNPs ({} of {} SNPs mapped)",
        groups.len(),
        genes.len(),
        groups.n_units(),
        snps.len()
    );
    Ok(())
}
