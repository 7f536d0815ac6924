//! aspu-data: table readers for the aspu pathway test
//!
//! Reads SNP and gene annotations, phenotype/covariate tables and
//! sample-by-SNP dosage tables, and aligns them into model inputs.

pub mod align;
pub mod annotation;
pub mod dosage;
pub mod phenotype;
pub mod sample;
pub mod table;

pub use align::{align_inputs, PathwayInput};
pub use annotation::{read_gene_info, read_snp_info};
pub use dosage::DosageTable;
pub use phenotype::{parse_phenotype_file, PhenotypeData};
