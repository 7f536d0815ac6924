//! Run the aSPU pathway test.
//!
//! aspu pathway --dosage-file ... --pheno-file ... --snp-info ... --gene-info ...

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use aspu_core::score::PermutationTarget;
use aspu_core::spu::parse_powers;
use aspu_core::{Normalization, PathwayTest, PathwayTestConfig, PathwayTestResult, TraitType};
use aspu_data::{align_inputs, parse_phenotype_file, read_gene_info, read_snp_info, DosageTable};

#[derive(Args)]
pub struct PathwayArgs {
    /// Sample-by-SNP dosage table (sample ID column, then one column per SNP)
    #[arg(long)]
    dosage_file: PathBuf,

    /// Phenotype/covariate table
    #[arg(long)]
    pheno_file: PathBuf,

    /// Phenotype column name
    #[arg(long, default_value = "y")]
    pheno_col: String,

    /// Covariate column names, comma-separated
    #[arg(long, value_delimiter = ',')]
    covar_cols: Vec<String>,

    /// Sample ID column name in the phenotype table
    #[arg(long, default_value = "IID")]
    sample_id_col: String,

    /// SNP annotation table (SNP, CHR, POS)
    #[arg(long)]
    snp_info: PathBuf,

    /// Gene window table (Gene, CHR, Start, End)
    #[arg(long)]
    gene_info: PathBuf,

    /// Trait type: binary or continuous
    #[arg(long, default_value = "binary")]
    trait_type: String,

    /// Power exponents, comma-separated ("inf" for the max statistic)
    #[arg(long, default_value = "1,2,3,4,5,6,7,8,inf")]
    powers: String,

    /// Number of permutations
    #[arg(long, default_value = "200")]
    n_perm: usize,

    /// Base random seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Reduce each gene to its leading principal components
    #[arg(long)]
    use_pcs: bool,

    /// Variance share the retained components must explain
    #[arg(long, default_value = "0.95")]
    var_prop: f64,

    /// Permute covariate-adjusted residuals instead of phenotype labels
    #[arg(long)]
    permute_residuals: bool,

    /// Statistic family to report: unnormalized, root or standardized
    #[arg(long, default_value = "standardized")]
    report: String,

    /// Write the full result as JSON
    #[arg(long)]
    json: bool,

    /// Output file (stdout if omitted)
    #[arg(long)]
    output_file: Option<PathBuf>,
}

fn parse_family(s: &str) -> Result<Normalization> {
    Normalization::ALL
        .into_iter()
        .find(|v| v.name().eq_ignore_ascii_case(s))
        .with_context(|| format!("Unknown statistic family '{}'", s))
}

impl PathwayArgs {
    fn config(&self) -> Result<PathwayTestConfig> {
        Ok(PathwayTestConfig {
            powers: parse_powers(&self.powers)?,
            n_perm: self.n_perm,
            seed: self.seed,
            use_pcs: self.use_pcs,
            var_prop: self.var_prop,
            target: if self.permute_residuals {
                PermutationTarget::Residual
            } else {
                PermutationTarget::Phenotype
            },
            report_variant: parse_family(&self.report)?,
        })
    }
}

pub fn run(args: PathwayArgs) -> Result<()> {
    info!("=== aSPU pathway test ===");
    let trait_type: TraitType = args.trait_type.parse()?;
    let config = args.config()?;

    let pheno = parse_phenotype_file(
        &args.pheno_file,
        &args.pheno_col,
        &args.covar_cols,
        &args.sample_id_col,
    )?;
    let dosages = DosageTable::read(&args.dosage_file)?;
    let snps = read_snp_info(&args.snp_info)?;
    let genes = read_gene_info(&args.gene_info)?;

    let input = align_inputs(&pheno, &dosages, &snps)?;
    let result = PathwayTest::new(config)
        .run(&input.data(trait_type, &genes))
        .context("Pathway test failed")?;

    let mut out: Box<dyn Write> = match &args.output_file {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    if args.json {
        serde_json::to_writer_pretty(&mut out, &result)?;
        writeln!(out)?;
    } else {
        write_tsv(&mut out, &result)?;
    }
    out.flush()?;

    if let Some(path) = &args.output_file {
        info!("Results written to {}", path.display());
    }
    Ok(())
}

/// Two columns: label and p-value, in output order.
pub fn write_tsv<W: Write>(w: &mut W, result: &PathwayTestResult) -> Result<()> {
    writeln!(w, "TEST\tPVALUE")?;
    for (label, p) in result.pvalues.iter() {
        writeln!(w, "{}\t{}", label, p)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aspu_core::calibrate::Calibration;
    use aspu_core::spu::{PerVariant, Power};
    use aspu_core::PValueMap;

    #[test]
    fn test_parse_family() {
        assert_eq!(parse_family("Root").unwrap(), Normalization::Root);
        assert!(parse_family("zscore").is_err());
    }

    #[derive(clap::Parser)]
    struct Cli {
        #[command(flatten)]
        args: PathwayArgs,
    }

    fn parse_args(extra: &[&str]) -> PathwayArgs {
        use clap::Parser;
        let mut argv = vec![
            "aspu",
            "--dosage-file",
            "d.tsv",
            "--pheno-file",
            "p.tsv",
            "--snp-info",
            "s.tsv",
            "--gene-info",
            "g.tsv",
        ];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv).unwrap().args
    }

    #[test]
    fn test_permutation_count_left_to_core_validation() {
        let config = parse_args(&["--n-perm", "0"]).config().unwrap();
        assert_eq!(config.n_perm, 0);
        let config = parse_args(&["--n-perm", "10", "--permute-residuals"]).config().unwrap();
        assert_eq!(config.n_perm, 10);
        assert_eq!(config.target, PermutationTarget::Residual);
    }

    #[test]
    fn test_write_tsv() {
        let cal = Calibration {
            per_power: vec![0.25, 0.5],
            min_p: 0.25,
            adaptive: 0.3,
        };
        let powers = vec![Power::Finite(1.0), Power::Infinite];
        let result = PathwayTestResult {
            pvalues: PValueMap::from_calibration(&powers, &cal),
            report_variant: Normalization::Standardized,
            calibrations: PerVariant::from_fn(|_| cal.clone()),
            observed: PerVariant::from_fn(|_| vec![1.0, 2.0]),
            powers,
            genes: Vec::new(),
            n_perm: 4,
        };
        let mut buf = Vec::new();
        write_tsv(&mut buf, &result).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "TEST\tPVALUE\nSPUpathSingle1\t0.25\nSPUpathSingleInf\t0.5\naSPUpathSingle\t0.3\n"
        );
    }
}
