//! SNP-to-gene mapping.
//!
//! A SNP belongs to a gene when it sits on the gene's chromosome inside
//! the closed window `[start, end]`. Genes are visited in table order and
//! a SNP claimed by an earlier gene is never handed to a later,
//! overlapping one (first match wins). Genes left without SNPs are
//! dropped from the pathway entirely.

use serde::{Deserialize, Serialize};

/// One predictor column's annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnpInfo {
    pub id: String,
    pub chrom: String,
    pub pos: u64,
}

/// One gene window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneInfo {
    pub id: String,
    pub chrom: String,
    /// Window start, inclusive.
    pub start: u64,
    /// Window end, inclusive.
    pub end: u64,
}

impl GeneInfo {
    pub fn contains(&self, snp: &SnpInfo) -> bool {
        snp.chrom == self.chrom && self.start <= snp.pos && snp.pos <= self.end
    }
}

/// A gene together with the units (columns of the score vector) it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneGroup {
    pub gene_id: String,
    /// Indices into the caller's SNP table, in table order.
    pub snp_indices: Vec<usize>,
    /// Indices into the score vector. Before reduction these are the
    /// positions of `snp_indices` in the reordered predictor matrix.
    pub members: Vec<usize>,
}

impl GeneGroup {
    /// Number of score units in the group (post-reduction count).
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Ordered arena of non-empty gene groups.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneGroups {
    groups: Vec<GeneGroup>,
}

impl GeneGroups {
    pub fn new(groups: Vec<GeneGroup>) -> Self {
        debug_assert!(groups.iter().all(|g| !g.members.is_empty()));
        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneGroup> {
        self.groups.iter()
    }

    pub fn get(&self, g: usize) -> Option<&GeneGroup> {
        self.groups.get(g)
    }

    /// Total number of score units across all groups.
    pub fn n_units(&self) -> usize {
        self.groups.iter().map(GeneGroup::size).sum()
    }

    /// All mapped SNP-table indices, gene by gene.
    pub fn snp_order(&self) -> Vec<usize> {
        self.groups
            .iter()
            .flat_map(|g| g.snp_indices.iter().copied())
            .collect()
    }
}

impl<'a> IntoIterator for &'a GeneGroups {
    type Item = &'a GeneGroup;
    type IntoIter = std::slice::Iter<'a, GeneGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Assign SNPs to genes and build the ordered group arena.
///
/// The members of each group index the gene-block ordered predictor
/// matrix, i.e. the columns `snp_order()` selects from the genotypes.
pub fn map_snps_to_genes(snps: &[SnpInfo], genes: &[GeneInfo]) -> GeneGroups {
    let mut claimed = vec![false; snps.len()];
    let mut groups = Vec::new();
    let mut next_unit = 0;

    for gene in genes {
        let snp_indices: Vec<usize> = snps
            .iter()
            .enumerate()
            .filter(|(i, snp)| !claimed[*i] && gene.contains(snp))
            .map(|(i, _)| i)
            .collect();
        if snp_indices.is_empty() {
            continue;
        }
        for &i in &snp_indices {
            claimed[i] = true;
        }
        let members = (next_unit..next_unit + snp_indices.len()).collect();
        next_unit += snp_indices.len();
        groups.push(GeneGroup {
            gene_id: gene.id.clone(),
            snp_indices,
            members,
        });
    }

    GeneGroups::new(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snp(id: &str, chrom: &str, pos: u64) -> SnpInfo {
        SnpInfo {
            id: id.to_string(),
            chrom: chrom.to_string(),
            pos,
        }
    }

    fn gene(id: &str, chrom: &str, start: u64, end: u64) -> GeneInfo {
        GeneInfo {
            id: id.to_string(),
            chrom: chrom.to_string(),
            start,
            end,
        }
    }

    #[test]
    fn test_windows_are_closed() {
        let snps = vec![snp("a", "1", 100), snp("b", "1", 200), snp("c", "1", 201)];
        let groups = map_snps_to_genes(&snps, &[gene("G", "1", 100, 200)]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.get(0).unwrap().snp_indices, vec![0, 1]);
    }

    #[test]
    fn test_chromosome_must_match() {
        let snps = vec![snp("a", "2", 150)];
        let groups = map_snps_to_genes(&snps, &[gene("G", "1", 100, 200)]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_empty_genes_are_dropped_and_members_stay_dense() {
        let snps = vec![
            snp("a", "1", 10),
            snp("b", "2", 10),
            snp("c", "1", 500),
            snp("d", "2", 20),
        ];
        let genes = vec![
            gene("G1", "1", 1, 100),
            gene("EMPTY", "3", 1, 100),
            gene("G2", "2", 1, 100),
        ];
        let groups = map_snps_to_genes(&snps, &genes);
        assert_eq!(groups.len(), 2);
        let g1 = groups.get(0).unwrap();
        let g2 = groups.get(1).unwrap();
        assert_eq!(g1.gene_id, "G1");
        assert_eq!(g1.members, vec![0]);
        assert_eq!(g2.gene_id, "G2");
        assert_eq!(g2.snp_indices, vec![1, 3]);
        assert_eq!(g2.members, vec![1, 2]);
        assert_eq!(groups.n_units(), 3);
        assert_eq!(groups.snp_order(), vec![0, 1, 3]);
    }

    #[test]
    fn test_overlapping_windows_first_match_wins() {
        let snps = vec![snp("a", "1", 50), snp("b", "1", 150), snp("c", "1", 250)];
        let genes = vec![gene("G1", "1", 0, 200), gene("G2", "1", 100, 300)];
        let groups = map_snps_to_genes(&snps, &genes);
        assert_eq!(groups.get(0).unwrap().snp_indices, vec![0, 1]);
        assert_eq!(groups.get(1).unwrap().snp_indices, vec![2]);
        assert_eq!(groups.n_units(), 3);
    }

    #[test]
    fn test_gene_order_follows_table_not_position() {
        let snps = vec![snp("a", "1", 10), snp("b", "1", 1000)];
        let genes = vec![gene("LATE", "1", 900, 1100), gene("EARLY", "1", 0, 20)];
        let groups = map_snps_to_genes(&snps, &genes);
        assert_eq!(groups.get(0).unwrap().gene_id, "LATE");
        assert_eq!(groups.snp_order(), vec![1, 0]);
    }
}
