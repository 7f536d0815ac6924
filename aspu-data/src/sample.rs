//! Sample ID intersection across input tables.

use std::collections::HashMap;

/// Samples present in every source.
#[derive(Debug, Clone)]
pub struct SampleIntersection {
    /// Shared IDs, in the primary source's order.
    pub ids: Vec<String>,
    /// `indices[s][k]` locates `ids[k]` in source `s`.
    pub indices: Vec<Vec<usize>>,
}

/// Intersect sample IDs, keeping the order of `sources[0]`.
pub fn intersect_samples(sources: &[&[String]]) -> SampleIntersection {
    let Some((primary, rest)) = sources.split_first() else {
        return SampleIntersection {
            ids: Vec::new(),
            indices: Vec::new(),
        };
    };

    let lookups: Vec<HashMap<&str, usize>> = rest
        .iter()
        .map(|ids| {
            ids.iter()
                .enumerate()
                .map(|(i, id)| (id.as_str(), i))
                .collect()
        })
        .collect();

    let mut ids = Vec::new();
    let mut indices: Vec<Vec<usize>> = vec![Vec::new(); sources.len()];
    for (i, id) in primary.iter().enumerate() {
        let hits: Option<Vec<usize>> = lookups.iter().map(|m| m.get(id.as_str()).copied()).collect();
        if let Some(hits) = hits {
            ids.push(id.clone());
            indices[0].push(i);
            for (s, k) in hits.into_iter().enumerate() {
                indices[s + 1].push(k);
            }
        }
    }

    SampleIntersection { ids, indices }
}

/// `data[indices[k]]` for every k.
pub fn reorder_f64(data: &[f64], indices: &[usize]) -> Vec<f64> {
    indices.iter().map(|&i| data[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_intersect_keeps_primary_order() {
        let a = ids(&["A", "B", "C", "D"]);
        let b = ids(&["C", "A", "E"]);
        let r = intersect_samples(&[&a, &b]);
        assert_eq!(r.ids, vec!["A", "C"]);
        assert_eq!(r.indices[0], vec![0, 2]);
        assert_eq!(r.indices[1], vec![1, 0]);
    }

    #[test]
    fn test_disjoint_and_empty() {
        let a = ids(&["A"]);
        let b = ids(&["B"]);
        assert!(intersect_samples(&[&a, &b]).ids.is_empty());
        assert!(intersect_samples(&[]).ids.is_empty());
    }

    #[test]
    fn test_reorder() {
        assert_eq!(reorder_f64(&[1.0, 2.0, 3.0], &[2, 0]), vec![3.0, 1.0]);
    }
}
