//! HITS authority and hub scores.
//!
//! Authority measures how much a document is referenced by good hubs; hub
//! measures how much a document references good authorities. Both start at
//! 1.0 and are refined until they stop changing or the iteration budget runs
//! out, normalizing each vector by its Euclidean norm every round.
//!
//! ```
//! use fathom::config::LinkAnalysisConfig;
//! use fathom::link::hits::HubAuthorityScores;
//!
//! // 0 -> 1 -> 2 -> 0, and document 3 on its own.
//! let edges = [(0, 1), (1, 2), (2, 0)];
//! let scores = HubAuthorityScores::compute(4, &edges, &LinkAnalysisConfig::default());
//!
//! assert!(scores.authority(1) > scores.authority(3));
//! assert_eq!(scores.authority(3), 0.0);
//! assert_eq!(scores.hub(3), 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::LinkAnalysisConfig;
use crate::document::DocId;
use crate::index::inverted::ScoreBoost;

/// Per-document authority and hub scores of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubAuthorityScores {
    authority: Vec<f64>,
    hub: Vec<f64>,
    iterations: usize,
    converged: bool,
}

impl HubAuthorityScores {
    /// Run HITS over `doc_count` documents and the given directed edges.
    ///
    /// Edges must reference ids below `doc_count`; anything else is skipped.
    pub fn compute(
        doc_count: usize,
        edges: &[(DocId, DocId)],
        config: &LinkAnalysisConfig,
    ) -> Self {
        let edges: Vec<(usize, usize)> = edges
            .iter()
            .map(|&(source, target)| (source as usize, target as usize))
            .filter(|&(source, target)| source < doc_count && target < doc_count)
            .collect();

        let mut authority = vec![1.0; doc_count];
        let mut hub = vec![1.0; doc_count];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < config.max_iterations {
            iterations += 1;

            let mut next_authority = vec![0.0; doc_count];
            for &(source, target) in &edges {
                next_authority[target] += hub[source];
            }
            normalize(&mut next_authority);

            let mut next_hub = vec![0.0; doc_count];
            for &(source, target) in &edges {
                next_hub[source] += next_authority[target];
            }
            normalize(&mut next_hub);

            let delta = l1_distance(&authority, &next_authority) + l1_distance(&hub, &next_hub);
            authority = next_authority;
            hub = next_hub;

            if delta < config.tolerance {
                converged = true;
                break;
            }
        }

        log::debug!(
            "HITS over {} documents and {} links: {} iterations, converged={}",
            doc_count,
            edges.len(),
            iterations,
            converged
        );

        HubAuthorityScores {
            authority,
            hub,
            iterations,
            converged,
        }
    }

    /// Authority score of a document; 0.0 for unknown ids.
    pub fn authority(&self, doc_id: DocId) -> f64 {
        self.authority.get(doc_id as usize).copied().unwrap_or(0.0)
    }

    /// Hub score of a document; 0.0 for unknown ids.
    pub fn hub(&self, doc_id: DocId) -> f64 {
        self.hub.get(doc_id as usize).copied().unwrap_or(0.0)
    }

    pub fn max_authority(&self) -> f64 {
        self.authority.iter().copied().fold(0.0, f64::max)
    }

    pub fn max_hub(&self) -> f64 {
        self.hub.iter().copied().fold(0.0, f64::max)
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn len(&self) -> usize {
        self.authority.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authority.is_empty()
    }
}

/// Blends authority and hub scores into relevance as a multiplier.
///
/// `multiplier = 1 + authority_weight × a/max_a + hub_weight × h/max_h`, which
/// is at least 1 and grows with both scores.
#[derive(Debug, Clone, Copy)]
pub struct LinkBoost<'a> {
    scores: &'a HubAuthorityScores,
    authority_weight: f64,
    hub_weight: f64,
    max_authority: f64,
    max_hub: f64,
}

impl<'a> LinkBoost<'a> {
    pub fn new(scores: &'a HubAuthorityScores, config: &LinkAnalysisConfig) -> Self {
        LinkBoost {
            scores,
            authority_weight: config.authority_weight,
            hub_weight: config.hub_weight,
            max_authority: scores.max_authority(),
            max_hub: scores.max_hub(),
        }
    }
}

impl ScoreBoost for LinkBoost<'_> {
    fn multiplier(&self, doc_id: DocId) -> f64 {
        let authority = scaled(self.scores.authority(doc_id), self.max_authority);
        let hub = scaled(self.scores.hub(doc_id), self.max_hub);
        1.0 + self.authority_weight * authority + self.hub_weight * hub
    }
}

fn scaled(value: f64, max: f64) -> f64 {
    if max > 0.0 { value / max } else { 0.0 }
}

fn normalize(values: &mut [f64]) {
    let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for value in values.iter_mut() {
            *value /= norm;
        }
    }
}

fn l1_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_cycle_scores_equal_and_normalized() {
        let scores =
            HubAuthorityScores::compute(3, &[(0, 1), (1, 2), (2, 0)], &LinkAnalysisConfig::default());

        let expected = 1.0 / 3f64.sqrt();
        for id in 0..3 {
            assert!(close(scores.authority(id), expected));
            assert!(close(scores.hub(id), expected));
        }
        assert!(scores.converged());
    }

    #[test]
    fn test_star_authority() {
        // Documents 1..=3 all link to 0.
        let scores = HubAuthorityScores::compute(
            4,
            &[(1, 0), (2, 0), (3, 0)],
            &LinkAnalysisConfig::default(),
        );

        assert!(close(scores.authority(0), 1.0));
        assert_eq!(scores.authority(1), 0.0);
        assert_eq!(scores.hub(0), 0.0);
        assert!(close(scores.hub(1), scores.hub(2)));
        assert!(scores.hub(1) > 0.0);
    }

    #[test]
    fn test_no_links_converges_to_zero() {
        let scores = HubAuthorityScores::compute(3, &[], &LinkAnalysisConfig::default());
        assert_eq!(scores.max_authority(), 0.0);
        assert_eq!(scores.max_hub(), 0.0);
        assert_eq!(scores.len(), 3);
    }

    #[test]
    fn test_iteration_budget() {
        let config = LinkAnalysisConfig {
            max_iterations: 1,
            tolerance: 0.0,
            ..Default::default()
        };
        let scores = HubAuthorityScores::compute(2, &[(0, 1)], &config);
        assert_eq!(scores.iterations(), 1);
        assert!(!scores.converged());
    }

    #[test]
    fn test_out_of_range_edges_skipped() {
        let scores =
            HubAuthorityScores::compute(2, &[(0, 1), (0, 9)], &LinkAnalysisConfig::default());
        assert!(close(scores.authority(1), 1.0));
        assert_eq!(scores.authority(9), 0.0);
    }

    #[test]
    fn test_link_boost_is_monotone() {
        let scores = HubAuthorityScores::compute(
            4,
            &[(1, 0), (2, 0), (3, 0), (3, 1)],
            &LinkAnalysisConfig::default(),
        );
        let boost = LinkBoost::new(&scores, &LinkAnalysisConfig::default());

        assert!(boost.multiplier(0) > boost.multiplier(1));
        for id in 0..4 {
            assert!(boost.multiplier(id) >= 1.0);
        }
        assert_eq!(boost.multiplier(42), 1.0);
    }
}
