//! Generators of network connectivity.
//!
//! Random generators produce either a `DegreeMatrix` (row `i` lists the inputs of node `i`,
//! unused slots are `UNUSED_SLOT`) or a list of `InputEdge`s. Both shapes are turned into
//! a `BooleanNetwork` using `BooleanNetwork::from_degree_matrix` or
//! `BooleanNetwork::from_edges`. The configuration model can also build the network directly.
//!
//! All generators take an explicit random source. With a seeded source, repeated calls
//! produce identical topologies.

use crate::{DegreeMatrix, InputEdge, UNUSED_SLOT};
use rand::Rng;

/// **(internal)** Random generators with uniform edge placement.
mod _impl_random;

/// **(internal)** Power-law degree distributions and the configuration model generator.
mod _impl_configuration_model;

pub use _impl_random::{
    approximate_mean_degree, exact_degree, exact_total_degree, random_edge_list,
    random_rule_tables,
};

/// Number of terms of the truncated Riemann zeta sum used to normalise power laws.
pub const ZETA_TERMS: usize = 10_000;

/// Default bound on the number of degree sequences drawn by the `ConfigurationModel`
/// before it gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1_000;

/// Result of `approximate_mean_degree`.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedTopology {
    /// The generated topology.
    pub matrix: DegreeMatrix,
    /// The mean in-degree actually reached.
    pub mean_in_degree: f64,
    /// `true` if every node reached the degree cap before the target mean was reached.
    pub saturated: bool,
}

/// A distribution of (positive) node degrees.
pub trait DegreeDistribution {
    /// Draw one degree.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize;
}

/// A discrete distribution over degrees `1..=max_degree`, given by (not necessarily
/// normalised) cumulative weights.
///
/// Sampling draws a uniform value `r` from `[0, total)` and returns the smallest degree
/// whose cumulative weight exceeds `r`.
#[derive(Clone, Debug, PartialEq)]
pub struct CumulativeDistribution {
    cumulative: Vec<f64>,
}

/// A power-law degree distribution `P(k) = k^-s / zeta(s)` over `1..=max_degree`.
///
/// The zeta function is approximated by a truncated sum of `zeta_terms` terms
/// (`ZETA_TERMS` by default).
#[derive(Clone, Debug, PartialEq)]
pub struct PowerLaw {
    exponent: f64,
    zeta: f64,
    distribution: CumulativeDistribution,
}

/// A configuration-model generator with a per-node in-degree cap `max_k`.
///
/// A degree sequence is drawn from a `DegreeDistribution` and rejected as a whole if its sum
/// exceeds `size * max_k` (at most `max_attempts` sequences are drawn). Node `i` then owns
/// `degree[i]` source stubs. Each stub is paired with a uniformly random node whose in-degree
/// is still below `max_k`; saturated nodes leave the destination pool.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ConfigurationModel {
    max_k: usize,
    max_attempts: usize,
}

/// Mean number of used slots per row of a degree matrix (zero for an empty matrix).
pub fn average_in_degree(matrix: &[Vec<isize>]) -> f64 {
    if matrix.is_empty() {
        return 0.0;
    }
    let used: usize = matrix
        .iter()
        .map(|row| row.iter().filter(|slot| **slot != UNUSED_SLOT).count())
        .sum();
    used as f64 / matrix.len() as f64
}

/// Mean number of edges per node of an edge list over `size` nodes (zero if `size == 0`).
pub fn average_edge_degree(edges: &[InputEdge], size: usize) -> f64 {
    if size == 0 {
        return 0.0;
    }
    edges.len() as f64 / size as f64
}

#[cfg(test)]
mod tests {
    use crate::topology::{average_edge_degree, average_in_degree};
    use crate::{BooleanNetwork, InputEdge, UNUSED_SLOT};

    #[test]
    fn matrix_average_counts_used_slots() {
        let matrix = vec![
            vec![0, UNUSED_SLOT, UNUSED_SLOT],
            vec![1, 2, 0],
            vec![UNUSED_SLOT, UNUSED_SLOT, UNUSED_SLOT],
            vec![3, UNUSED_SLOT, 3],
        ];
        assert_eq!(1.5, average_in_degree(&matrix));
        let network = BooleanNetwork::from_degree_matrix(&matrix).unwrap();
        assert_eq!(average_in_degree(&matrix), network.average_in_degree());
        assert_eq!(0.0, average_in_degree(&[]));
    }

    #[test]
    fn edge_average() {
        let edges = vec![InputEdge::from((0, 1)), InputEdge::from((1, 1))];
        assert_eq!(0.5, average_edge_degree(&edges, 4));
        assert_eq!(0.0, average_edge_degree(&edges, 0));
    }
}
