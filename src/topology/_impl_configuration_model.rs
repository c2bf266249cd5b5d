use crate::topology::{
    ConfigurationModel, CumulativeDistribution, DegreeDistribution, PowerLaw,
    DEFAULT_MAX_ATTEMPTS, ZETA_TERMS,
};
use crate::{BooleanNetwork, InputEdge, NodeId, RbnError};
use rand::Rng;
use tracing::{debug, info};

impl CumulativeDistribution {
    /// Build a distribution over `1..=max_degree` from a weight function.
    ///
    /// Weights must be finite and non-negative, and at least one must be positive.
    pub fn from_weights<F: Fn(usize) -> f64>(
        max_degree: usize,
        weight: F,
    ) -> Result<CumulativeDistribution, RbnError> {
        let mut cumulative = Vec::with_capacity(max_degree);
        let mut total = 0.0;
        for k in 1..=max_degree {
            let w = weight(k);
            if !w.is_finite() || w < 0.0 {
                return Err(RbnError::InvalidDistribution(format!(
                    "Weight {} of degree {} is not a finite non-negative number.",
                    w, k
                )));
            }
            total += w;
            cumulative.push(total);
        }
        if total <= 0.0 {
            return Err(RbnError::InvalidDistribution(format!(
                "Degrees 1..={} carry no positive weight.",
                max_degree
            )));
        }
        Ok(CumulativeDistribution { cumulative })
    }

    /// The largest degree this distribution can produce.
    pub fn max_degree(&self) -> usize {
        self.cumulative.len()
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    /// Cumulative weights, indexed by `degree - 1`.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }
}

impl DegreeDistribution for CumulativeDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let r = rng.gen_range(0.0..self.total());
        let index = self.cumulative.partition_point(|c| *c <= r);
        index.min(self.cumulative.len() - 1) + 1
    }
}

impl PowerLaw {
    /// A power law with the given `exponent` over degrees `1..=max_degree`, normalised by
    /// a zeta sum of `ZETA_TERMS` terms.
    pub fn new(exponent: f64, max_degree: usize) -> Result<PowerLaw, RbnError> {
        Self::with_zeta_terms(exponent, max_degree, ZETA_TERMS)
    }

    /// Same as `PowerLaw::new`, but with a custom number of zeta terms.
    pub fn with_zeta_terms(
        exponent: f64,
        max_degree: usize,
        zeta_terms: usize,
    ) -> Result<PowerLaw, RbnError> {
        let zeta = zeta(exponent, zeta_terms);
        if !zeta.is_finite() || zeta <= 0.0 {
            return Err(RbnError::InvalidDistribution(format!(
                "Exponent {} with {} zeta terms gives normalisation constant {}.",
                exponent, zeta_terms, zeta
            )));
        }
        let distribution = CumulativeDistribution::from_weights(max_degree, |k| {
            (k as f64).powf(-exponent) / zeta
        })?;
        Ok(PowerLaw {
            exponent,
            zeta,
            distribution,
        })
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Probability of degree `k` under the (untruncated) power law.
    pub fn probability(&self, k: usize) -> f64 {
        if k == 0 {
            0.0
        } else {
            (k as f64).powf(-self.exponent) / self.zeta
        }
    }

    /// The truncated degree distribution used for sampling.
    pub fn distribution(&self) -> &CumulativeDistribution {
        &self.distribution
    }
}

impl DegreeDistribution for PowerLaw {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.distribution.sample(rng)
    }
}

impl ConfigurationModel {
    /// A new generator with in-degree cap `max_k` and `DEFAULT_MAX_ATTEMPTS` attempts.
    pub fn new(max_k: usize) -> ConfigurationModel {
        ConfigurationModel {
            max_k,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Change the number of degree sequences drawn before giving up.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> ConfigurationModel {
        self.max_attempts = max_attempts;
        self
    }

    pub fn max_k(&self) -> usize {
        self.max_k
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Total number of inputs a network of `size` nodes can hold.
    pub fn capacity(&self, size: usize) -> usize {
        size.saturating_mul(self.max_k)
    }

    /// Draw a degree sequence of length `size` whose sum does not exceed the capacity.
    ///
    /// Sequences that overflow the capacity are discarded as a whole and redrawn.
    pub fn degree_sequence<D: DegreeDistribution, R: Rng + ?Sized>(
        &self,
        size: usize,
        distribution: &D,
        rng: &mut R,
    ) -> Result<Vec<usize>, RbnError> {
        let capacity = self.capacity(size);
        for attempt in 1..=self.max_attempts {
            let degrees: Vec<usize> = (0..size).map(|_| distribution.sample(rng)).collect();
            let total = degrees
                .iter()
                .fold(0usize, |sum, degree| sum.saturating_add(*degree));
            if total <= capacity {
                debug!(size, total, capacity, attempt, "Degree sequence accepted");
                return Ok(degrees);
            }
            if cfg!(feature = "print-progress") {
                info!(
                    attempt,
                    total, capacity, "Degree sequence exceeds capacity, redrawing"
                );
            }
        }
        Err(RbnError::DistributionInfeasible {
            capacity,
            attempts: self.max_attempts,
        })
    }

    /// Pair source stubs with destinations: node `i` is the source of `degrees[i]` edges.
    ///
    /// In every step, a uniformly random remaining stub is matched with a uniformly random
    /// destination whose in-degree is still below `max_k`.
    pub fn match_stubs<R: Rng + ?Sized>(
        &self,
        degrees: &[usize],
        rng: &mut R,
    ) -> Result<Vec<InputEdge>, RbnError> {
        let size = degrees.len();
        let total = degrees
            .iter()
            .fold(0usize, |sum, degree| sum.saturating_add(*degree));
        if total > self.capacity(size) {
            return Err(RbnError::MalformedTopology(format!(
                "Degree sequence with {} stubs exceeds capacity {}.",
                total,
                self.capacity(size)
            )));
        }

        let mut stubs: Vec<NodeId> = Vec::with_capacity(total);
        for (node, degree) in degrees.iter().enumerate() {
            stubs.extend(std::iter::repeat(NodeId::from(node)).take(*degree));
        }
        let mut in_degree = vec![0usize; size];
        let mut open: Vec<usize> = if self.max_k > 0 {
            (0..size).collect()
        } else {
            Vec::new()
        };

        let mut edges = Vec::with_capacity(total);
        while !stubs.is_empty() {
            // Total capacity is at least the number of stubs, so some destination is open.
            let source = stubs.swap_remove(rng.gen_range(0..stubs.len()));
            let slot = rng.gen_range(0..open.len());
            let destination = open[slot];
            in_degree[destination] += 1;
            if in_degree[destination] >= self.max_k {
                open.swap_remove(slot);
            }
            edges.push(InputEdge::new(source, NodeId::from(destination)));
        }
        Ok(edges)
    }

    /// Draw a degree sequence and match its stubs, returning the resulting edges.
    pub fn generate_edges<D: DegreeDistribution, R: Rng + ?Sized>(
        &self,
        size: usize,
        distribution: &D,
        rng: &mut R,
    ) -> Result<Vec<InputEdge>, RbnError> {
        let degrees = self.degree_sequence(size, distribution, rng)?;
        self.match_stubs(&degrees, rng)
    }

    /// Draw a degree sequence, match its stubs and build the network.
    pub fn generate<D: DegreeDistribution, R: Rng + ?Sized>(
        &self,
        size: usize,
        distribution: &D,
        rng: &mut R,
    ) -> Result<BooleanNetwork, RbnError> {
        let edges = self.generate_edges(size, distribution, rng)?;
        BooleanNetwork::from_edges(size, &edges)
    }
}

/// **(internal)** Riemann zeta function approximated by the first `terms` terms.
fn zeta(s: f64, terms: usize) -> f64 {
    (1..=terms).map(|i| 1.0 / (i as f64).powf(s)).sum()
}
