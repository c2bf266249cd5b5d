//! Measurements over the state trajectory of a `BooleanNetwork`.
//!
//! Functions which need to advance the network take the update step as a closure, so any
//! discipline can be measured. For example, with an `UpdateScheduler`:
//!
//! ```rust
//! use rbn_dynamics::statistics::attractor_length;
//! use rbn_dynamics::update::{UpdateDiscipline, UpdateScheduler};
//! use rbn_dynamics::{BooleanNetwork, RuleTable};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! // A single node without inputs which always switches to `true`.
//! let mut network = BooleanNetwork::from_inputs(vec![Vec::new()]).unwrap();
//! network.set_rules(vec![RuleTable::constant(0, true).unwrap()]).unwrap();
//!
//! let mut scheduler = UpdateScheduler::new(StdRng::seed_from_u64(0));
//! let length = attractor_length(&mut network, 10, |n| {
//!     scheduler.step(n, UpdateDiscipline::Synchronous)
//! });
//! assert_eq!(Some(1), length);
//! ```

use crate::{BooleanNetwork, NetworkState};
use rand::Rng;
use tracing::{debug, info};

/// Number of ticks a network runs for in each trial of `density_test`.
pub const DENSITY_TEST_TICKS: usize = 100;

/// The value held by the majority of nodes.
///
/// The result is `false` only if strictly more than `N/2` (integer division) nodes are
/// `false`. Exact ties are therefore reported as `true`.
pub fn majority(network: &BooleanNetwork) -> bool {
    let zeros = network.nodes().iter().filter(|node| !node.state()).count();
    zeros <= network.num_nodes() / 2
}

/// Fraction of nodes whose value equals `target` (zero for an empty network).
pub fn density(network: &BooleanNetwork, target: bool) -> f64 {
    if network.num_nodes() == 0 {
        return 0.0;
    }
    let matching = network
        .nodes()
        .iter()
        .filter(|node| node.state() == target)
        .count();
    matching as f64 / network.num_nodes() as f64
}

/// Measure how well the network follows a signal alternating between the current majority
/// value and its complement.
///
/// The majority is taken once, from the state at the time of the call. In sample `i`
/// (`0 <= i < iterations`), the density of the majority value (even `i`) or its complement
/// (odd `i`) is recorded and the network is advanced by one `update`. Returns the mean
/// of all samples, or zero if `iterations == 0`.
pub fn sync_fitness<F>(network: &mut BooleanNetwork, iterations: usize, mut update: F) -> f64
where
    F: FnMut(&mut BooleanNetwork),
{
    let majority = majority(network);
    alternating_fitness(network, majority, iterations, &mut update)
}

/// Record the current majority, seed the network with probability `p`, and then measure
/// how well the seeded network follows the signal alternating from the recorded majority.
pub fn seeded_sync_fitness<R, F>(
    network: &mut BooleanNetwork,
    p: f64,
    rng: &mut R,
    iterations: usize,
    mut update: F,
) -> f64
where
    R: Rng + ?Sized,
    F: FnMut(&mut BooleanNetwork),
{
    let majority = majority(network);
    network.seed(p, rng);
    alternating_fitness(network, majority, iterations, &mut update)
}

/// **(internal)** Mean density of `majority` (even samples) and its complement (odd samples).
fn alternating_fitness<F>(
    network: &mut BooleanNetwork,
    majority: bool,
    iterations: usize,
    update: &mut F,
) -> f64
where
    F: FnMut(&mut BooleanNetwork),
{
    if iterations == 0 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..iterations {
        let target = if i % 2 == 0 { majority } else { !majority };
        total += density(network, target);
        update(network);
    }
    total / iterations as f64
}

/// Density classification test.
///
/// Every trial seeds the network with a uniformly random probability, records the majority,
/// runs `DENSITY_TEST_TICKS` updates and measures the density of the recorded majority.
/// Returns the mean density over all trials (zero if `trials == 0`).
pub fn density_test<R, F>(
    network: &mut BooleanNetwork,
    rng: &mut R,
    trials: usize,
    mut update: F,
) -> f64
where
    R: Rng + ?Sized,
    F: FnMut(&mut BooleanNetwork),
{
    if trials == 0 {
        return 0.0;
    }
    let mut total = 0.0;
    for trial in 0..trials {
        let p = rng.gen::<f64>();
        network.seed(p, rng);
        let majority = majority(network);
        for _ in 0..DENSITY_TEST_TICKS {
            update(network);
        }
        total += density(network, majority);
        if cfg!(feature = "print-progress") {
            info!(trial, mean = total / (trial + 1) as f64, "Density test progress");
        }
    }
    total / trials as f64
}

/// Search for an attractor within `iterations` updates.
///
/// Before every update, the current state is recorded. After every update, the recorded
/// history is searched (most recent first) for an exact copy of the new state. The distance
/// between the two occurrences is returned as the attractor length. Returns `None` if no
/// state repeats within `iterations` updates.
pub fn attractor_length<F>(
    network: &mut BooleanNetwork,
    iterations: usize,
    mut update: F,
) -> Option<usize>
where
    F: FnMut(&mut BooleanNetwork),
{
    let mut history: Vec<NetworkState> = Vec::with_capacity(iterations);
    for tick in 0..iterations {
        history.push(network.snapshot());
        update(network);
        let current = network.snapshot();
        if let Some(position) = history.iter().rposition(|state| *state == current) {
            let length = history.len() - position;
            debug!(tick, length, "Attractor found");
            return Some(length);
        }
        if cfg!(feature = "print-progress") && tick % 1000 == 999 {
            info!(tick, "Attractor search progress");
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use crate::statistics::{
        attractor_length, density, density_test, majority, seeded_sync_fitness, sync_fitness,
    };
    use crate::update::{synchronous_update, UpdateDiscipline, UpdateScheduler};
    use crate::{BooleanNetwork, NodeId, RuleTable};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tracing_test::traced_test;

    fn isolated(n: usize) -> BooleanNetwork {
        BooleanNetwork::from_inputs(vec![Vec::new(); n]).unwrap()
    }

    /// A ring of `n` nodes where each node negates its predecessor.
    fn negation_ring(n: usize) -> BooleanNetwork {
        let inputs = (0..n)
            .map(|i| vec![NodeId::from((i + n - 1) % n)])
            .collect();
        let mut network = BooleanNetwork::from_inputs(inputs).unwrap();
        network.set_rule_values(&vec![vec![1, 0]; n]).unwrap();
        network
    }

    #[test]
    fn majority_tie_break() {
        let mut network = isolated(4);
        network.set_state(&[false, false, true, true]).unwrap();
        assert!(majority(&network));
        network.set_state(&[false, false, false, true]).unwrap();
        assert!(!majority(&network));
        network.set_state(&[true, true, true, false]).unwrap();
        assert!(majority(&network));

        let mut odd = isolated(3);
        odd.set_state(&[false, false, true]).unwrap();
        assert!(!majority(&odd));
        odd.set_state(&[false, true, true]).unwrap();
        assert!(majority(&odd));
    }

    #[test]
    fn density_of_state() {
        let mut network = isolated(4);
        network.set_state(&[false, true, true, true]).unwrap();
        assert_eq!(0.75, density(&network, true));
        assert_eq!(0.25, density(&network, false));
        assert_eq!(0.0, density(&isolated(0), true));
    }

    #[test]
    fn attractor_of_constant_node() {
        let mut network = isolated(1);
        network
            .set_rules(vec![RuleTable::constant(0, true).unwrap()])
            .unwrap();
        for budget in 2..6 {
            network.reset_state();
            assert_eq!(Some(1), attractor_length(&mut network, budget, synchronous_update));
        }
        network.reset_state();
        assert_eq!(None, attractor_length(&mut network, 1, synchronous_update));
        assert_eq!(None, attractor_length(&mut network, 0, synchronous_update));
    }

    #[test]
    fn attractor_of_negation_ring() {
        // A single active node travels around an odd negation ring with period 2n.
        let mut network = negation_ring(3);
        network.set_state(&[true, false, false]).unwrap();
        assert_eq!(Some(6), attractor_length(&mut network, 20, synchronous_update));
        // Alternating values form a fixed point of an even ring.
        let mut network = negation_ring(4);
        network.set_state(&[true, false, true, false]).unwrap();
        assert_eq!(Some(1), attractor_length(&mut network, 20, synchronous_update));
        // Uniform values blink with period two.
        network.reset_state();
        assert_eq!(Some(2), attractor_length(&mut network, 20, synchronous_update));
    }

    #[test]
    #[traced_test]
    fn attractor_is_logged() {
        let mut network = negation_ring(4);
        network.set_state(&[true, false, true, false]).unwrap();
        attractor_length(&mut network, 20, synchronous_update);
        assert!(logs_contain("Attractor found"));
    }

    #[test]
    fn attractor_with_scheduler() {
        let mut network = negation_ring(3);
        network.set_state(&[true, false, false]).unwrap();
        let mut scheduler = UpdateScheduler::new(ChaCha8Rng::seed_from_u64(0));
        scheduler.set_full_frontier(&network);
        let length = attractor_length(&mut network, 20, |n| {
            scheduler.step(n, UpdateDiscipline::Cascade)
        });
        assert_eq!(Some(6), length);
    }

    #[test]
    fn sync_fitness_of_oscillator() {
        // Every node negates itself, so the whole network blinks in sync.
        let inputs = (0..6).map(|i| vec![NodeId::from(i)]).collect();
        let mut network = BooleanNetwork::from_inputs(inputs).unwrap();
        network.set_rule_values(&vec![vec![1, 0]; 6]).unwrap();
        network.set_state(&[true; 6]).unwrap();
        assert_eq!(1.0, sync_fitness(&mut network, 10, synchronous_update));

        // A frozen network matches the signal only on every other tick.
        let mut frozen = isolated(6);
        frozen
            .set_rules(vec![RuleTable::constant(0, false).unwrap(); 6])
            .unwrap();
        assert_eq!(0.5, sync_fitness(&mut frozen, 10, synchronous_update));
        assert_eq!(0.0, sync_fitness(&mut frozen, 0, synchronous_update));
    }

    #[test]
    fn seeded_sync_fitness_is_reproducible() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let matrix = crate::topology::exact_degree(20, 2, &mut rng);
        let mut network = BooleanNetwork::from_degree_matrix(&matrix).unwrap();
        network.generate_random_rules(&mut rng).unwrap();
        let mut copy = network.clone();
        let a = seeded_sync_fitness(
            &mut network,
            0.5,
            &mut ChaCha8Rng::seed_from_u64(2),
            20,
            synchronous_update,
        );
        let b = seeded_sync_fitness(
            &mut copy,
            0.5,
            &mut ChaCha8Rng::seed_from_u64(2),
            20,
            synchronous_update,
        );
        assert_eq!(a, b);
        assert!((0.0..=1.0).contains(&a));
    }

    #[test]
    fn seeded_sync_fitness_uses_majority_before_seeding() {
        let inputs = (0..4).map(|i| vec![NodeId::from(i)]).collect();
        let mut network = BooleanNetwork::from_inputs(inputs).unwrap();
        network.set_rule_values(&vec![vec![1, 0]; 4]).unwrap();
        // All nodes start `false`, seeding flips them to `true`, and they blink from there.
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let fitness = seeded_sync_fitness(&mut network, 1.0, &mut rng, 8, synchronous_update);
        assert_eq!(0.0, fitness);

        network.seed(1.0, &mut rng);
        assert_eq!(1.0, sync_fitness(&mut network, 8, synchronous_update));
    }

    #[test]
    fn density_test_of_identity_network() {
        // Nodes which keep their value always preserve the initial majority.
        let inputs = (0..9).map(|i| vec![NodeId::from(i)]).collect();
        let mut network = BooleanNetwork::from_inputs(inputs).unwrap();
        network.set_rule_values(&vec![vec![0, 1]; 9]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let score = density_test(&mut network, &mut rng, 20, synchronous_update);
        assert!(score >= 0.5);
        assert_eq!(0.0, density_test(&mut network, &mut rng, 0, synchronous_update));
    }
}
