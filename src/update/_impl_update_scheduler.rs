use crate::update::{UpdateDiscipline, UpdateScheduler};
use crate::{BooleanNetwork, NodeId, RbnError};
use fxhash::FxHashSet;
use rand::Rng;
use tracing::trace;

/// Perform one synchronous tick: every node is evaluated against the pre-tick state,
/// then all nodes switch to their new values.
pub fn synchronous_update(network: &mut BooleanNetwork) {
    let size = network.num_nodes();
    two_phase_update(network, 0..size);
}

/// **(internal)** Evaluate all `nodes` against the current state, then apply all of them.
/// The result does not depend on the order of `nodes`.
pub(crate) fn two_phase_update<I>(network: &mut BooleanNetwork, nodes: I)
where
    I: Iterator<Item = usize> + Clone,
{
    for i in nodes.clone() {
        network.buffer_node(i);
    }
    for i in nodes {
        network.swap_node(i);
    }
}

impl<R: Rng> UpdateScheduler<R> {
    /// A new scheduler with an empty frontier.
    pub fn new(rng: R) -> UpdateScheduler<R> {
        UpdateScheduler {
            rng,
            frontier: FxHashSet::default(),
        }
    }

    /// Random source used by the asynchronous discipline.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Sorted list of nodes scheduled for the next cascade or event-driven tick.
    pub fn frontier(&self) -> Vec<NodeId> {
        let mut frontier: Vec<NodeId> = self.frontier.iter().cloned().collect();
        frontier.sort();
        frontier
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Remove all nodes from the frontier.
    pub fn reset_frontier(&mut self) {
        self.frontier.clear();
    }

    /// Add `nodes` to the frontier. Adding a node that is already scheduled has no effect.
    ///
    /// All ids are validated against `network` first; on error, the frontier is unchanged.
    pub fn set_frontier(
        &mut self,
        network: &BooleanNetwork,
        nodes: &[NodeId],
    ) -> Result<(), RbnError> {
        for id in nodes {
            network.node(*id)?;
        }
        self.frontier.extend(nodes.iter().cloned());
        Ok(())
    }

    /// Schedule every node of `network`.
    pub fn set_full_frontier(&mut self, network: &BooleanNetwork) {
        self.frontier.extend(network.node_ids());
    }

    /// One synchronous tick. See `synchronous_update`.
    pub fn synchronous(&mut self, network: &mut BooleanNetwork) {
        synchronous_update(network);
    }

    /// Update one uniformly random node, applying its new value immediately.
    pub fn asynchronous(&mut self, network: &mut BooleanNetwork) {
        if network.num_nodes() == 0 {
            return;
        }
        let index = self.rng.gen_range(0..network.num_nodes());
        network.update_node_now(index);
    }

    /// Update every node in the frontier (two-phase), then replace the frontier with
    /// the fan-out of all updated nodes.
    pub fn cascade(&mut self, network: &mut BooleanNetwork) {
        self.frontier_update(network, false);
    }

    /// Like `cascade`, but only nodes whose value changed add their fan-out
    /// to the next frontier.
    pub fn event_driven(&mut self, network: &mut BooleanNetwork) {
        self.frontier_update(network, true);
    }

    /// Replace the frontier with the fan-out of its nodes without updating any node.
    pub fn propagate_frontier(&mut self, network: &BooleanNetwork) {
        let current = self.take_frontier(network);
        for i in current {
            self.frontier.extend(network.fanout_of(i).iter().cloned());
        }
    }

    /// Perform one tick of the given discipline.
    pub fn step(&mut self, network: &mut BooleanNetwork, discipline: UpdateDiscipline) {
        match discipline {
            UpdateDiscipline::Synchronous => self.synchronous(network),
            UpdateDiscipline::Asynchronous => self.asynchronous(network),
            UpdateDiscipline::Cascade => self.cascade(network),
            UpdateDiscipline::EventDriven => self.event_driven(network),
        }
    }

    /// Perform `ticks` ticks of the given discipline.
    pub fn run(
        &mut self,
        network: &mut BooleanNetwork,
        discipline: UpdateDiscipline,
        ticks: usize,
    ) {
        for _ in 0..ticks {
            self.step(network, discipline);
        }
    }

    /// **(internal)** Shared implementation of cascade and event-driven ticks.
    fn frontier_update(&mut self, network: &mut BooleanNetwork, only_changed: bool) {
        let current = self.take_frontier(network);
        let mut changed = Vec::with_capacity(current.len());
        for i in &current {
            changed.push(network.buffer_node(*i));
        }
        for i in &current {
            network.swap_node(*i);
        }
        for (i, was_changed) in current.iter().zip(changed) {
            if was_changed || !only_changed {
                self.frontier.extend(network.fanout_of(*i).iter().cloned());
            }
        }
        trace!(
            updated = current.len(),
            next = self.frontier.len(),
            only_changed,
            "Frontier tick"
        );
    }

    /// **(internal)** Empty the frontier, returning the indices of its nodes that belong
    /// to `network` in ascending order.
    fn take_frontier(&mut self, network: &BooleanNetwork) -> Vec<usize> {
        let mut current: Vec<usize> = self
            .frontier
            .drain()
            .map(|id| id.to_index())
            .filter(|i| *i < network.num_nodes())
            .collect();
        current.sort_unstable();
        current
    }
}
