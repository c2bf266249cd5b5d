use crate::{
    BooleanNetwork, DegreeMatrix, InputEdge, NetworkState, Node, NodeId, NodeIdIterator,
    RbnError, RuleTable, UNUSED_SLOT,
};
use rand::Rng;
use std::ops::Index;
use tracing::debug;

/// Methods for safely constructing new instances of `BooleanNetwork`s.
///
/// Every constructor validates its whole input first, so a failed call never produces
/// a partially connected network.
impl BooleanNetwork {
    /// Construct a network where `inputs[i]` is the ordered list of inputs of node `i`.
    pub fn from_inputs(inputs: Vec<Vec<NodeId>>) -> Result<BooleanNetwork, RbnError> {
        let size = inputs.len();
        for (target, node_inputs) in inputs.iter().enumerate() {
            for input in node_inputs {
                if input.0 >= size {
                    return Err(RbnError::MalformedTopology(format!(
                        "Input {} of node {} is outside of a network of size {}.",
                        input.0, target, size
                    )));
                }
            }
        }

        let nodes: Vec<Node> = inputs
            .into_iter()
            .enumerate()
            .map(|(i, node_inputs)| Node::new(NodeId(i), node_inputs))
            .collect();
        let fanout = build_fanout(&nodes);
        let network = BooleanNetwork { nodes, fanout };
        debug!(
            size = network.num_nodes(),
            mean_in_degree = network.average_in_degree(),
            "Network constructed"
        );
        Ok(network)
    }

    /// Construct a network of `size` nodes from a list of `InputEdge`s.
    ///
    /// Each edge appends `from` to the inputs of `to`, so the input order of a node follows
    /// the order of its edges in the list. Repeated edges are kept.
    pub fn from_edges(size: usize, edges: &[InputEdge]) -> Result<BooleanNetwork, RbnError> {
        let mut inputs = vec![Vec::new(); size];
        for edge in edges {
            if edge.from.0 >= size || edge.to.0 >= size {
                return Err(RbnError::MalformedTopology(format!(
                    "Edge {} is outside of a network of size {}.",
                    edge, size
                )));
            }
            inputs[edge.to.0].push(edge.from);
        }
        Self::from_inputs(inputs)
    }

    /// Construct a network from a degree matrix: row `i` lists the inputs of node `i`
    /// and slots equal to `UNUSED_SLOT` are skipped. All rows must have the same width.
    pub fn from_degree_matrix(matrix: &[Vec<isize>]) -> Result<BooleanNetwork, RbnError> {
        let size = matrix.len();
        let width = matrix.first().map(|row| row.len()).unwrap_or(0);
        let mut inputs = Vec::with_capacity(size);
        for (target, row) in matrix.iter().enumerate() {
            if row.len() != width {
                return Err(RbnError::MalformedTopology(format!(
                    "Row {} has width {}, but the matrix has width {}.",
                    target,
                    row.len(),
                    width
                )));
            }
            let mut node_inputs = Vec::with_capacity(row.len());
            for slot in row {
                if *slot == UNUSED_SLOT {
                    continue;
                }
                if *slot < 0 || *slot as usize >= size {
                    return Err(RbnError::MalformedTopology(format!(
                        "Slot value {} in row {} is outside of a network of size {}.",
                        slot, target, size
                    )));
                }
                node_inputs.push(NodeId(*slot as usize));
            }
            inputs.push(node_inputs);
        }
        Self::from_inputs(inputs)
    }
}

/// Some basic utility methods for inspecting the topology of a `BooleanNetwork`.
impl BooleanNetwork {
    /// The number of nodes in this `BooleanNetwork`.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// An iterator over all `NodeId`s of this network.
    pub fn node_ids(&self) -> NodeIdIterator {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Return the `Node` with the given id, or an error if it is not part of this network.
    pub fn node(&self, id: NodeId) -> Result<&Node, RbnError> {
        self.nodes.get(id.0).ok_or(RbnError::IndexOutOfRange {
            index: id.0,
            size: self.nodes.len(),
        })
    }

    /// All nodes of this network, ordered by id.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Ordered inputs of the given node.
    pub fn inputs(&self, id: NodeId) -> Result<&[NodeId], RbnError> {
        self.node(id).map(|node| node.inputs())
    }

    /// Sorted list of nodes which read the given node as an input (each listed once).
    pub fn fanout(&self, id: NodeId) -> Result<&[NodeId], RbnError> {
        self.check_id(id)?;
        Ok(&self.fanout[id.0])
    }

    /// Number of inputs of every node.
    pub fn in_degrees(&self) -> Vec<usize> {
        self.nodes.iter().map(|node| node.in_degree()).collect()
    }

    /// Number of times every node is used as an input (duplicate inputs count repeatedly).
    pub fn out_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.nodes.len()];
        for node in &self.nodes {
            for input in node.inputs() {
                degrees[input.0] += 1;
            }
        }
        degrees
    }

    /// Mean number of inputs per node (zero for an empty network).
    pub fn average_in_degree(&self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        let total: usize = self.nodes.iter().map(|node| node.in_degree()).sum();
        total as f64 / self.nodes.len() as f64
    }

    /// Export the topology as a list of `InputEdge`s, grouped by target node and ordered
    /// by input position. `BooleanNetwork::from_edges` reconstructs the same network.
    pub fn edges(&self) -> Vec<InputEdge> {
        self.nodes
            .iter()
            .flat_map(|node| {
                node.inputs()
                    .iter()
                    .map(move |input| InputEdge::new(*input, node.id()))
            })
            .collect()
    }

    /// Export the topology as a degree matrix with rows of the given `width`, padded with
    /// `UNUSED_SLOT`. Fails if some node has more than `width` inputs.
    pub fn to_degree_matrix(&self, width: usize) -> Result<DegreeMatrix, RbnError> {
        let mut matrix = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if node.in_degree() > width {
                return Err(RbnError::MalformedTopology(format!(
                    "Node {} has {} inputs, which do not fit into a row of width {}.",
                    node.id().0,
                    node.in_degree(),
                    width
                )));
            }
            let mut row: Vec<isize> = node.inputs().iter().map(|it| it.0 as isize).collect();
            row.resize(width, UNUSED_SLOT);
            matrix.push(row);
        }
        Ok(matrix)
    }

    /// **(internal)** Utility method to safely check a node id (using an appropriate error).
    fn check_id(&self, id: NodeId) -> Result<(), RbnError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(RbnError::IndexOutOfRange {
                index: id.0,
                size: self.nodes.len(),
            })
        }
    }
}

/// Methods for assigning and exporting rule tables.
impl BooleanNetwork {
    /// Assign a fresh uniformly random `RuleTable` to every node (arity = in-degree).
    ///
    /// Fails without modifying the network if some node has too many inputs.
    pub fn generate_random_rules<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), RbnError> {
        let mut tables = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            tables.push(RuleTable::random(node.in_degree(), rng)?);
        }
        for (node, table) in self.nodes.iter_mut().zip(tables) {
            node.set_rule(table);
        }
        Ok(())
    }

    /// Replace the rule tables of all nodes. There must be one table per node, and the
    /// arity of each table must match the in-degree of its node.
    pub fn set_rules(&mut self, tables: Vec<RuleTable>) -> Result<(), RbnError> {
        if tables.len() != self.nodes.len() {
            return Err(RbnError::RuleShape(format!(
                "Expected {} rule tables, but {} were given.",
                self.nodes.len(),
                tables.len()
            )));
        }
        for (node, table) in self.nodes.iter().zip(&tables) {
            Self::assert_rule_fits(node, table)?;
        }
        for (node, table) in self.nodes.iter_mut().zip(tables) {
            node.set_rule(table);
        }
        Ok(())
    }

    /// Replace the rule tables of all nodes using `0`/`1` values. Row `i` must contain
    /// exactly `2^k` values, where `k` is the in-degree of node `i`.
    pub fn set_rule_values(&mut self, values: &[Vec<u8>]) -> Result<(), RbnError> {
        if values.len() != self.nodes.len() {
            return Err(RbnError::RuleShape(format!(
                "Expected {} rule tables, but {} were given.",
                self.nodes.len(),
                values.len()
            )));
        }
        let tables = self
            .nodes
            .iter()
            .zip(values)
            .map(|(node, row)| RuleTable::try_from_values(node.in_degree(), row))
            .collect::<Result<Vec<_>, _>>()?;
        self.set_rules(tables)
    }

    /// Replace the rule table of a single node.
    pub fn set_rule(&mut self, id: NodeId, table: RuleTable) -> Result<(), RbnError> {
        self.check_id(id)?;
        Self::assert_rule_fits(&self.nodes[id.0], &table)?;
        self.nodes[id.0].set_rule(table);
        Ok(())
    }

    /// Rule tables of all nodes (`None` for nodes without a rule).
    pub fn rule_tables(&self) -> Vec<Option<&RuleTable>> {
        self.nodes.iter().map(|node| node.rule()).collect()
    }

    /// Rule tables of all nodes as `0`/`1` values. Nodes without a rule yield an empty row.
    pub fn rule_values(&self) -> Vec<Vec<u8>> {
        self.nodes
            .iter()
            .map(|node| node.rule().map(|r| r.to_values()).unwrap_or_default())
            .collect()
    }

    /// **(internal)** Utility method to ensure a table has the arity of the node.
    fn assert_rule_fits(node: &Node, table: &RuleTable) -> Result<(), RbnError> {
        if table.arity() == node.in_degree() {
            Ok(())
        } else {
            Err(RbnError::RuleShape(format!(
                "Node {} has {} inputs, but its rule table has arity {}.",
                node.id().0,
                node.in_degree(),
                table.arity()
            )))
        }
    }
}

/// Methods for reading and seeding the state of a `BooleanNetwork`.
impl BooleanNetwork {
    /// Current value of every node.
    pub fn state(&self) -> Vec<bool> {
        self.nodes.iter().map(|node| node.state()).collect()
    }

    /// Current value of every node as a compact snapshot.
    pub fn snapshot(&self) -> NetworkState {
        NetworkState::from_values(self.nodes.len(), self.nodes.iter().map(|node| node.state()))
    }

    /// Current value of a single node.
    pub fn node_state(&self, id: NodeId) -> Result<bool, RbnError> {
        self.node(id).map(|node| node.state())
    }

    /// Set the value of every node. `state` must have one entry per node.
    pub fn set_state(&mut self, state: &[bool]) -> Result<(), RbnError> {
        if state.len() != self.nodes.len() {
            return Err(RbnError::MalformedTopology(format!(
                "State of length {} does not match a network of size {}.",
                state.len(),
                self.nodes.len()
            )));
        }
        for (node, value) in self.nodes.iter_mut().zip(state) {
            node.set_state(*value);
        }
        Ok(())
    }

    /// Restore the values stored in a snapshot taken from a network of the same size.
    pub fn restore(&mut self, snapshot: &NetworkState) -> Result<(), RbnError> {
        self.set_state(&snapshot.values())
    }

    /// Set the value of a single node.
    pub fn set_node_state(&mut self, id: NodeId, value: bool) -> Result<(), RbnError> {
        self.check_id(id)?;
        self.nodes[id.0].set_state(value);
        Ok(())
    }

    /// Set every node to `false`.
    pub fn reset_state(&mut self) {
        for node in self.nodes.iter_mut() {
            node.set_state(false);
        }
    }

    /// Set every node to `true` independently with probability `p` (clamped to `[0,1]`).
    ///
    /// The resulting fraction of `true` nodes only approximates `p`.
    pub fn seed<R: Rng + ?Sized>(&mut self, p: f64, rng: &mut R) {
        let p = clamp_probability(p);
        for node in self.nodes.iter_mut() {
            node.set_state(rng.gen::<f64>() < p);
        }
    }

    /// Reset the network and then switch random nodes to `true` until at least
    /// a fraction `p` (clamped to `[0,1]`) of the network is `true`.
    pub fn seed_exact<R: Rng + ?Sized>(&mut self, p: f64, rng: &mut R) {
        self.reset_state();
        let size = self.nodes.len();
        if size == 0 {
            return;
        }
        let p = clamp_probability(p);
        let mut ones = 0;
        while (ones as f64) / (size as f64) < p {
            let node = &mut self.nodes[rng.gen_range(0..size)];
            if !node.state() {
                node.set_state(true);
                ones += 1;
            }
        }
    }

    /// Fraction of nodes in state `true` (zero for an empty network).
    pub fn composition(&self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        let ones = self.nodes.iter().filter(|node| node.state()).count();
        ones as f64 / self.nodes.len() as f64
    }

    /// The value the given node would take if it was updated now.
    pub fn next_state(&self, id: NodeId) -> Result<bool, RbnError> {
        self.check_id(id)?;
        Ok(self.evaluate(id.0))
    }
}

/// **(internal)** Primitive node updates used by the schedulers in `update`.
impl BooleanNetwork {
    /// Evaluate the rule of the node at `index` using the current state.
    pub(crate) fn evaluate(&self, index: usize) -> bool {
        self.nodes[index].evaluate(|input| self.nodes[input.0].state())
    }

    /// Store the next value of the node at `index` in its buffer. Returns `true` if the
    /// buffered value differs from the current state.
    pub(crate) fn buffer_node(&mut self, index: usize) -> bool {
        let value = self.evaluate(index);
        self.nodes[index].set_buffer(value)
    }

    pub(crate) fn swap_node(&mut self, index: usize) {
        self.nodes[index].swap_buffer();
    }

    /// Evaluate the node at `index` and apply the new value immediately.
    pub(crate) fn update_node_now(&mut self, index: usize) {
        let value = self.evaluate(index);
        self.nodes[index].set_state(value);
    }

    pub(crate) fn fanout_of(&self, index: usize) -> &[NodeId] {
        &self.fanout[index]
    }
}

impl Index<NodeId> for BooleanNetwork {
    type Output = Node;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index.0]
    }
}

/// **(internal)** Compute the sorted, duplicate-free fan-out sets of all nodes.
fn build_fanout(nodes: &[Node]) -> Vec<Vec<NodeId>> {
    let mut fanout: Vec<Vec<NodeId>> = vec![Vec::new(); nodes.len()];
    for node in nodes {
        for input in node.inputs() {
            fanout[input.0].push(node.id());
        }
    }
    for targets in fanout.iter_mut() {
        targets.sort();
        targets.dedup();
    }
    fanout
}

/// **(internal)** Clamp a probability into `[0,1]`; `NaN` becomes zero.
fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        BooleanNetwork, InputEdge, NodeId, RbnError, RuleTable, MAX_ARITY, UNUSED_SLOT,
    };
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn ids(items: &[usize]) -> Vec<NodeId> {
        items.iter().map(|it| NodeId::from(*it)).collect()
    }

    #[test]
    fn edge_list_direction() {
        let edges = vec![
            InputEdge::from((0, 1)),
            InputEdge::from((2, 1)),
            InputEdge::from((1, 0)),
            InputEdge::from((2, 2)),
            InputEdge::from((2, 2)),
        ];
        let network = BooleanNetwork::from_edges(3, &edges).unwrap();
        assert_eq!(ids(&[1]), network.inputs(NodeId::from(0)).unwrap().to_vec());
        assert_eq!(ids(&[0, 2]), network.inputs(NodeId::from(1)).unwrap().to_vec());
        assert_eq!(ids(&[2, 2]), network.inputs(NodeId::from(2)).unwrap().to_vec());
        assert_eq!(ids(&[1]), network.fanout(NodeId::from(0)).unwrap().to_vec());
        assert_eq!(ids(&[1, 2]), network.fanout(NodeId::from(2)).unwrap().to_vec());
        assert_eq!(vec![1, 1, 3], network.out_degrees());
        assert_eq!(edges.len(), network.edges().len());
    }

    #[test]
    fn reversed_edges_transpose_the_network() {
        let edges = vec![
            InputEdge::from((0, 1)),
            InputEdge::from((1, 2)),
            InputEdge::from((0, 2)),
        ];
        let network = BooleanNetwork::from_edges(3, &edges).unwrap();
        let reversed: Vec<InputEdge> = edges.iter().map(|e| e.reversed()).collect();
        let transposed = BooleanNetwork::from_edges(3, &reversed).unwrap();
        for id in network.node_ids() {
            let inputs: HashSet<NodeId> = network.inputs(id).unwrap().iter().cloned().collect();
            let fanout: HashSet<NodeId> =
                transposed.fanout(id).unwrap().iter().cloned().collect();
            assert_eq!(inputs, fanout);
        }
    }

    #[test]
    fn invalid_edges_are_rejected() {
        let result = BooleanNetwork::from_edges(2, &[InputEdge::from((0, 2))]);
        assert!(matches!(result, Err(RbnError::MalformedTopology(_))));
    }

    #[test]
    fn degree_matrix_with_sentinels() {
        let matrix = vec![
            vec![1, UNUSED_SLOT, 2],
            vec![UNUSED_SLOT, UNUSED_SLOT, UNUSED_SLOT],
            vec![0, 0, 1],
        ];
        let network = BooleanNetwork::from_degree_matrix(&matrix).unwrap();
        assert_eq!(vec![2, 0, 3], network.in_degrees());
        assert_eq!(5.0 / 3.0, network.average_in_degree());
        assert_eq!(
            vec![vec![1, 2, -1], vec![-1, -1, -1], vec![0, 0, 1]],
            network.to_degree_matrix(3).unwrap()
        );
        assert!(network.to_degree_matrix(2).is_err());
    }

    #[test]
    fn degree_matrix_out_of_range() {
        assert!(BooleanNetwork::from_degree_matrix(&[vec![0, 3], vec![1, 1]]).is_err());
        assert!(BooleanNetwork::from_degree_matrix(&[vec![-2]]).is_err());
    }

    #[test]
    fn ragged_degree_matrix() {
        let result = BooleanNetwork::from_degree_matrix(&[vec![0, UNUSED_SLOT], vec![1]]);
        assert!(matches!(result, Err(RbnError::MalformedTopology(_))));
        let empty = BooleanNetwork::from_degree_matrix(&[]).unwrap();
        assert_eq!(0, empty.num_nodes());
    }

    #[test]
    fn matrix_round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let matrix = crate::topology::approximate_mean_degree(30, 2.5, 5, &mut rng)
            .unwrap()
            .matrix;
        let network = BooleanNetwork::from_degree_matrix(&matrix).unwrap();
        let copy = BooleanNetwork::from_degree_matrix(&network.to_degree_matrix(5).unwrap())
            .unwrap();
        let copy_from_edges = BooleanNetwork::from_edges(30, &network.edges()).unwrap();
        for id in network.node_ids() {
            assert_eq!(network.inputs(id), copy.inputs(id));
            assert_eq!(network.inputs(id), copy_from_edges.inputs(id));
        }
    }

    #[test]
    fn rules_are_validated_atomically() {
        let mut network = BooleanNetwork::from_inputs(vec![ids(&[1]), ids(&[0, 1])]).unwrap();
        let tables = vec![
            RuleTable::try_from_values(1, &[1, 0]).unwrap(),
            RuleTable::try_from_values(1, &[1, 0]).unwrap(),
        ];
        assert!(network.set_rules(tables).is_err());
        assert!(network.rule_tables().iter().all(|it| it.is_none()));

        network
            .set_rule_values(&[vec![1, 0], vec![0, 0, 0, 1]])
            .unwrap();
        assert_eq!(vec![vec![1, 0], vec![0, 0, 0, 1]], network.rule_values());
        assert!(network.set_rule_values(&[vec![1, 0]]).is_err());
    }

    #[test]
    fn random_rules_match_in_degree() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut network =
            BooleanNetwork::from_inputs(vec![ids(&[]), ids(&[0]), ids(&[0, 1, 2])]).unwrap();
        network.generate_random_rules(&mut rng).unwrap();
        let arities: Vec<usize> = network
            .rule_tables()
            .into_iter()
            .map(|it| it.unwrap().arity())
            .collect();
        assert_eq!(vec![0, 1, 3], arities);
    }

    #[test]
    fn random_rules_fail_without_changes() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let wide = vec![NodeId::from(0); MAX_ARITY + 1];
        let mut network = BooleanNetwork::from_inputs(vec![ids(&[]), wide]).unwrap();
        assert!(matches!(
            network.generate_random_rules(&mut rng),
            Err(RbnError::RuleShape(_))
        ));
        assert!(network.rule_tables().iter().all(|it| it.is_none()));
    }

    #[test]
    fn state_operations() {
        let mut network = BooleanNetwork::from_inputs(vec![ids(&[]); 4]).unwrap();
        network.set_state(&[true, false, true, true]).unwrap();
        assert_eq!(0.75, network.composition());
        assert_eq!(vec![0, 2, 3], network.snapshot().ones());
        assert_eq!(Ok(false), network.snapshot().get(1));
        assert!(network.set_state(&[true]).is_err());
        assert_eq!(vec![true, false, true, true], network.state());

        let snapshot = network.snapshot();
        network.reset_state();
        assert_eq!(0.0, network.composition());
        network.restore(&snapshot).unwrap();
        assert_eq!(Ok(true), network.node_state(NodeId::from(3)));
        assert_eq!(
            Err(RbnError::IndexOutOfRange { index: 4, size: 4 }),
            network.node_state(NodeId::from(4))
        );
    }

    #[test]
    fn seeding() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut network = BooleanNetwork::from_inputs(vec![ids(&[]); 200]).unwrap();
        network.seed(1.0, &mut rng);
        assert_eq!(1.0, network.composition());
        network.seed(0.0, &mut rng);
        assert_eq!(0.0, network.composition());
        network.seed(0.5, &mut rng);
        assert!((network.composition() - 0.5).abs() < 0.15);
        network.seed_exact(0.3, &mut rng);
        assert_eq!(0.3, network.composition());
        network.seed_exact(2.0, &mut rng);
        assert_eq!(1.0, network.composition());
    }
}
