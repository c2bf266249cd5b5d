//! A library for simulating random Boolean networks (RBNs) and their classical, synchronously
//! updated variant (CRBNs).
//!
//! A network consists of binary nodes. Every node reads an ordered list of input nodes and
//! maps their current values to its next value using a truth table (`RuleTable`). Typical use
//! follows the pipeline below:
//!
//!  1. Build connectivity using one of the generators in `topology` (or import an edge list
//!     or a degree matrix).
//!  2. Attach rule tables, either random (`BooleanNetwork::generate_random_rules`) or
//!     imported (`BooleanNetwork::set_rules`).
//!  3. Seed the initial state (`BooleanNetwork::seed`, `BooleanNetwork::set_state`, ...).
//!  4. Advance the state using an `update::UpdateScheduler`.
//!  5. Measure the trajectory using functions in `statistics`.
//!
//! ```rust
//! use rbn_dynamics::topology::exact_degree;
//! use rbn_dynamics::update::{UpdateDiscipline, UpdateScheduler};
//! use rbn_dynamics::{statistics, BooleanNetwork};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let matrix = exact_degree(16, 2, &mut rng);
//! let mut network = BooleanNetwork::from_degree_matrix(&matrix).unwrap();
//! network.generate_random_rules(&mut rng).unwrap();
//! network.seed(0.5, &mut rng);
//!
//! let mut scheduler = UpdateScheduler::new(StdRng::seed_from_u64(8));
//! scheduler.run(&mut network, UpdateDiscipline::Synchronous, 10);
//! let density = statistics::density(&network, statistics::majority(&network));
//! assert!((0.5..=1.0).contains(&density));
//! ```
//!
//! All stochastic operations take an explicit random source, so every trajectory can be
//! reproduced from a seed.

use std::iter::Map;
use std::ops::Range;

pub mod statistics;
pub mod topology;
pub mod update;

/// **(internal)** The `RbnError` type shared by all fallible operations.
mod error;
/// **(internal)** Construction, rule management, seeding and export of `BooleanNetwork`s.
mod _impl_boolean_network;
/// **(internal)** Utility methods for `InputEdge`.
mod _impl_input_edge;
/// **(internal)** Bit-packed snapshots of the global network state.
mod _impl_network_state;
/// **(internal)** Utility methods for `Node`.
mod _impl_node;
/// **(internal)** Utility methods for `NodeId`.
mod _impl_node_id;
/// **(internal)** Construction and evaluation of `RuleTable`s.
mod _impl_rule_table;

pub use error::RbnError;

/// The value marking an unused slot of a degree matrix.
pub const UNUSED_SLOT: isize = -1;

/// The largest in-degree for which a `RuleTable` can be materialised (the table has
/// `2^arity` entries).
pub const MAX_ARITY: usize = 24;

/// A type-safe index of a `Node` inside a `BooleanNetwork`.
///
/// Ids are assigned consecutively when the network is constructed and are never reused.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(usize);

/// A directed input relationship: `from` is an input of `to`.
///
/// This is the only edge orientation used by the library. Constructing a network from
/// a list of edges appends `from` to the input list of `to`, and `BooleanNetwork::edges`
/// exports the same orientation.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputEdge {
    pub from: NodeId,
    pub to: NodeId,
}

/// A topology in matrix form: row `i` lists the inputs of node `i`, and slots equal to
/// `UNUSED_SLOT` are ignored.
pub type DegreeMatrix = Vec<Vec<isize>>;

/// A truth table of a single Boolean function with `arity` ordered inputs.
///
/// The table always has exactly `2^arity` entries. Entry `i` is the output of the function
/// for the input valuation whose binary encoding is `i`, with the *first* input as the
/// most significant bit.
///
/// Deserialized tables are validated the same way as `RuleTable::try_from_outputs`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "crate::_impl_rule_table::RawRuleTable")
)]
pub struct RuleTable {
    arity: usize,
    outputs: Vec<bool>,
}

/// A single node of a `BooleanNetwork`.
///
/// Inputs are stored as `NodeId`s into the owning network. Duplicate inputs and self-loops
/// are allowed. A node has no `RuleTable` until rules are generated or imported; such a node
/// always evaluates to `false`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    id: NodeId,
    state: bool,
    buffer: bool,
    inputs: Vec<NodeId>,
    rule: Option<RuleTable>,
}

/// A random Boolean network: a fixed-size array of nodes together with the derived
/// fan-out index (for every node, the set of nodes which read it as an input).
///
/// The topology is fixed once the network is constructed; only rules and state change.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BooleanNetwork {
    nodes: Vec<Node>,
    fanout: Vec<Vec<NodeId>>,
}

/// An exact snapshot of the values of all nodes of a `BooleanNetwork`.
///
/// Snapshots are bit-packed so that long trajectories can be stored cheaply.
#[derive(Clone, PartialEq)]
pub struct NetworkState {
    len: usize,
    values: bitvector::BitVector,
}

/// An iterator over all `NodeId`s of a `BooleanNetwork`.
pub type NodeIdIterator = Map<Range<usize>, fn(usize) -> NodeId>;
