//! Update disciplines which advance the state of a `BooleanNetwork` by one tick.
//!
//!  - **Synchronous**: all nodes read the pre-tick state, then all nodes switch at once.
//!  - **Asynchronous**: one uniformly random node is updated and its value applies immediately.
//!  - **Cascade**: only nodes in the frontier are updated (two-phase, like synchronous). The next
//!    frontier contains every node which reads an updated node.
//!  - **Event-driven**: like cascade, but only nodes whose value actually changed propagate
//!    into the next frontier.
//!
//! The synchronous discipline is deterministic and independent of node order. Asynchronous
//! updates draw from the random source owned by the `UpdateScheduler`, which also owns the
//! frontier of the cascade and event-driven disciplines.

use crate::NodeId;
use fxhash::FxHashSet;
use rand::Rng;

/// **(internal)** Implementation of the individual disciplines.
mod _impl_update_scheduler;

pub use _impl_update_scheduler::synchronous_update;

/// One of the supported update disciplines.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateDiscipline {
    Synchronous,
    Asynchronous,
    Cascade,
    EventDriven,
}

/// Advances a `BooleanNetwork` using one of the `UpdateDiscipline`s.
///
/// The scheduler owns the random source used by asynchronous updates and the frontier of
/// nodes pending update under the cascade and event-driven disciplines. The frontier is
/// empty initially; use `set_frontier` to seed it. Updating with an empty frontier is a no-op.
#[derive(Clone, Debug)]
pub struct UpdateScheduler<R: Rng> {
    rng: R,
    frontier: FxHashSet<NodeId>,
}
