use crate::{InputEdge, NodeId};
use std::fmt::{Display, Error, Formatter};

impl InputEdge {
    /// Create an edge which makes `from` an input of `to`.
    pub fn new(from: NodeId, to: NodeId) -> InputEdge {
        InputEdge { from, to }
    }

    /// The same edge with reversed orientation.
    pub fn reversed(self) -> InputEdge {
        InputEdge {
            from: self.to,
            to: self.from,
        }
    }
}

impl From<(usize, usize)> for InputEdge {
    fn from((from, to): (usize, usize)) -> Self {
        InputEdge::new(NodeId(from), NodeId(to))
    }
}

impl Display for InputEdge {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{} -> {}", self.from.0, self.to.0)
    }
}
