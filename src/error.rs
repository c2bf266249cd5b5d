/// Errors reported by network construction, rule management and generators.
///
/// All errors are detected synchronously by the call that returns them. A call that fails
/// never leaves a partially modified network behind.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RbnError {
    /// A topology refers to a node outside of the network, or its shape is inconsistent.
    #[error("Malformed topology: {0}")]
    MalformedTopology(String),
    /// A rule table does not have `2^arity` entries, or the arity is not supported.
    #[error("Invalid rule table: {0}")]
    RuleShape(String),
    /// No degree sequence satisfying the capacity bound was drawn within the retry limit.
    #[error("No degree sequence within capacity {capacity} found after {attempts} attempts.")]
    DistributionInfeasible { capacity: usize, attempts: usize },
    /// The parameters of a degree distribution do not describe a valid distribution.
    #[error("Invalid degree distribution: {0}")]
    InvalidDistribution(String),
    /// A node id lookup failed.
    #[error("Node {index} is out of range for a network of size {size}.")]
    IndexOutOfRange { index: usize, size: usize },
}
