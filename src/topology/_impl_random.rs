use crate::topology::GeneratedTopology;
use crate::{DegreeMatrix, InputEdge, NodeId, RbnError, RuleTable, UNUSED_SLOT};
use rand::Rng;
use tracing::{debug, warn};

/// Add uniformly random edges until the mean in-degree reaches `k`.
///
/// Each edge is placed into the first unused slot of a destination drawn uniformly from
/// the nodes that still have fewer than `max_k` inputs, and its source is drawn uniformly
/// from all nodes. A node that reaches `max_k` inputs leaves the destination pool. If every
/// node saturates before the mean reaches `k`, generation stops early and the reached mean is
/// reported with `saturated` set.
pub fn approximate_mean_degree<R: Rng + ?Sized>(
    size: usize,
    k: f64,
    max_k: usize,
    rng: &mut R,
) -> Result<GeneratedTopology, RbnError> {
    if k.is_nan() {
        return Err(RbnError::MalformedTopology(
            "Target mean degree is not a number.".to_string(),
        ));
    }
    let mut matrix: DegreeMatrix = vec![vec![UNUSED_SLOT; max_k]; size];
    let mut used = vec![0usize; size];
    let mut open: Vec<usize> = if max_k > 0 {
        (0..size).collect()
    } else {
        Vec::new()
    };

    let mut connections = 0usize;
    let mut saturated = false;
    while size > 0 && (connections as f64) / (size as f64) < k {
        if open.is_empty() {
            saturated = true;
            break;
        }
        let slot = rng.gen_range(0..open.len());
        let node = open[slot];
        matrix[node][used[node]] = rng.gen_range(0..size) as isize;
        used[node] += 1;
        connections += 1;
        if used[node] == max_k {
            open.swap_remove(slot);
        }
    }

    let mean_in_degree = if size == 0 {
        0.0
    } else {
        connections as f64 / size as f64
    };
    if saturated {
        warn!(
            size,
            target = k,
            reached = mean_in_degree,
            max_k,
            "All nodes saturated before the target mean degree was reached"
        );
    } else {
        debug!(size, mean_in_degree, max_k, "Random topology generated");
    }
    Ok(GeneratedTopology {
        matrix,
        mean_in_degree,
        saturated,
    })
}

/// Give every node exactly `k` inputs drawn uniformly (with replacement) from all nodes.
pub fn exact_degree<R: Rng + ?Sized>(size: usize, k: usize, rng: &mut R) -> DegreeMatrix {
    if size == 0 {
        return Vec::new();
    }
    (0..size)
        .map(|_| (0..k).map(|_| rng.gen_range(0..size) as isize).collect())
        .collect()
}

/// Distribute exactly `size * k` inputs over randomly chosen destinations, such that no node
/// receives more than `max_k` inputs. Sources are drawn uniformly from all nodes.
///
/// Fails if `k > max_k`, since the inputs cannot fit into the matrix.
pub fn exact_total_degree<R: Rng + ?Sized>(
    size: usize,
    k: usize,
    max_k: usize,
    rng: &mut R,
) -> Result<DegreeMatrix, RbnError> {
    if k > max_k {
        return Err(RbnError::MalformedTopology(format!(
            "Mean degree {} does not fit into rows of width {}.",
            k, max_k
        )));
    }
    let mut matrix: DegreeMatrix = vec![vec![UNUSED_SLOT; max_k]; size];
    let mut used = vec![0usize; size];
    let mut open: Vec<usize> = (0..size).collect();
    let mut remaining = size * k;
    while remaining > 0 {
        // Capacity is `size * max_k >= size * k`, so the pool cannot run dry here.
        let slot = rng.gen_range(0..open.len());
        let node = open[slot];
        if used[node] == max_k {
            open.swap_remove(slot);
            continue;
        }
        matrix[node][used[node]] = rng.gen_range(0..size) as isize;
        used[node] += 1;
        remaining -= 1;
    }
    Ok(matrix)
}

/// Append uniformly random edges until there are at least `k` edges per node.
/// No per-node limit is enforced.
pub fn random_edge_list<R: Rng + ?Sized>(size: usize, k: f64, rng: &mut R) -> Vec<InputEdge> {
    let mut edges = Vec::new();
    if size == 0 {
        return edges;
    }
    while (edges.len() as f64) / (size as f64) < k {
        edges.push(InputEdge::new(
            NodeId::from(rng.gen_range(0..size)),
            NodeId::from(rng.gen_range(0..size)),
        ));
    }
    edges
}

/// Generate `count` random rule tables, all of the given `arity`.
pub fn random_rule_tables<R: Rng + ?Sized>(
    count: usize,
    arity: usize,
    rng: &mut R,
) -> Result<Vec<RuleTable>, RbnError> {
    (0..count).map(|_| RuleTable::random(arity, rng)).collect()
}
