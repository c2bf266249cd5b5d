use crate::{NetworkState, RbnError};

/* `bitvector::BitVector` does not implement `Eq`, but equality of snapshots is total. */
impl Eq for NetworkState {}

impl NetworkState {
    /// **(internal)** Pack `values` (one per node, in node order) into a snapshot of `len` nodes.
    pub(crate) fn from_values<I>(len: usize, values: I) -> NetworkState
    where
        I: IntoIterator<Item = bool>,
    {
        let mut bits = bitvector::BitVector::new(len);
        for (i, value) in values.into_iter().take(len).enumerate() {
            if value {
                bits.insert(i);
            }
        }
        NetworkState { len, values: bits }
    }

    /// Number of nodes covered by this snapshot.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Value of the node at `index`, or an error if the snapshot does not cover it.
    pub fn get(&self, index: usize) -> Result<bool, RbnError> {
        if index < self.len {
            Ok(self.values.contains(index))
        } else {
            Err(RbnError::IndexOutOfRange {
                index,
                size: self.len,
            })
        }
    }

    /// Values of all nodes, in node order.
    pub fn values(&self) -> Vec<bool> {
        (0..self.len).map(|i| self.values.contains(i)).collect()
    }

    /// Indices of nodes in state `true`.
    pub fn ones(&self) -> Vec<usize> {
        self.values.iter().collect()
    }
}
