use crate::{RbnError, RuleTable, MAX_ARITY};
use rand::Rng;
use std::fmt::{Display, Error, Formatter};

/// Methods for safely constructing new instances of `RuleTable`s.
impl RuleTable {
    /// Create a table of `2^arity` independent, uniformly random outputs.
    ///
    /// This is the classical Kauffman NK rule ensemble.
    pub fn random<R: Rng + ?Sized>(arity: usize, rng: &mut R) -> Result<RuleTable, RbnError> {
        let len = table_length(arity)?;
        Ok(RuleTable {
            arity,
            outputs: (0..len).map(|_| rng.gen_bool(0.5)).collect(),
        })
    }

    /// Create a table which outputs `value` for every input valuation.
    pub fn constant(arity: usize, value: bool) -> Result<RuleTable, RbnError> {
        let len = table_length(arity)?;
        Ok(RuleTable {
            arity,
            outputs: vec![value; len],
        })
    }

    /// Create a table from explicit outputs. The number of `outputs` must be exactly
    /// `2^arity`.
    pub fn try_from_outputs(arity: usize, outputs: Vec<bool>) -> Result<RuleTable, RbnError> {
        let len = table_length(arity)?;
        if outputs.len() != len {
            return Err(RbnError::RuleShape(format!(
                "A function of arity {} needs {} outputs, but {} were given.",
                arity,
                len,
                outputs.len()
            )));
        }
        Ok(RuleTable { arity, outputs })
    }

    /// Create a table from a sequence of `0`/`1` values (the usual exchange format for
    /// rule matrices). Any other value is rejected.
    pub fn try_from_values(arity: usize, values: &[u8]) -> Result<RuleTable, RbnError> {
        let mut outputs = Vec::with_capacity(values.len());
        for (i, value) in values.iter().enumerate() {
            match value {
                0 => outputs.push(false),
                1 => outputs.push(true),
                _ => {
                    return Err(RbnError::RuleShape(format!(
                        "Value {} at position {} is not a Boolean constant.",
                        value, i
                    )))
                }
            }
        }
        Self::try_from_outputs(arity, outputs)
    }
}

/// Basic utility methods for inspecting and evaluating a `RuleTable`.
impl RuleTable {
    /// The number of inputs of this function.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The number of table entries, always `2^arity`.
    pub fn num_entries(&self) -> usize {
        self.outputs.len()
    }

    /// Output of the function for the input valuation encoded as `index`.
    pub fn output(&self, index: usize) -> Result<bool, RbnError> {
        self.outputs
            .get(index)
            .cloned()
            .ok_or(RbnError::IndexOutOfRange {
                index,
                size: self.outputs.len(),
            })
    }

    /// All outputs of the table, ordered by input valuation.
    pub fn outputs(&self) -> &[bool] {
        &self.outputs
    }

    /// The outputs of the table as `0`/`1` values.
    pub fn to_values(&self) -> Vec<u8> {
        self.outputs.iter().map(|it| u8::from(*it)).collect()
    }

    /// **(internal)** Lookup without bounds reporting. The index is always computed from
    /// exactly `arity` input values, so it fits into the table.
    pub(crate) fn lookup(&self, index: usize) -> bool {
        self.outputs[index]
    }
}

impl Display for RuleTable {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{{")?;
        for output in &self.outputs {
            write!(f, "{}", u8::from(*output))?;
        }
        write!(f, "}}")
    }
}

/// **(internal)** Unvalidated `RuleTable` fields, as read by the deserializer.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
pub struct RawRuleTable {
    arity: usize,
    outputs: Vec<bool>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRuleTable> for RuleTable {
    type Error = RbnError;

    fn try_from(raw: RawRuleTable) -> Result<RuleTable, RbnError> {
        RuleTable::try_from_outputs(raw.arity, raw.outputs)
    }
}

/// **(internal)** Number of entries of a table with the given arity, or an error if such
/// table is too large to be materialised.
fn table_length(arity: usize) -> Result<usize, RbnError> {
    if arity > MAX_ARITY {
        Err(RbnError::RuleShape(format!(
            "Arity {} exceeds the supported maximum of {}.",
            arity, MAX_ARITY
        )))
    } else {
        Ok(1 << arity)
    }
}
