use crate::{Node, NodeId, RuleTable};

impl Node {
    /// **(internal)** A new node in state `false` without a rule table.
    pub(crate) fn new(id: NodeId, inputs: Vec<NodeId>) -> Node {
        Node {
            id,
            state: false,
            buffer: false,
            inputs,
            rule: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn state(&self) -> bool {
        self.state
    }

    /// Ordered inputs of this node. The first input is the most significant bit of the
    /// rule table index.
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    pub fn in_degree(&self) -> usize {
        self.inputs.len()
    }

    /// The rule table of this node, if one was already assigned.
    pub fn rule(&self) -> Option<&RuleTable> {
        self.rule.as_ref()
    }

    /// Compute the rule table index for the current input values, as given by `value_of`.
    ///
    /// Each input contributes one bit; the first input is the most significant one.
    pub fn input_index<F: Fn(NodeId) -> bool>(&self, value_of: F) -> usize {
        self.inputs
            .iter()
            .fold(0, |index, input| (index << 1) | usize::from(value_of(*input)))
    }

    /// Evaluate the rule of this node for the input values given by `value_of`.
    ///
    /// A node without a rule table evaluates to `false`.
    pub fn evaluate<F: Fn(NodeId) -> bool>(&self, value_of: F) -> bool {
        match &self.rule {
            Some(rule) => rule.lookup(self.input_index(value_of)),
            None => false,
        }
    }

    pub(crate) fn set_state(&mut self, state: bool) {
        self.state = state;
    }

    pub(crate) fn set_rule(&mut self, rule: RuleTable) {
        self.rule = Some(rule);
    }

    /// **(internal)** Store the next value. Returns `true` if it differs from the current one.
    pub(crate) fn set_buffer(&mut self, value: bool) -> bool {
        self.buffer = value;
        self.buffer != self.state
    }

    pub(crate) fn swap_buffer(&mut self) {
        self.state = self.buffer;
    }
}
