//! Call stack of return addresses.

/// Return addresses pushed by `call` and popped by `ret`.
///
/// Depth is unbounded; a runaway recursion is stopped only by the host's
/// execution fuel.
#[derive(Clone, Debug, Default)]
pub struct CallStack {
    returns: Vec<usize>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, return_addr: usize) {
        self.returns.push(return_addr);
    }

    /// Pop the innermost return address, `None` outside any call.
    #[inline]
    pub fn pop(&mut self) -> Option<usize> {
        self.returns.pop()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.returns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Return addresses, outermost first.
    pub fn as_slice(&self) -> &[usize] {
        &self.returns
    }
}
