//! Operand stack of signed 64-bit values.

use super::error::RuntimeError;

/// The data stack. Every operation checks depth before mutating, so a
/// failed operation leaves the stack as it was.
#[derive(Clone, Debug, Default)]
pub struct OperandStack {
    values: Vec<i64>,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values from bottom to top.
    pub fn as_slice(&self) -> &[i64] {
        &self.values
    }

    #[inline]
    pub fn push(&mut self, value: i64) {
        self.values.push(value);
    }

    pub fn pop(&mut self) -> Result<i64, RuntimeError> {
        self.require(1)?;
        Ok(self.values.pop().unwrap_or_default())
    }

    /// Pop the right operand, then the left. Returns `(lhs, rhs)`.
    pub fn pop_pair(&mut self) -> Result<(i64, i64), RuntimeError> {
        self.require(2)?;
        let rhs = self.values.pop().unwrap_or_default();
        let lhs = self.values.pop().unwrap_or_default();
        Ok((lhs, rhs))
    }

    /// Duplicate the top value. Does nothing on an empty stack.
    pub fn dup(&mut self) {
        if let Some(&top) = self.values.last() {
            self.values.push(top);
        }
    }

    /// Push a copy of the `n`-th value from the top (0 is the top).
    pub fn copy(&mut self, n: u64) -> Result<(), RuntimeError> {
        let depth = depth_with_top(n);
        self.require(depth)?;
        let value = self.values[self.values.len() - depth];
        self.values.push(value);
        Ok(())
    }

    pub fn swap(&mut self) -> Result<(), RuntimeError> {
        self.require(2)?;
        let len = self.values.len();
        self.values.swap(len - 1, len - 2);
        Ok(())
    }

    /// Keep the top value and drop the `n` values beneath it.
    pub fn slide(&mut self, n: u64) -> Result<(), RuntimeError> {
        let depth = depth_with_top(n);
        self.require(depth)?;
        let top = self.values.pop().unwrap_or_default();
        self.values.truncate(self.values.len() - (depth - 1));
        self.values.push(top);
        Ok(())
    }

    fn require(&self, needed: usize) -> Result<(), RuntimeError> {
        if self.values.len() < needed {
            return Err(RuntimeError::StackUnderflow {
                needed,
                available: self.values.len(),
            });
        }
        Ok(())
    }
}

/// Stack depth needed to address `n` values beneath the top. Saturates, so
/// an absurd `n` still fails the depth check instead of wrapping.
fn depth_with_top(n: u64) -> usize {
    usize::try_from(n)
        .ok()
        .and_then(|n| n.checked_add(1))
        .unwrap_or(usize::MAX)
}
