//! Sparse heap addressed by any `i64`.

use std::collections::HashMap;

/// Unwritten cells read as 0. Negative addresses are ordinary addresses.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    cells: HashMap<i64, i64>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn load(&self, address: i64) -> i64 {
        self.cells.get(&address).copied().unwrap_or(0)
    }

    #[inline]
    pub fn store(&mut self, address: i64, value: i64) {
        self.cells.insert(address, value);
    }

    /// Number of cells ever written.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Written cells ordered by address.
    pub fn cells(&self) -> Vec<(i64, i64)> {
        let mut cells: Vec<_> = self.cells.iter().map(|(&a, &v)| (a, v)).collect();
        cells.sort_unstable();
        cells
    }
}
