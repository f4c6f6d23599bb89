//! Value cells: the mutable slots behind pointer values.

use qy_ir::{CellId, MonoError, MonoResult, ValueId};

#[derive(Default)]
pub struct CellStore {
    cells: Vec<ValueId>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a cell holding `init`.
    pub fn push(&mut self, init: ValueId) -> CellId {
        let id = CellId::from_index(self.cells.len());
        self.cells.push(init);
        id
    }

    pub fn get(&self, cell: CellId) -> MonoResult<ValueId> {
        self.cells
            .get(cell.index())
            .copied()
            .ok_or_else(|| MonoError::unknown("cell", cell.raw()))
    }

    pub fn set(&mut self, cell: CellId, value: ValueId) -> MonoResult<()> {
        let slot = self
            .cells
            .get_mut(cell.index())
            .ok_or_else(|| MonoError::unknown("cell", cell.raw()))?;
        *slot = value;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
