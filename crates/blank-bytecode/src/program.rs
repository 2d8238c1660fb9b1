//! Decoded program with its label map.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::instruction::{Instruction, Label};

/// A reference to a label from a control-transfer instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LabelRef {
    pub label: Label,
    /// Index of the referencing instruction.
    pub index: usize,
}

/// Ordered instruction sequence plus the label → index map.
///
/// The map is built once by a linear scan over `Mark` instructions. When a
/// label is declared more than once, the later declaration wins; the
/// earlier `Mark`s stay in the sequence as no-ops and are reported by
/// [`Program::is_shadowed`].
///
/// Construction does not check that referenced labels exist. Use
/// [`Program::unresolved_labels`] for eager validation; the VM checks
/// lazily on first use.
#[derive(Clone, Debug, Default)]
pub struct Program {
    instructions: Vec<Instruction>,
    /// Label → index, in first-declaration order.
    labels: IndexMap<Label, usize>,
    /// Indices of `Mark`s overridden by a later declaration.
    shadowed: HashSet<usize>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        let mut labels = IndexMap::new();
        let mut shadowed = HashSet::new();

        for (index, instr) in instructions.iter().enumerate() {
            if let Instruction::Mark(label) = *instr
                && let Some(previous) = labels.insert(label, index)
            {
                tracing::trace!(%label, previous, index, "label redeclared, later mark wins");
                shadowed.insert(previous);
            }
        }

        tracing::trace!(
            instructions = instructions.len(),
            labels = labels.len(),
            "label map built"
        );

        Self {
            instructions,
            labels,
            shadowed,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instruction at `ip`, or `None` past the end.
    #[inline]
    pub fn get(&self, ip: usize) -> Option<&Instruction> {
        self.instructions.get(ip)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Index of the `Mark` that declares `label`.
    #[inline]
    pub fn resolve(&self, label: Label) -> Option<usize> {
        self.labels.get(&label).copied()
    }

    /// Declared labels with their resolved index, in first-declaration order.
    pub fn labels(&self) -> impl Iterator<Item = (Label, usize)> + '_ {
        self.labels.iter().map(|(&label, &index)| (label, index))
    }

    /// Whether the `Mark` at `index` lost to a later declaration of the same label.
    pub fn is_shadowed(&self, index: usize) -> bool {
        self.shadowed.contains(&index)
    }

    /// Every control-transfer reference whose label has no `Mark`, in program order.
    pub fn unresolved_labels(&self) -> Vec<LabelRef> {
        self.instructions
            .iter()
            .enumerate()
            .filter_map(|(index, instr)| {
                let label = instr.target()?;
                (!self.labels.contains_key(&label)).then_some(LabelRef { label, index })
            })
            .collect()
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
