//! Qubit, classical bit and control types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Index of a qubit within a computation.
///
/// Depending on context this is either a physical index (a key of the
/// initial layout) or a logical index (a value of the initial layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The index as a `usize`, for indexing flag vectors and counters.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

/// Index of a classical bit within a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl ClbitId {
    /// The index as a `usize`.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

impl From<usize> for ClbitId {
    fn from(id: usize) -> Self {
        ClbitId(u32::try_from(id).expect("ClbitId overflow: exceeds u32::MAX"))
    }
}

/// Polarity of a control qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum ControlKind {
    /// The operation fires when the control is |1⟩.
    #[default]
    Pos,
    /// The operation fires when the control is |0⟩.
    Neg,
}

/// A control qubit together with its polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Control {
    /// The controlling qubit.
    pub qubit: QubitId,
    /// Whether the control is positive or negative.
    pub kind: ControlKind,
}

impl Control {
    /// A positive control on `qubit`.
    pub fn pos(qubit: impl Into<QubitId>) -> Self {
        Self {
            qubit: qubit.into(),
            kind: ControlKind::Pos,
        }
    }

    /// A negative control on `qubit`.
    pub fn neg(qubit: impl Into<QubitId>) -> Self {
        Self {
            qubit: qubit.into(),
            kind: ControlKind::Neg,
        }
    }
}

impl From<QubitId> for Control {
    fn from(qubit: QubitId) -> Self {
        Control::pos(qubit)
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ControlKind::Pos => write!(f, "{}", self.qubit),
            ControlKind::Neg => write!(f, "!{}", self.qubit),
        }
    }
}

/// Ordered set of controls.
pub type Controls = BTreeSet<Control>;

/// Mapping from physical qubit to logical qubit.
pub type Permutation = BTreeMap<QubitId, QubitId>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_display() {
        assert_eq!(format!("{}", QubitId(3)), "q3");
        assert_eq!(format!("{}", ClbitId(1)), "c1");
    }

    #[test]
    fn test_control_display_and_order() {
        assert_eq!(format!("{}", Control::pos(2u32)), "q2");
        assert_eq!(format!("{}", Control::neg(2u32)), "!q2");

        let controls: Controls = [Control::pos(4u32), Control::neg(1u32)].into_iter().collect();
        let qubits: Vec<_> = controls.iter().map(|c| c.qubit).collect();
        assert_eq!(qubits, vec![QubitId(1), QubitId(4)]);
    }
}
