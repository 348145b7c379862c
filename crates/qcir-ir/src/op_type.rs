//! Operation type tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IrError;

/// Type tag shared by all operation variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpType {
    /// Identity gate.
    I,
    /// Barrier across a set of qubits.
    Barrier,

    // Single-qubit Clifford+T gates
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// V gate.
    V,
    /// V-dagger gate.
    Vdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit parameterized gates
    /// Universal single-qubit gate U(θ, φ, λ).
    U,
    /// U2(φ, λ) = U(π/2, φ, λ).
    U2,
    /// Phase gate.
    P,
    /// Rotation around X axis.
    RX,
    /// Rotation around Y axis.
    RY,
    /// Rotation around Z axis.
    RZ,

    // Two-target gates
    /// SWAP gate.
    SWAP,
    /// iSWAP gate.
    ISWAP,
    /// iSWAP-dagger gate.
    ISWAPdg,
    /// Peres gate.
    Peres,
    /// Peres-dagger gate.
    Peresdg,
    /// Double CNOT.
    DCX,
    /// Echoed cross-resonance gate.
    ECR,
    /// XX rotation gate.
    RXX,
    /// YY rotation gate.
    RYY,
    /// ZZ rotation gate.
    RZZ,
    /// ZX rotation gate.
    RZX,
    /// XX-YY interaction gate (θ, β).
    XXminusYY,
    /// XX+YY interaction gate (θ, β).
    XXplusYY,

    // Non-gate operations
    /// Ordered block of operations.
    Compound,
    /// Measurement into classical bits.
    Measure,
    /// Reset to |0⟩.
    Reset,
    /// Operation conditioned on a classical register.
    ClassicControlled,
}

impl OpType {
    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            OpType::I => "i",
            OpType::Barrier => "barrier",
            OpType::H => "h",
            OpType::X => "x",
            OpType::Y => "y",
            OpType::Z => "z",
            OpType::S => "s",
            OpType::Sdg => "sdg",
            OpType::T => "t",
            OpType::Tdg => "tdg",
            OpType::V => "v",
            OpType::Vdg => "vdg",
            OpType::SX => "sx",
            OpType::SXdg => "sxdg",
            OpType::U => "u",
            OpType::U2 => "u2",
            OpType::P => "p",
            OpType::RX => "rx",
            OpType::RY => "ry",
            OpType::RZ => "rz",
            OpType::SWAP => "swap",
            OpType::ISWAP => "iswap",
            OpType::ISWAPdg => "iswapdg",
            OpType::Peres => "peres",
            OpType::Peresdg => "peresdg",
            OpType::DCX => "dcx",
            OpType::ECR => "ecr",
            OpType::RXX => "rxx",
            OpType::RYY => "ryy",
            OpType::RZZ => "rzz",
            OpType::RZX => "rzx",
            OpType::XXminusYY => "xx_minus_yy",
            OpType::XXplusYY => "xx_plus_yy",
            OpType::Compound => "compound",
            OpType::Measure => "measure",
            OpType::Reset => "reset",
            OpType::ClassicControlled => "classic_controlled",
        }
    }

    /// Number of target qubits, or `None` for variable-width operations.
    pub fn num_targets(self) -> Option<usize> {
        match self {
            OpType::Barrier
            | OpType::Compound
            | OpType::Measure
            | OpType::Reset
            | OpType::ClassicControlled => None,

            OpType::SWAP
            | OpType::ISWAP
            | OpType::ISWAPdg
            | OpType::Peres
            | OpType::Peresdg
            | OpType::DCX
            | OpType::ECR
            | OpType::RXX
            | OpType::RYY
            | OpType::RZZ
            | OpType::RZX
            | OpType::XXminusYY
            | OpType::XXplusYY => Some(2),

            _ => Some(1),
        }
    }

    /// Number of angle parameters.
    pub fn num_params(self) -> usize {
        match self {
            OpType::U => 3,
            OpType::U2 | OpType::XXminusYY | OpType::XXplusYY => 2,
            OpType::P
            | OpType::RX
            | OpType::RY
            | OpType::RZ
            | OpType::RXX
            | OpType::RYY
            | OpType::RZZ
            | OpType::RZX => 1,
            _ => 0,
        }
    }

    /// True for unitary gates with a fixed number of targets.
    pub fn is_gate(self) -> bool {
        self.num_targets().is_some()
    }

    /// Type of the adjoint, for types whose inverse is another fixed type.
    ///
    /// Parameterized types map to themselves; their parameters change instead.
    pub fn inverse(self) -> OpType {
        match self {
            OpType::S => OpType::Sdg,
            OpType::Sdg => OpType::S,
            OpType::T => OpType::Tdg,
            OpType::Tdg => OpType::T,
            OpType::V => OpType::Vdg,
            OpType::Vdg => OpType::V,
            OpType::SX => OpType::SXdg,
            OpType::SXdg => OpType::SX,
            OpType::ISWAP => OpType::ISWAPdg,
            OpType::ISWAPdg => OpType::ISWAP,
            OpType::Peres => OpType::Peresdg,
            OpType::Peresdg => OpType::Peres,
            other => other,
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OpType {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.to_ascii_lowercase().as_str() {
            "i" | "id" => OpType::I,
            "barrier" => OpType::Barrier,
            "h" => OpType::H,
            "x" => OpType::X,
            "y" => OpType::Y,
            "z" => OpType::Z,
            "s" => OpType::S,
            "sdg" => OpType::Sdg,
            "t" => OpType::T,
            "tdg" => OpType::Tdg,
            "v" => OpType::V,
            "vdg" => OpType::Vdg,
            "sx" => OpType::SX,
            "sxdg" => OpType::SXdg,
            "u" | "u3" => OpType::U,
            "u2" => OpType::U2,
            "p" | "phase" => OpType::P,
            "rx" => OpType::RX,
            "ry" => OpType::RY,
            "rz" => OpType::RZ,
            "swap" => OpType::SWAP,
            "iswap" => OpType::ISWAP,
            "iswapdg" => OpType::ISWAPdg,
            "peres" => OpType::Peres,
            "peresdg" => OpType::Peresdg,
            "dcx" => OpType::DCX,
            "ecr" => OpType::ECR,
            "rxx" => OpType::RXX,
            "ryy" => OpType::RYY,
            "rzz" => OpType::RZZ,
            "rzx" => OpType::RZX,
            "xx_minus_yy" => OpType::XXminusYY,
            "xx_plus_yy" => OpType::XXplusYY,
            "compound" => OpType::Compound,
            "measure" => OpType::Measure,
            "reset" => OpType::Reset,
            "classic_controlled" => OpType::ClassicControlled,
            _ => return Err(IrError::UnknownOperation(s.to_string())),
        };
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for op in [OpType::H, OpType::XXplusYY, OpType::ISWAPdg, OpType::Measure] {
            assert_eq!(op.name().parse::<OpType>().unwrap(), op);
        }
        assert_eq!("U3".parse::<OpType>().unwrap(), OpType::U);
        assert!("frobnicate".parse::<OpType>().is_err());
    }

    #[test]
    fn test_arity() {
        assert_eq!(OpType::H.num_targets(), Some(1));
        assert_eq!(OpType::ECR.num_targets(), Some(2));
        assert_eq!(OpType::Barrier.num_targets(), None);
        assert_eq!(OpType::U.num_params(), 3);
        assert_eq!(OpType::XXminusYY.num_params(), 2);
        assert_eq!(OpType::X.num_params(), 0);
    }

    #[test]
    fn test_inverse_is_involution() {
        let ops = [
            OpType::S,
            OpType::T,
            OpType::V,
            OpType::SX,
            OpType::ISWAP,
            OpType::Peres,
            OpType::H,
        ];
        for op in ops {
            assert_eq!(op.inverse().inverse(), op);
        }
        assert_eq!(OpType::Tdg.inverse(), OpType::T);
    }
}
