//! Operation variants and their shared capabilities.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::fmt;

use crate::op_type::OpType;
use crate::parameter::{SymbolOrNumber, Variable, VariableAssignment};
use crate::qubit::{ClbitId, Controls, QubitId};
use crate::register::Register;

static NO_CONTROLS: Controls = BTreeSet::new();

/// A unitary gate with concrete parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardOperation {
    op_type: OpType,
    controls: Controls,
    targets: Vec<QubitId>,
    params: Vec<f64>,
}

impl StandardOperation {
    /// Create a gate. Arity is not checked here; the container checks it on emission.
    pub fn new(
        op_type: OpType,
        controls: Controls,
        targets: Vec<QubitId>,
        params: Vec<f64>,
    ) -> Self {
        Self {
            op_type,
            controls,
            targets,
            params,
        }
    }

    /// The gate parameters.
    pub fn params(&self) -> &[f64] {
        &self.params
    }
}

/// A unitary gate with at least one symbolic parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolicOperation {
    op_type: OpType,
    controls: Controls,
    targets: Vec<QubitId>,
    params: Vec<SymbolOrNumber>,
}

impl SymbolicOperation {
    /// Create a symbolic gate.
    pub fn new(
        op_type: OpType,
        controls: Controls,
        targets: Vec<QubitId>,
        params: Vec<SymbolOrNumber>,
    ) -> Self {
        Self {
            op_type,
            controls,
            targets,
            params,
        }
    }

    /// The gate parameters.
    pub fn params(&self) -> &[SymbolOrNumber] {
        &self.params
    }

    /// Variables referenced by the parameters.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.params.iter().flat_map(SymbolOrNumber::variables)
    }

    /// True if every parameter is a concrete number.
    pub fn is_fully_instantiated(&self) -> bool {
        self.params.iter().all(SymbolOrNumber::is_number)
    }

    /// Substitute the assigned variables in place.
    ///
    /// The operation stays symbolic even if every parameter became concrete.
    pub fn instantiate(&mut self, assignment: &VariableAssignment) {
        for p in &mut self.params {
            *p = p.instantiate(assignment);
        }
    }
}

/// Measurement or reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonUnitaryOperation {
    op_type: OpType,
    targets: Vec<QubitId>,
    clbits: Vec<ClbitId>,
}

impl NonUnitaryOperation {
    /// Measure `targets[i]` into `clbits[i]`.
    pub fn measure(targets: Vec<QubitId>, clbits: Vec<ClbitId>) -> Self {
        Self {
            op_type: OpType::Measure,
            targets,
            clbits,
        }
    }

    /// Reset every qubit in `targets`.
    pub fn reset(targets: Vec<QubitId>) -> Self {
        Self {
            op_type: OpType::Reset,
            targets,
            clbits: vec![],
        }
    }

    /// Classical bits written by a measurement.
    pub fn clbits(&self) -> &[ClbitId] {
        &self.clbits
    }
}

/// How a classical register is compared to the expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComparisonKind {
    /// Equal.
    #[default]
    Eq,
    /// Not equal.
    Neq,
    /// Less than.
    Lt,
    /// Less than or equal.
    Leq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Geq,
}

impl ComparisonKind {
    /// Evaluate the comparison `lhs <op> rhs`.
    pub fn holds(self, lhs: u64, rhs: u64) -> bool {
        match self {
            ComparisonKind::Eq => lhs == rhs,
            ComparisonKind::Neq => lhs != rhs,
            ComparisonKind::Lt => lhs < rhs,
            ComparisonKind::Leq => lhs <= rhs,
            ComparisonKind::Gt => lhs > rhs,
            ComparisonKind::Geq => lhs >= rhs,
        }
    }
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonKind::Eq => "==",
            ComparisonKind::Neq => "!=",
            ComparisonKind::Lt => "<",
            ComparisonKind::Leq => "<=",
            ComparisonKind::Gt => ">",
            ComparisonKind::Geq => ">=",
        })
    }
}

/// A unitary executed only if a classical register comparison holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicControlledOperation {
    op: Box<Operation>,
    control_register: Register,
    expected_value: u64,
    comparison: ComparisonKind,
}

impl ClassicControlledOperation {
    /// Wrap `op` with a classical condition.
    pub fn new(
        op: Operation,
        control_register: Register,
        expected_value: u64,
        comparison: ComparisonKind,
    ) -> Self {
        Self {
            op: Box::new(op),
            control_register,
            expected_value,
            comparison,
        }
    }

    /// The wrapped operation.
    pub fn operation(&self) -> &Operation {
        &self.op
    }

    /// The classical bits compared against the expected value.
    pub fn control_register(&self) -> Register {
        self.control_register
    }

    /// The value the register is compared to.
    pub fn expected_value(&self) -> u64 {
        self.expected_value
    }

    /// The comparison applied.
    pub fn comparison(&self) -> ComparisonKind {
        self.comparison
    }
}

/// An ordered block of operations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompoundOperation {
    ops: Vec<Operation>,
}

impl CompoundOperation {
    /// Create a compound operation from its children.
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    /// Child operations in program order.
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    /// Mutable access to the children.
    pub fn ops_mut(&mut self) -> &mut Vec<Operation> {
        &mut self.ops
    }

    /// Consume and return the children.
    pub fn into_ops(self) -> Vec<Operation> {
        self.ops
    }

    /// Append a child.
    pub fn push(&mut self, op: Operation) {
        self.ops.push(op);
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if there are no children.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// A single instruction of a quantum computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Gate with concrete parameters (also barriers).
    Standard(StandardOperation),
    /// Gate with symbolic parameters.
    Symbolic(SymbolicOperation),
    /// Measurement or reset.
    NonUnitary(NonUnitaryOperation),
    /// Classically conditioned gate.
    ClassicControlled(ClassicControlledOperation),
    /// Nested block.
    Compound(CompoundOperation),
}

impl Operation {
    /// Type tag of this operation.
    pub fn op_type(&self) -> OpType {
        match self {
            Operation::Standard(op) => op.op_type,
            Operation::Symbolic(op) => op.op_type,
            Operation::NonUnitary(op) => op.op_type,
            Operation::ClassicControlled(_) => OpType::ClassicControlled,
            Operation::Compound(_) => OpType::Compound,
        }
    }

    /// Display name: the type name prefixed with one `c` per control.
    pub fn name(&self) -> String {
        match self {
            Operation::Standard(_) | Operation::Symbolic(_) => {
                let mut name = "c".repeat(self.controls().len());
                name.push_str(self.op_type().name());
                name
            }
            Operation::ClassicControlled(cc) => format!("c_{}", cc.op.name()),
            _ => self.op_type().name().to_string(),
        }
    }

    /// Control qubits (empty for non-gates and compounds).
    pub fn controls(&self) -> &Controls {
        match self {
            Operation::Standard(op) => &op.controls,
            Operation::Symbolic(op) => &op.controls,
            Operation::ClassicControlled(cc) => cc.op.controls(),
            Operation::NonUnitary(_) | Operation::Compound(_) => &NO_CONTROLS,
        }
    }

    /// Target qubits (empty for compounds).
    pub fn targets(&self) -> &[QubitId] {
        match self {
            Operation::Standard(op) => &op.targets,
            Operation::Symbolic(op) => &op.targets,
            Operation::NonUnitary(op) => &op.targets,
            Operation::ClassicControlled(cc) => cc.op.targets(),
            Operation::Compound(_) => &[],
        }
    }

    /// Replace the controls. Has no effect on measurements, resets and compounds.
    pub fn set_controls(&mut self, controls: Controls) {
        match self {
            Operation::Standard(op) => op.controls = controls,
            Operation::Symbolic(op) => op.controls = controls,
            Operation::ClassicControlled(cc) => cc.op.set_controls(controls),
            Operation::NonUnitary(_) | Operation::Compound(_) => {}
        }
    }

    /// Replace the targets. Has no effect on compounds.
    pub fn set_targets(&mut self, targets: Vec<QubitId>) {
        match self {
            Operation::Standard(op) => op.targets = targets,
            Operation::Symbolic(op) => op.targets = targets,
            Operation::NonUnitary(op) => op.targets = targets,
            Operation::ClassicControlled(cc) => cc.op.set_targets(targets),
            Operation::Compound(_) => {}
        }
    }

    /// All qubits this operation touches, recursing into compounds.
    pub fn used_qubits(&self) -> BTreeSet<QubitId> {
        match self {
            Operation::Compound(c) => c.ops.iter().flat_map(Operation::used_qubits).collect(),
            _ => self
                .controls()
                .iter()
                .map(|c| c.qubit)
                .chain(self.targets().iter().copied())
                .collect(),
        }
    }

    /// True if the operation touches `qubit`.
    pub fn acts_on(&self, qubit: QubitId) -> bool {
        match self {
            Operation::Compound(c) => c.ops.iter().any(|op| op.acts_on(qubit)),
            _ => {
                self.targets().contains(&qubit) || self.controls().iter().any(|c| c.qubit == qubit)
            }
        }
    }

    /// Rewrite every qubit reference through `f`.
    pub fn remap_qubits<F: Fn(QubitId) -> QubitId>(&mut self, f: &F) {
        match self {
            Operation::Compound(c) => {
                for op in &mut c.ops {
                    op.remap_qubits(f);
                }
            }
            Operation::ClassicControlled(cc) => cc.op.remap_qubits(f),
            _ => {
                let controls = self
                    .controls()
                    .iter()
                    .map(|c| crate::qubit::Control {
                        qubit: f(c.qubit),
                        kind: c.kind,
                    })
                    .collect();
                let targets = self.targets().iter().map(|&q| f(q)).collect();
                self.set_controls(controls);
                self.set_targets(targets);
            }
        }
    }

    /// Turn this operation into its adjoint in place.
    ///
    /// Measurements and resets have no adjoint and are left unchanged.
    pub fn invert(&mut self) {
        match self {
            Operation::Standard(op) => {
                invert_gate(&mut op.op_type, op.targets.as_mut_slice(), op.params.as_mut_slice());
            }
            Operation::Symbolic(op) => {
                invert_gate(&mut op.op_type, op.targets.as_mut_slice(), op.params.as_mut_slice());
            }
            Operation::NonUnitary(_) => {}
            Operation::ClassicControlled(cc) => cc.op.invert(),
            Operation::Compound(c) => {
                for op in &mut c.ops {
                    op.invert();
                }
                c.ops.reverse();
            }
        }
    }

    /// Increase the per-qubit depth counters by this operation.
    pub fn add_depth_contribution(&self, depths: &mut [usize]) {
        match self {
            Operation::Compound(c) => {
                for op in &c.ops {
                    op.add_depth_contribution(depths);
                }
            }
            _ if self.op_type() == OpType::Barrier => {}
            _ => {
                let used = self.used_qubits();
                let layer = used
                    .iter()
                    .filter_map(|q| depths.get(q.index()))
                    .max()
                    .map_or(1, |d| d + 1);
                for q in used {
                    if let Some(d) = depths.get_mut(q.index()) {
                        *d = layer;
                    }
                }
            }
        }
    }

    /// Gate with concrete parameters.
    pub fn is_standard(&self) -> bool {
        matches!(self, Operation::Standard(_))
    }

    /// Gate with symbolic parameters.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Operation::Symbolic(_))
    }

    /// Measurement or reset.
    pub fn is_non_unitary(&self) -> bool {
        matches!(self, Operation::NonUnitary(_))
    }

    /// Classically conditioned operation.
    pub fn is_classic_controlled(&self) -> bool {
        matches!(self, Operation::ClassicControlled(_))
    }

    /// Nested block.
    pub fn is_compound(&self) -> bool {
        matches!(self, Operation::Compound(_))
    }

    /// True if the operation has at least one control qubit.
    pub fn is_controlled(&self) -> bool {
        !self.controls().is_empty()
    }

    /// True if the operation is a unitary (recursively for compounds).
    pub fn is_unitary(&self) -> bool {
        match self {
            Operation::Standard(_) | Operation::Symbolic(_) => true,
            Operation::NonUnitary(_) | Operation::ClassicControlled(_) => false,
            Operation::Compound(c) => c.ops.iter().all(Operation::is_unitary),
        }
    }
}

impl From<StandardOperation> for Operation {
    fn from(op: StandardOperation) -> Self {
        Operation::Standard(op)
    }
}

impl From<CompoundOperation> for Operation {
    fn from(op: CompoundOperation) -> Self {
        Operation::Compound(op)
    }
}

/// Parameter kinds that can be negated and shifted while inverting a gate.
trait GateParam: Clone {
    fn negated(&self) -> Self;
    fn shifted(&self, offset: f64) -> Self;
}

impl GateParam for f64 {
    fn negated(&self) -> Self {
        -self
    }

    fn shifted(&self, offset: f64) -> Self {
        self + offset
    }
}

impl GateParam for SymbolOrNumber {
    fn negated(&self) -> Self {
        SymbolOrNumber::negated(self)
    }

    fn shifted(&self, offset: f64) -> Self {
        SymbolOrNumber::shifted(self, offset)
    }
}

fn invert_gate<P: GateParam>(op_type: &mut OpType, targets: &mut [QubitId], params: &mut [P]) {
    match *op_type {
        OpType::P
        | OpType::RX
        | OpType::RY
        | OpType::RZ
        | OpType::RXX
        | OpType::RYY
        | OpType::RZZ
        | OpType::RZX
        | OpType::XXminusYY
        | OpType::XXplusYY => {
            if let Some(theta) = params.first_mut() {
                *theta = theta.negated();
            }
        }
        OpType::U => {
            if let [theta, phi, lambda] = params {
                let (new_phi, new_lambda) = (lambda.negated(), phi.negated());
                *theta = theta.negated();
                *phi = new_phi;
                *lambda = new_lambda;
            }
        }
        OpType::U2 => {
            if let [phi, lambda] = params {
                let new_phi = lambda.negated().shifted(-PI);
                let new_lambda = phi.negated().shifted(PI);
                *phi = new_phi;
                *lambda = new_lambda;
            }
        }
        OpType::DCX if targets.len() == 2 => targets.swap(0, 1),
        other => *op_type = other.inverse(),
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Compound(c) => {
                write!(f, "compound {{")?;
                for (i, op) in c.ops.iter().enumerate() {
                    if i > 0 {
                        write!(f, ";")?;
                    }
                    write!(f, " {op}")?;
                }
                write!(f, " }}")
            }
            Operation::ClassicControlled(cc) => {
                let reg = cc.control_register;
                write!(
                    f,
                    "if (c[{}..{}] {} {}) {}",
                    reg.start,
                    reg.start + reg.size,
                    cc.comparison,
                    cc.expected_value,
                    cc.op
                )
            }
            _ => {
                write!(f, "{}", self.name())?;
                match self {
                    Operation::Standard(op) if !op.params.is_empty() => {
                        let ps: Vec<_> = op.params.iter().map(f64::to_string).collect();
                        write!(f, "({})", ps.join(", "))?;
                    }
                    Operation::Symbolic(op) if !op.params.is_empty() => {
                        let ps: Vec<_> = op.params.iter().map(ToString::to_string).collect();
                        write!(f, "({})", ps.join(", "))?;
                    }
                    _ => {}
                }
                let qubits: Vec<_> = self
                    .controls()
                    .iter()
                    .map(ToString::to_string)
                    .chain(self.targets().iter().map(ToString::to_string))
                    .collect();
                write!(f, " {}", qubits.join(", "))?;
                if let Operation::NonUnitary(op) = self {
                    if !op.clbits.is_empty() {
                        let bits: Vec<_> = op.clbits.iter().map(ToString::to_string).collect();
                        write!(f, " -> {}", bits.join(", "))?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::Variable;
    use crate::qubit::Control;

    fn gate(op_type: OpType, targets: &[u32], params: Vec<f64>) -> Operation {
        Operation::Standard(StandardOperation::new(
            op_type,
            Controls::new(),
            targets.iter().map(|&q| QubitId(q)).collect(),
            params,
        ))
    }

    #[test]
    fn test_name_and_controls() {
        let cx = Operation::Standard(StandardOperation::new(
            OpType::X,
            [Control::pos(0u32)].into_iter().collect(),
            vec![QubitId(1)],
            vec![],
        ));
        assert_eq!(cx.name(), "cx");
        assert!(cx.is_controlled());
        assert_eq!(cx.used_qubits().len(), 2);
        assert!(cx.acts_on(QubitId(0)));
        assert!(!cx.acts_on(QubitId(2)));
        assert_eq!(format!("{cx}"), "cx q0, q1");
    }

    #[test]
    fn test_invert_fixed_types() {
        let mut s = gate(OpType::S, &[0], vec![]);
        s.invert();
        assert_eq!(s.op_type(), OpType::Sdg);

        let mut dcx = gate(OpType::DCX, &[0, 1], vec![]);
        dcx.invert();
        assert_eq!(dcx.targets(), &[QubitId(1), QubitId(0)]);
    }

    #[test]
    fn test_invert_parameterized() {
        let mut u = gate(OpType::U, &[0], vec![0.1, 0.2, 0.3]);
        u.invert();
        let Operation::Standard(op) = &u else { panic!("expected standard") };
        assert_eq!(op.params(), &[-0.1, -0.3, -0.2]);

        let mut u2 = gate(OpType::U2, &[0], vec![0.2, 0.3]);
        u2.invert();
        let Operation::Standard(op) = &u2 else { panic!("expected standard") };
        assert!((op.params()[0] - (-0.3 - PI)).abs() < 1e-12);
        assert!((op.params()[1] - (-0.2 + PI)).abs() < 1e-12);

        let mut xy = gate(OpType::XXplusYY, &[0, 1], vec![0.5, 0.7]);
        xy.invert();
        let Operation::Standard(op) = &xy else { panic!("expected standard") };
        assert_eq!(op.params(), &[-0.5, 0.7]);
    }

    #[test]
    fn test_invert_symbolic() {
        let mut rz = Operation::Symbolic(SymbolicOperation::new(
            OpType::RZ,
            Controls::new(),
            vec![QubitId(0)],
            vec![SymbolOrNumber::from(Variable::new("theta"))],
        ));
        rz.invert();
        assert_eq!(format!("{rz}"), "rz(-theta) q0");
    }

    #[test]
    fn test_compound_invert_reverses() {
        let mut c = Operation::Compound(CompoundOperation::new(vec![
            gate(OpType::H, &[0], vec![]),
            gate(OpType::T, &[1], vec![]),
        ]));
        c.invert();
        let Operation::Compound(inner) = &c else { panic!("expected compound") };
        assert_eq!(inner.ops()[0].op_type(), OpType::Tdg);
        assert_eq!(inner.ops()[1].op_type(), OpType::H);
        assert!(c.targets().is_empty());
        assert_eq!(c.used_qubits().len(), 2);
    }

    #[test]
    fn test_remap_qubits() {
        let mut op = Operation::Standard(StandardOperation::new(
            OpType::X,
            [Control::neg(2u32)].into_iter().collect(),
            vec![QubitId(3)],
            vec![],
        ));
        op.remap_qubits(&|q: QubitId| QubitId(q.0 - 1));
        assert_eq!(op.targets(), &[QubitId(2)]);
        assert_eq!(op.controls().iter().next(), Some(&Control::neg(1u32)));
    }

    #[test]
    fn test_classic_controlled() {
        let cc = Operation::ClassicControlled(ClassicControlledOperation::new(
            gate(OpType::X, &[0], vec![]),
            Register { start: 0, size: 1 },
            1,
            ComparisonKind::Eq,
        ));
        assert_eq!(cc.name(), "c_x");
        assert_eq!(cc.targets(), &[QubitId(0)]);
        assert!(!cc.is_unitary());
        assert_eq!(format!("{cc}"), "if (c[0..1] == 1) x q0");
        assert!(ComparisonKind::Geq.holds(3, 1));
    }

    #[test]
    fn test_depth_contribution_skips_barrier() {
        let mut depths = vec![0; 2];
        gate(OpType::H, &[0], vec![]).add_depth_contribution(&mut depths);
        gate(OpType::Barrier, &[0, 1], vec![]).add_depth_contribution(&mut depths);
        gate(OpType::SWAP, &[0, 1], vec![]).add_depth_contribution(&mut depths);
        assert_eq!(depths, vec![2, 2]);
    }
}
