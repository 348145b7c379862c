//! Gate emission API of [`QuantumComputation`].
//!
//! Every gate goes through [`QuantumComputation::emit`], which checks the
//! qubit range and arity and decides between a concrete and a symbolic
//! operation. The named methods are thin wrappers.

use crate::computation::QuantumComputation;
use crate::error::{IrError, IrResult};
use crate::op_type::OpType;
use crate::operation::{
    ClassicControlledOperation, ComparisonKind, NonUnitaryOperation, Operation, StandardOperation,
    SymbolicOperation,
};
use crate::parameter::SymbolOrNumber;
use crate::qubit::{ClbitId, Control, Controls, QubitId};
use crate::register::Register;

impl QuantumComputation {
    fn check_operands(
        &self,
        controls: &Controls,
        targets: &[QubitId],
        gate_name: &str,
    ) -> IrResult<()> {
        for q in controls.iter().map(|c| c.qubit).chain(targets.iter().copied()) {
            self.check_qubit(q, Some(gate_name))?;
        }
        Ok(())
    }

    fn check_arity(op_type: OpType, targets: usize, params: usize) -> IrResult<()> {
        let name = op_type.name();
        let expected = op_type
            .num_targets()
            .ok_or_else(|| IrError::NotAGate(name.to_string()))?;
        if targets != expected {
            return Err(IrError::TargetCountMismatch {
                gate_name: name.to_string(),
                expected,
                got: targets,
            });
        }
        if params != op_type.num_params() {
            return Err(IrError::ParameterCountMismatch {
                gate_name: name.to_string(),
                expected: op_type.num_params(),
                got: params,
            });
        }
        Ok(())
    }

    /// Append a gate.
    ///
    /// If every parameter is a number a [`StandardOperation`] is appended,
    /// otherwise a [`SymbolicOperation`] whose variables are recorded.
    pub fn emit(
        &mut self,
        op_type: OpType,
        params: Vec<SymbolOrNumber>,
        controls: Controls,
        targets: Vec<QubitId>,
    ) -> IrResult<&mut Self> {
        Self::check_arity(op_type, targets.len(), params.len())?;
        self.check_operands(&controls, &targets, op_type.name())?;

        let values: Option<Vec<f64>> = params.iter().map(SymbolOrNumber::as_f64).collect();
        let op = match values {
            Some(values) => {
                Operation::Standard(StandardOperation::new(op_type, controls, targets, values))
            }
            None => {
                Operation::Symbolic(SymbolicOperation::new(op_type, controls, targets, params))
            }
        };
        self.push(op);
        Ok(self)
    }

    fn gate(&mut self, op_type: OpType, target: QubitId) -> IrResult<&mut Self> {
        self.emit(op_type, vec![], Controls::new(), vec![target])
    }

    fn controlled(
        &mut self,
        op_type: OpType,
        control: Control,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.emit(op_type, vec![], [control].into_iter().collect(), vec![target])
    }

    fn rotation(
        &mut self,
        op_type: OpType,
        theta: SymbolOrNumber,
        controls: Controls,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.emit(op_type, vec![theta], controls, vec![target])
    }

    fn two_target(
        &mut self,
        op_type: OpType,
        params: Vec<SymbolOrNumber>,
        q0: QubitId,
        q1: QubitId,
    ) -> IrResult<&mut Self> {
        self.emit(op_type, params, Controls::new(), vec![q0, q1])
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply identity gate.
    pub fn i(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OpType::I, qubit)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OpType::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OpType::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OpType::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OpType::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OpType::S, qubit)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OpType::Sdg, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OpType::T, qubit)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OpType::Tdg, qubit)
    }

    /// Apply V gate.
    pub fn v(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OpType::V, qubit)
    }

    /// Apply V-dagger gate.
    pub fn vdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OpType::Vdg, qubit)
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OpType::SX, qubit)
    }

    /// Apply sqrt(X)-dagger gate.
    pub fn sxdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OpType::SXdg, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: impl Into<SymbolOrNumber>, qubit: QubitId) -> IrResult<&mut Self> {
        self.rotation(OpType::RX, theta.into(), Controls::new(), qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: impl Into<SymbolOrNumber>, qubit: QubitId) -> IrResult<&mut Self> {
        self.rotation(OpType::RY, theta.into(), Controls::new(), qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: impl Into<SymbolOrNumber>, qubit: QubitId) -> IrResult<&mut Self> {
        self.rotation(OpType::RZ, theta.into(), Controls::new(), qubit)
    }

    /// Apply phase gate.
    pub fn p(&mut self, lambda: impl Into<SymbolOrNumber>, qubit: QubitId) -> IrResult<&mut Self> {
        self.rotation(OpType::P, lambda.into(), Controls::new(), qubit)
    }

    /// Apply U2(φ, λ) gate.
    pub fn u2(
        &mut self,
        phi: impl Into<SymbolOrNumber>,
        lambda: impl Into<SymbolOrNumber>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.emit(OpType::U2, vec![phi.into(), lambda.into()], Controls::new(), vec![qubit])
    }

    /// Apply U(θ, φ, λ) gate.
    pub fn u(
        &mut self,
        theta: impl Into<SymbolOrNumber>,
        phi: impl Into<SymbolOrNumber>,
        lambda: impl Into<SymbolOrNumber>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.emit(
            OpType::U,
            vec![theta.into(), phi.into(), lambda.into()],
            Controls::new(),
            vec![qubit],
        )
    }

    // =========================================================================
    // Controlled gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: impl Into<Control>, target: QubitId) -> IrResult<&mut Self> {
        self.controlled(OpType::X, control.into(), target)
    }

    /// Apply controlled-Y gate.
    pub fn cy(&mut self, control: impl Into<Control>, target: QubitId) -> IrResult<&mut Self> {
        self.controlled(OpType::Y, control.into(), target)
    }

    /// Apply controlled-Z gate.
    pub fn cz(&mut self, control: impl Into<Control>, target: QubitId) -> IrResult<&mut Self> {
        self.controlled(OpType::Z, control.into(), target)
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: impl Into<Control>, target: QubitId) -> IrResult<&mut Self> {
        self.controlled(OpType::H, control.into(), target)
    }

    /// Apply multi-controlled X gate.
    pub fn mcx(&mut self, controls: Controls, target: QubitId) -> IrResult<&mut Self> {
        self.emit(OpType::X, vec![], controls, vec![target])
    }

    /// Apply multi-controlled Y gate.
    pub fn mcy(&mut self, controls: Controls, target: QubitId) -> IrResult<&mut Self> {
        self.emit(OpType::Y, vec![], controls, vec![target])
    }

    /// Apply multi-controlled Z gate.
    pub fn mcz(&mut self, controls: Controls, target: QubitId) -> IrResult<&mut Self> {
        self.emit(OpType::Z, vec![], controls, vec![target])
    }

    /// Apply multi-controlled Hadamard gate.
    pub fn mch(&mut self, controls: Controls, target: QubitId) -> IrResult<&mut Self> {
        self.emit(OpType::H, vec![], controls, vec![target])
    }

    /// Apply Toffoli gate.
    pub fn ccx(&mut self, c0: QubitId, c1: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.mcx([Control::pos(c0), Control::pos(c1)].into_iter().collect(), target)
    }

    /// Apply controlled phase gate.
    pub fn cp(
        &mut self,
        lambda: impl Into<SymbolOrNumber>,
        control: impl Into<Control>,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::P, lambda.into(), [control.into()].into_iter().collect(), target)
    }

    /// Apply controlled Rx gate.
    pub fn crx(
        &mut self,
        theta: impl Into<SymbolOrNumber>,
        control: impl Into<Control>,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::RX, theta.into(), [control.into()].into_iter().collect(), target)
    }

    /// Apply controlled Ry gate.
    pub fn cry(
        &mut self,
        theta: impl Into<SymbolOrNumber>,
        control: impl Into<Control>,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::RY, theta.into(), [control.into()].into_iter().collect(), target)
    }

    /// Apply controlled Rz gate.
    pub fn crz(
        &mut self,
        theta: impl Into<SymbolOrNumber>,
        control: impl Into<Control>,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::RZ, theta.into(), [control.into()].into_iter().collect(), target)
    }

    /// Apply multi-controlled phase gate.
    pub fn mcp(
        &mut self,
        lambda: impl Into<SymbolOrNumber>,
        controls: Controls,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::P, lambda.into(), controls, target)
    }

    /// Apply multi-controlled Rx gate.
    pub fn mcrx(
        &mut self,
        theta: impl Into<SymbolOrNumber>,
        controls: Controls,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::RX, theta.into(), controls, target)
    }

    /// Apply multi-controlled Ry gate.
    pub fn mcry(
        &mut self,
        theta: impl Into<SymbolOrNumber>,
        controls: Controls,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::RY, theta.into(), controls, target)
    }

    /// Apply multi-controlled Rz gate.
    pub fn mcrz(
        &mut self,
        theta: impl Into<SymbolOrNumber>,
        controls: Controls,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.rotation(OpType::RZ, theta.into(), controls, target)
    }

    // =========================================================================
    // Two-target gates
    // =========================================================================

    /// Apply SWAP gate.
    pub fn swap(&mut self, q0: QubitId, q1: QubitId) -> IrResult<&mut Self> {
        self.two_target(OpType::SWAP, vec![], q0, q1)
    }

    /// Apply controlled SWAP (Fredkin) gate.
    pub fn cswap(
        &mut self,
        control: impl Into<Control>,
        q0: QubitId,
        q1: QubitId,
    ) -> IrResult<&mut Self> {
        self.emit(OpType::SWAP, vec![], [control.into()].into_iter().collect(), vec![q0, q1])
    }

    /// Apply multi-controlled SWAP gate.
    pub fn mcswap(&mut self, controls: Controls, q0: QubitId, q1: QubitId) -> IrResult<&mut Self> {
        self.emit(OpType::SWAP, vec![], controls, vec![q0, q1])
    }

    /// Apply iSWAP gate.
    pub fn iswap(&mut self, q0: QubitId, q1: QubitId) -> IrResult<&mut Self> {
        self.two_target(OpType::ISWAP, vec![], q0, q1)
    }

    /// Apply iSWAP-dagger gate.
    pub fn iswapdg(&mut self, q0: QubitId, q1: QubitId) -> IrResult<&mut Self> {
        self.two_target(OpType::ISWAPdg, vec![], q0, q1)
    }

    /// Apply Peres gate.
    pub fn peres(&mut self, q0: QubitId, q1: QubitId) -> IrResult<&mut Self> {
        self.two_target(OpType::Peres, vec![], q0, q1)
    }

    /// Apply Peres-dagger gate.
    pub fn peresdg(&mut self, q0: QubitId, q1: QubitId) -> IrResult<&mut Self> {
        self.two_target(OpType::Peresdg, vec![], q0, q1)
    }

    /// Apply double CNOT gate.
    pub fn dcx(&mut self, q0: QubitId, q1: QubitId) -> IrResult<&mut Self> {
        self.two_target(OpType::DCX, vec![], q0, q1)
    }

    /// Apply echoed cross-resonance gate.
    pub fn ecr(&mut self, q0: QubitId, q1: QubitId) -> IrResult<&mut Self> {
        self.two_target(OpType::ECR, vec![], q0, q1)
    }

    /// Apply XX rotation gate.
    pub fn rxx(
        &mut self,
        theta: impl Into<SymbolOrNumber>,
        q0: QubitId,
        q1: QubitId,
    ) -> IrResult<&mut Self> {
        self.two_target(OpType::RXX, vec![theta.into()], q0, q1)
    }

    /// Apply YY rotation gate.
    pub fn ryy(
        &mut self,
        theta: impl Into<SymbolOrNumber>,
        q0: QubitId,
        q1: QubitId,
    ) -> IrResult<&mut Self> {
        self.two_target(OpType::RYY, vec![theta.into()], q0, q1)
    }

    /// Apply ZZ rotation gate.
    pub fn rzz(
        &mut self,
        theta: impl Into<SymbolOrNumber>,
        q0: QubitId,
        q1: QubitId,
    ) -> IrResult<&mut Self> {
        self.two_target(OpType::RZZ, vec![theta.into()], q0, q1)
    }

    /// Apply ZX rotation gate.
    pub fn rzx(
        &mut self,
        theta: impl Into<SymbolOrNumber>,
        q0: QubitId,
        q1: QubitId,
    ) -> IrResult<&mut Self> {
        self.two_target(OpType::RZX, vec![theta.into()], q0, q1)
    }

    /// Apply XX-YY interaction gate.
    pub fn xx_minus_yy(
        &mut self,
        theta: impl Into<SymbolOrNumber>,
        beta: impl Into<SymbolOrNumber>,
        q0: QubitId,
        q1: QubitId,
    ) -> IrResult<&mut Self> {
        self.two_target(OpType::XXminusYY, vec![theta.into(), beta.into()], q0, q1)
    }

    /// Apply XX+YY interaction gate.
    pub fn xx_plus_yy(
        &mut self,
        theta: impl Into<SymbolOrNumber>,
        beta: impl Into<SymbolOrNumber>,
        q0: QubitId,
        q1: QubitId,
    ) -> IrResult<&mut Self> {
        self.two_target(OpType::XXplusYY, vec![theta.into(), beta.into()], q0, q1)
    }

    // =========================================================================
    // Non-unitary operations
    // =========================================================================

    /// Measure `qubit` into `clbit`.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.measure_qubits(vec![qubit], vec![clbit])
    }

    /// Measure `qubits[i]` into `clbits[i]` in a single operation.
    pub fn measure_qubits(
        &mut self,
        qubits: Vec<QubitId>,
        clbits: Vec<ClbitId>,
    ) -> IrResult<&mut Self> {
        if qubits.len() != clbits.len() {
            return Err(IrError::MeasurementArityMismatch {
                qubits: qubits.len(),
                clbits: clbits.len(),
            });
        }
        for &q in &qubits {
            self.check_qubit(q, Some("measure"))?;
        }
        for &c in &clbits {
            self.check_clbit(c, Some("measure"))?;
        }
        self.push(Operation::NonUnitary(NonUnitaryOperation::measure(qubits, clbits)));
        Ok(self)
    }

    /// Reset `qubit` to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.reset_qubits(vec![qubit])
    }

    /// Reset every qubit in `qubits`.
    pub fn reset_qubits(&mut self, qubits: Vec<QubitId>) -> IrResult<&mut Self> {
        for &q in &qubits {
            self.check_qubit(q, Some("reset"))?;
        }
        self.push(Operation::NonUnitary(NonUnitaryOperation::reset(qubits)));
        Ok(self)
    }

    /// Barrier across all non-ancillary qubits.
    pub fn barrier(&mut self) -> IrResult<&mut Self> {
        let qubits = (0..self.num_qubits()).map(QubitId::from).collect();
        self.barrier_on(qubits)
    }

    /// Barrier across the given qubits.
    pub fn barrier_on(&mut self, qubits: Vec<QubitId>) -> IrResult<&mut Self> {
        for &q in &qubits {
            self.check_qubit(q, Some("barrier"))?;
        }
        self.push(Operation::Standard(StandardOperation::new(
            OpType::Barrier,
            Controls::new(),
            qubits,
            vec![],
        )));
        Ok(self)
    }

    /// Apply a single-target gate conditioned on a classical register.
    ///
    /// The gate fires if `register <comparison> expected_value` holds at run time.
    #[allow(clippy::too_many_arguments)]
    pub fn classic_controlled(
        &mut self,
        op_type: OpType,
        target: QubitId,
        controls: Controls,
        register: Register,
        expected_value: u64,
        comparison: ComparisonKind,
        params: Vec<f64>,
    ) -> IrResult<&mut Self> {
        Self::check_arity(op_type, 1, params.len())?;
        self.check_operands(&controls, &[target], op_type.name())?;
        if register.end() as usize > self.num_classical_bits() {
            return Err(IrError::ClassicalRegisterOutOfRange {
                start: register.start,
                size: register.size,
                num_clbits: self.num_classical_bits(),
            });
        }

        let gate = StandardOperation::new(op_type, controls, vec![target], params);
        self.push(Operation::ClassicControlled(ClassicControlledOperation::new(
            Operation::Standard(gate),
            register,
            expected_value,
            comparison,
        )));
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::{Expression, Variable};
    use std::f64::consts::PI;

    #[test]
    fn test_concrete_and_symbolic_dispatch() {
        let mut qc = QuantumComputation::with_size(2, 0);
        qc.rx(PI / 2.0, QubitId(0)).unwrap();
        assert!(qc.is_variable_free());
        assert!(qc[0].is_standard());

        qc.ry(Expression::variable("theta") * 2.0, QubitId(1)).unwrap();
        assert!(!qc.is_variable_free());
        assert!(qc[1].is_symbolic());
        assert_eq!(qc.variables(), vec![&Variable::new("theta")]);
    }

    #[test]
    fn test_constant_expression_stays_concrete() {
        let mut qc = QuantumComputation::with_size(1, 0);
        qc.u(Expression::constant(0.1), 0.2, 0.3, QubitId(0)).unwrap();
        assert!(qc[0].is_standard());
    }

    #[test]
    fn test_range_check() {
        let mut qc = QuantumComputation::with_size(2, 0);
        let err = qc.cx(QubitId(0), QubitId(2)).unwrap_err();
        assert_eq!(err.to_string(), "Qubit q2 out of range (2 qubits) (gate: x)");
        assert!(qc.is_empty());
    }

    #[test]
    fn test_arity_checks() {
        let mut qc = QuantumComputation::with_size(2, 2);
        assert!(matches!(
            qc.emit(OpType::SWAP, vec![], Controls::new(), vec![QubitId(0)]),
            Err(IrError::TargetCountMismatch { expected: 2, got: 1, .. })
        ));
        assert!(matches!(
            qc.emit(OpType::RZ, vec![], Controls::new(), vec![QubitId(0)]),
            Err(IrError::ParameterCountMismatch { expected: 1, got: 0, .. })
        ));
        assert!(matches!(
            qc.emit(OpType::Measure, vec![], Controls::new(), vec![QubitId(0)]),
            Err(IrError::NotAGate(_))
        ));
        assert!(matches!(
            qc.measure_qubits(vec![QubitId(0), QubitId(1)], vec![ClbitId(0)]),
            Err(IrError::MeasurementArityMismatch { qubits: 2, clbits: 1 })
        ));
        assert!(qc.is_empty());
    }

    #[test]
    fn test_negative_control() {
        let mut qc = QuantumComputation::with_size(2, 0);
        qc.cx(Control::neg(0u32), QubitId(1)).unwrap();
        assert_eq!(format!("{}", qc[0]), "cx !q0, q1");
    }

    #[test]
    fn test_classic_controlled() {
        let mut qc = QuantumComputation::with_size(2, 1);
        qc.h(QubitId(0)).unwrap().measure(QubitId(0), ClbitId(0)).unwrap();
        qc.classic_controlled(
            OpType::X,
            QubitId(1),
            Controls::new(),
            Register::new(0, 1),
            1,
            ComparisonKind::Eq,
            vec![],
        )
        .unwrap();
        let Operation::ClassicControlled(cc) = &qc[2] else {
            panic!("expected classic-controlled")
        };
        assert_eq!(cc.operation().op_type(), OpType::X);
        assert_eq!(cc.operation().targets(), &[QubitId(1)]);
        assert_eq!(cc.expected_value(), 1);
        assert!(qc.is_dynamic());

        assert!(matches!(
            qc.classic_controlled(
                OpType::X,
                QubitId(1),
                Controls::new(),
                Register::new(0, 2),
                1,
                ComparisonKind::Eq,
                vec![],
            ),
            Err(IrError::ClassicalRegisterOutOfRange { .. })
        ));
    }

    #[test]
    fn test_is_dynamic_mid_circuit_measurement() {
        let mut qc = QuantumComputation::with_size(2, 2);
        qc.h(QubitId(0)).unwrap();
        qc.measure(QubitId(0), ClbitId(0)).unwrap();
        qc.h(QubitId(1)).unwrap();
        assert!(!qc.is_dynamic());
        qc.barrier().unwrap();
        assert!(!qc.is_dynamic());
        qc.x(QubitId(0)).unwrap();
        assert!(qc.is_dynamic());

        let mut qc = QuantumComputation::with_size(1, 0);
        qc.reset(QubitId(0)).unwrap();
        assert!(qc.is_dynamic());
    }
}
