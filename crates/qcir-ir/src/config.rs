//! Circuit construction settings.

use serde::{Deserialize, Serialize};

/// Settings used to construct a [`QuantumComputation`](crate::QuantumComputation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitConfig {
    /// Name of the computation.
    pub name: String,
    /// Number of qubits in the initial quantum register.
    pub num_qubits: usize,
    /// Number of bits in the initial classical register.
    pub num_clbits: usize,
    /// Seed of the per-circuit random generator. `0` draws a fresh seed.
    pub seed: u64,
    /// Name of the default quantum register.
    pub qreg_name: String,
    /// Name of the default classical register.
    pub creg_name: String,
    /// Name of the default ancillary register.
    pub ancreg_name: String,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            num_qubits: 0,
            num_clbits: 0,
            seed: 0,
            qreg_name: "q".into(),
            creg_name: "c".into(),
            ancreg_name: "anc".into(),
        }
    }
}

impl CircuitConfig {
    /// Set the circuit name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the number of qubits.
    #[must_use]
    pub fn with_num_qubits(mut self, n: usize) -> Self {
        self.num_qubits = n;
        self
    }

    /// Set the number of classical bits.
    #[must_use]
    pub fn with_num_clbits(mut self, n: usize) -> Self {
        self.num_clbits = n;
        self
    }

    /// Set the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the default register names.
    #[must_use]
    pub fn with_register_names(
        mut self,
        qreg: impl Into<String>,
        creg: impl Into<String>,
        ancreg: impl Into<String>,
    ) -> Self {
        self.qreg_name = qreg.into();
        self.creg_name = creg.into();
        self.ancreg_name = ancreg.into();
        self
    }
}
