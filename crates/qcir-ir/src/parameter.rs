//! Symbolic parameters for parameterized operations.
//!
//! Parameters are either plain numbers or linear expressions over named
//! variables (`c + a₀·x₀ + a₁·x₁ + …`). Linear expressions are closed under
//! the operations needed for inversion (negation, shifting by a constant),
//! which keeps symbolic operations invertible without a general term algebra.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named symbolic variable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Variable(String);

impl Variable {
    /// Create a variable with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Variable(name.into())
    }

    /// The variable name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Variable {
    fn from(name: &str) -> Self {
        Variable::new(name)
    }
}

impl From<String> for Variable {
    fn from(name: String) -> Self {
        Variable(name)
    }
}

/// Concrete values for a set of variables.
pub type VariableAssignment = FxHashMap<Variable, f64>;

/// A single `coefficient · variable` term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Multiplicative coefficient.
    pub coefficient: f64,
    /// The variable.
    pub variable: Variable,
}

/// A linear expression `constant + Σ coefficient·variable`.
///
/// Terms are kept sorted by variable and never contain a zero coefficient
/// or the same variable twice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Expression {
    terms: Vec<Term>,
    constant: f64,
}

impl Expression {
    /// An expression consisting only of a constant.
    pub fn constant(value: f64) -> Self {
        Self {
            terms: vec![],
            constant: value,
        }
    }

    /// An expression consisting of a single variable.
    pub fn variable(var: impl Into<Variable>) -> Self {
        Self {
            terms: vec![Term {
                coefficient: 1.0,
                variable: var.into(),
            }],
            constant: 0.0,
        }
    }

    /// The terms of this expression.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// The constant offset.
    pub fn constant_value(&self) -> f64 {
        self.constant
    }

    /// True if the expression contains no variables.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Variables referenced by this expression.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.terms.iter().map(|t| &t.variable)
    }

    /// Add `coefficient · variable`, merging with an existing term.
    pub fn add_term(&mut self, coefficient: f64, variable: Variable) {
        match self
            .terms
            .binary_search_by(|t| t.variable.cmp(&variable))
        {
            Ok(pos) => {
                self.terms[pos].coefficient += coefficient;
                if self.terms[pos].coefficient == 0.0 {
                    self.terms.remove(pos);
                }
            }
            Err(pos) => {
                if coefficient != 0.0 {
                    self.terms.insert(
                        pos,
                        Term {
                            coefficient,
                            variable,
                        },
                    );
                }
            }
        }
    }

    /// Evaluate the expression; `None` if any variable is unassigned.
    pub fn evaluate(&self, assignment: &VariableAssignment) -> Option<f64> {
        self.terms.iter().try_fold(self.constant, |acc, t| {
            assignment.get(&t.variable).map(|v| acc + t.coefficient * v)
        })
    }

    /// Substitute all assigned variables, leaving the others symbolic.
    pub fn instantiate(&self, assignment: &VariableAssignment) -> Self {
        let mut result = Self::constant(self.constant);
        for t in &self.terms {
            match assignment.get(&t.variable) {
                Some(v) => result.constant += t.coefficient * v,
                None => result.add_term(t.coefficient, t.variable.clone()),
            }
        }
        result
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for t in &self.terms {
            if !first {
                f.write_str(if t.coefficient < 0.0 { " - " } else { " + " })?;
            } else if t.coefficient < 0.0 {
                f.write_str("-")?;
            }
            let c = t.coefficient.abs();
            if (c - 1.0).abs() > f64::EPSILON {
                write!(f, "{c}*")?;
            }
            write!(f, "{}", t.variable)?;
            first = false;
        }
        if first {
            write!(f, "{}", self.constant)
        } else if self.constant != 0.0 {
            let sign = if self.constant < 0.0 { '-' } else { '+' };
            write!(f, " {sign} {}", self.constant.abs())
        } else {
            Ok(())
        }
    }
}

impl From<Variable> for Expression {
    fn from(var: Variable) -> Self {
        Expression::variable(var)
    }
}

impl std::ops::Add for Expression {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self.constant += rhs.constant;
        for t in rhs.terms {
            self.add_term(t.coefficient, t.variable);
        }
        self
    }
}

impl std::ops::Add<f64> for Expression {
    type Output = Self;

    fn add(mut self, rhs: f64) -> Self::Output {
        self.constant += rhs;
        self
    }
}

impl std::ops::Sub for Expression {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl std::ops::Mul<f64> for Expression {
    type Output = Self;

    fn mul(mut self, rhs: f64) -> Self::Output {
        if rhs == 0.0 {
            return Expression::constant(0.0);
        }
        self.constant *= rhs;
        for t in &mut self.terms {
            t.coefficient *= rhs;
        }
        self
    }
}

impl std::ops::Neg for Expression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self * -1.0
    }
}

/// A gate parameter: a concrete number or a symbolic expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SymbolOrNumber {
    /// A concrete value.
    Number(f64),
    /// An expression with at least one variable.
    Symbol(Expression),
}

impl SymbolOrNumber {
    /// True if this is a concrete number.
    pub fn is_number(&self) -> bool {
        matches!(self, SymbolOrNumber::Number(_))
    }

    /// The concrete value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SymbolOrNumber::Number(v) => Some(*v),
            SymbolOrNumber::Symbol(_) => None,
        }
    }

    /// Variables referenced by this parameter.
    pub fn variables(&self) -> Vec<&Variable> {
        match self {
            SymbolOrNumber::Number(_) => vec![],
            SymbolOrNumber::Symbol(e) => e.variables().collect(),
        }
    }

    /// Substitute assigned variables, collapsing to a number when possible.
    pub fn instantiate(&self, assignment: &VariableAssignment) -> Self {
        match self {
            SymbolOrNumber::Number(v) => SymbolOrNumber::Number(*v),
            SymbolOrNumber::Symbol(e) => SymbolOrNumber::from(e.instantiate(assignment)),
        }
    }

    /// Negated parameter.
    #[must_use]
    pub fn negated(&self) -> Self {
        match self {
            SymbolOrNumber::Number(v) => SymbolOrNumber::Number(-v),
            SymbolOrNumber::Symbol(e) => SymbolOrNumber::Symbol(-e.clone()),
        }
    }

    /// Parameter shifted by a constant.
    #[must_use]
    pub fn shifted(&self, offset: f64) -> Self {
        match self {
            SymbolOrNumber::Number(v) => SymbolOrNumber::Number(v + offset),
            SymbolOrNumber::Symbol(e) => SymbolOrNumber::Symbol(e.clone() + offset),
        }
    }
}

impl fmt::Display for SymbolOrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolOrNumber::Number(v) => write!(f, "{v}"),
            SymbolOrNumber::Symbol(e) => write!(f, "{e}"),
        }
    }
}

impl From<f64> for SymbolOrNumber {
    fn from(value: f64) -> Self {
        SymbolOrNumber::Number(value)
    }
}

impl From<i32> for SymbolOrNumber {
    fn from(value: i32) -> Self {
        SymbolOrNumber::Number(f64::from(value))
    }
}

impl From<Expression> for SymbolOrNumber {
    fn from(expr: Expression) -> Self {
        if expr.is_constant() {
            SymbolOrNumber::Number(expr.constant_value())
        } else {
            SymbolOrNumber::Symbol(expr)
        }
    }
}

impl From<Variable> for SymbolOrNumber {
    fn from(var: Variable) -> Self {
        SymbolOrNumber::Symbol(Expression::variable(var))
    }
}
