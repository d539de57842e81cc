//! Constraint model: integer variables, difference constraints, objective.
//!
//! A `CpModel` is a declarative description only. It holds no search
//! state, so the same model can be handed to any `CpSolver`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle to an integer variable inside a `CpModel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in the model.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// An integer decision variable with a closed interval domain `[lb, ub]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntVar {
    /// Variable name (diagnostics only).
    pub name: String,
    /// Lower bound (inclusive).
    pub lb: i64,
    /// Upper bound (inclusive).
    pub ub: i64,
}

/// A constraint between two variables.
///
/// Both variants are difference constraints (`x - y ⋈ c`), which is all
/// that interval sequencing needs and keeps propagation exact on bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// `target == source + offset`.
    Offset {
        target: VarId,
        source: VarId,
        offset: i64,
    },

    /// `later >= earlier + offset`.
    ///
    /// # Reference
    /// Dechter, Meiri & Pearl (1991), "Temporal Constraint Networks"
    AtLeast {
        later: VarId,
        earlier: VarId,
        offset: i64,
    },
}

/// Optimization goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Objective {
    /// Any assignment satisfying every constraint.
    #[default]
    Satisfy,
    /// Minimize the value of one variable.
    Minimize(VarId),
}

/// A constraint satisfaction / optimization model.
///
/// # Example
/// ```
/// use u_sequence::solver::CpModel;
///
/// let mut model = CpModel::new("chain");
/// let a = model.new_int_var(1, 10, "a");
/// let b = model.new_int_var(1, 10, "b");
/// model.add_at_least(b, a, 2);
/// assert_eq!(model.var_count(), 2);
/// assert_eq!(model.constraint_count(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpModel {
    name: String,
    vars: Vec<IntVar>,
    constraints: Vec<Constraint>,
    objective: Objective,
}

impl CpModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds an integer variable with domain `[lb, ub]`.
    pub fn new_int_var(&mut self, lb: i64, ub: i64, name: impl Into<String>) -> VarId {
        let id = VarId(self.vars.len());
        self.vars.push(IntVar {
            name: name.into(),
            lb,
            ub,
        });
        id
    }

    /// Adds `target == source + offset`.
    pub fn add_offset(&mut self, target: VarId, source: VarId, offset: i64) {
        self.constraints.push(Constraint::Offset {
            target,
            source,
            offset,
        });
    }

    /// Adds `later >= earlier + offset`.
    pub fn add_at_least(&mut self, later: VarId, earlier: VarId, offset: i64) {
        self.constraints.push(Constraint::AtLeast {
            later,
            earlier,
            offset,
        });
    }

    /// Sets the objective to minimizing `var`.
    pub fn minimize(&mut self, var: VarId) {
        self.objective = Objective::Minimize(var);
    }

    /// Current objective.
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Variable by handle.
    pub fn var(&self, id: VarId) -> &IntVar {
        &self.vars[id.0]
    }

    /// All variables in creation order.
    pub fn vars(&self) -> &[IntVar] {
        &self.vars
    }

    /// All constraints in insertion order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_int_var_assigns_sequential_ids() {
        let mut model = CpModel::new("m");
        let a = model.new_int_var(0, 5, "a");
        let b = model.new_int_var(3, 9, "b");

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(model.var(b).lb, 3);
        assert_eq!(model.var(b).ub, 9);
        assert_eq!(model.var(a).name, "a");
    }

    #[test]
    fn test_constraints_and_objective() {
        let mut model = CpModel::new("m");
        let a = model.new_int_var(0, 5, "a");
        let b = model.new_int_var(0, 5, "b");
        model.add_offset(b, a, 2);
        model.add_at_least(a, b, -4);
        assert_eq!(model.objective(), Objective::Satisfy);

        model.minimize(b);
        assert_eq!(model.objective(), Objective::Minimize(b));
        assert_eq!(model.constraint_count(), 2);
        assert_eq!(
            model.constraints()[0],
            Constraint::Offset {
                target: b,
                source: a,
                offset: 2
            }
        );
    }

    #[test]
    fn test_var_display() {
        assert_eq!(VarId(7).to_string(), "x7");
    }
}
