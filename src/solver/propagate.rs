//! Bounds propagation for difference constraints.
//!
//! Each constraint tightens the interval domains of its two variables
//! until no domain changes (fixpoint) or some domain becomes empty
//! (wipeout). For `x - y ⋈ c` constraints, bounds consistency is exact:
//! once every domain is a single value that survived propagation, the
//! assignment satisfies the model.
//!
//! # Reference
//! Bessiere (2006), "Constraint Propagation", Handbook of Constraint
//! Programming, Ch. 3

use std::time::Instant;

use super::model::{Constraint, VarId};

/// Interval domain `[lb, ub]` of one variable during search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub lb: i64,
    pub ub: i64,
}

impl Bounds {
    pub fn new(lb: i64, ub: i64) -> Self {
        Self { lb, ub }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lb > self.ub
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.lb == self.ub
    }

    /// Raises the lower bound. Returns `true` if it changed.
    #[inline]
    fn raise_lb(&mut self, lb: i64) -> bool {
        if lb > self.lb {
            self.lb = lb;
            true
        } else {
            false
        }
    }

    /// Lowers the upper bound. Returns `true` if it changed.
    #[inline]
    fn lower_ub(&mut self, ub: i64) -> bool {
        if ub < self.ub {
            self.ub = ub;
            true
        } else {
            false
        }
    }
}

/// Outcome of a propagation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Fixpoint reached, every domain non-empty.
    Consistent,
    /// Some domain became empty.
    Wipeout,
    /// The deadline passed before the fixpoint.
    Interrupted,
}

/// Revisions between two deadline checks.
const DEADLINE_CHECK_INTERVAL: usize = 1024;

/// Propagates all constraints to a fixpoint.
///
/// Sweeps the constraint list forward, then backward, and repeats until
/// a full round changes nothing. Lower bounds flow along insertion
/// order and upper bounds against it, so a chain built front to back
/// settles in one round plus a confirming one.
///
/// `deadline` is checked every `DEADLINE_CHECK_INTERVAL` revisions.
pub fn propagate(
    constraints: &[Constraint],
    domains: &mut [Bounds],
    deadline: Option<Instant>,
) -> Propagation {
    if domains.iter().any(Bounds::is_empty) {
        return Propagation::Wipeout;
    }

    let mut revisions = 0usize;
    loop {
        let mut changed = false;

        for constraint in constraints.iter().chain(constraints.iter().rev()) {
            match revise(constraint, domains) {
                Some(c) => changed |= c,
                None => return Propagation::Wipeout,
            }

            revisions += 1;
            if revisions % DEADLINE_CHECK_INTERVAL == 0
                && deadline.is_some_and(|d| Instant::now() >= d)
            {
                return Propagation::Interrupted;
            }
        }

        if !changed {
            return Propagation::Consistent;
        }
    }
}

/// Revises one constraint. `None` on wipeout of either variable.
fn revise(constraint: &Constraint, domains: &mut [Bounds]) -> Option<bool> {
    match *constraint {
        Constraint::Offset {
            target,
            source,
            offset,
        } => {
            let mut changed = revise_at_least(domains, target, source, offset)?;
            changed |= revise_at_least(domains, source, target, offset.saturating_neg())?;
            Some(changed)
        }
        Constraint::AtLeast {
            later,
            earlier,
            offset,
        } => revise_at_least(domains, later, earlier, offset),
    }
}

/// Enforces `later >= earlier + offset` on bounds.
fn revise_at_least(
    domains: &mut [Bounds],
    later: VarId,
    earlier: VarId,
    offset: i64,
) -> Option<bool> {
    let earlier_lb = domains[earlier.index()].lb;
    let later_ub = domains[later.index()].ub;

    let mut changed = domains[later.index()].raise_lb(earlier_lb.saturating_add(offset));
    changed |= domains[earlier.index()].lower_ub(later_ub.saturating_sub(offset));

    if domains[later.index()].is_empty() || domains[earlier.index()].is_empty() {
        None
    } else {
        Some(changed)
    }
}
