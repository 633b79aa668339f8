//! Global Predicates
//!
//! A predicate is a pure boolean function over the local states of the two
//! tracked processes of a cut. Predicates are supplied from outside the
//! detector; [`PredicateLibrary`] indexes them so a configuration can refer
//! to them by number.

use std::fmt;
use std::sync::Arc;

/// Boolean condition over two local states
pub trait Predicate<S>: Send + Sync {
    /// Short human-readable name used in logs and reports
    fn name(&self) -> &str;

    /// Evaluate on the states of the `(i, j)` processes of a cut
    fn evaluate(&self, state_i: &S, state_j: &S) -> bool;
}

/// Adapter turning a closure into a named [`Predicate`]
pub struct FnPredicate<F> {
    name: String,
    f: F,
}

impl<F> FnPredicate<F> {
    /// Wrap `f` under `name`
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<S, F> Predicate<S> for FnPredicate<F>
where
    F: Fn(&S, &S) -> bool + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, state_i: &S, state_j: &S) -> bool {
        (self.f)(state_i, state_j)
    }
}

impl<F> fmt::Debug for FnPredicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPredicate").field("name", &self.name).finish()
    }
}

/// Index-addressed collection of predicates
pub struct PredicateLibrary<S> {
    predicates: Vec<Arc<dyn Predicate<S>>>,
}

impl<S> PredicateLibrary<S> {
    /// Create an empty library
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Append a predicate and return its index
    pub fn register(&mut self, predicate: impl Predicate<S> + 'static) -> usize {
        self.predicates.push(Arc::new(predicate));
        self.predicates.len() - 1
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, predicate: impl Predicate<S> + 'static) -> Self {
        self.register(predicate);
        self
    }

    /// Predicate at `index`
    pub fn get(&self, index: usize) -> Option<&dyn Predicate<S>> {
        self.predicates.get(index).map(|p| p.as_ref())
    }

    /// Number of registered predicates
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Whether no predicate is registered
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Names in index order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.predicates.iter().map(|p| p.name())
    }
}

impl<S> Default for PredicateLibrary<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for PredicateLibrary<S> {
    fn clone(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
        }
    }
}

impl<S> fmt::Debug for PredicateLibrary<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Standard predicates over integer local variables
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `x_i == x_j`
#[derive(Debug, Clone, Copy, Default)]
pub struct Equal;

impl Predicate<i64> for Equal {
    fn name(&self) -> &str {
        "x_i == x_j"
    }

    fn evaluate(&self, state_i: &i64, state_j: &i64) -> bool {
        state_i == state_j
    }
}

/// `x_i + x_j == target`
#[derive(Debug, Clone)]
pub struct SumEquals {
    target: i64,
    name: String,
}

impl SumEquals {
    /// Match cuts whose two states add up to `target`
    pub fn new(target: i64) -> Self {
        Self {
            target,
            name: format!("x_i + x_j == {}", target),
        }
    }
}

impl Predicate<i64> for SumEquals {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, state_i: &i64, state_j: &i64) -> bool {
        state_i.checked_add(*state_j) == Some(self.target)
    }
}

/// `|x_i - x_j| >= gap`
#[derive(Debug, Clone)]
pub struct DifferenceAtLeast {
    gap: u64,
    name: String,
}

impl DifferenceAtLeast {
    /// Match cuts whose states are at least `gap` apart
    pub fn new(gap: u64) -> Self {
        Self {
            gap,
            name: format!("|x_i - x_j| >= {}", gap),
        }
    }
}

impl Predicate<i64> for DifferenceAtLeast {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, state_i: &i64, state_j: &i64) -> bool {
        state_i.abs_diff(*state_j) >= self.gap
    }
}

/// `x_i > threshold && x_j > threshold`
#[derive(Debug, Clone)]
pub struct BothAbove {
    threshold: i64,
    name: String,
}

impl BothAbove {
    /// Match cuts where both states exceed `threshold`
    pub fn new(threshold: i64) -> Self {
        Self {
            threshold,
            name: format!("x_i > {0} && x_j > {0}", threshold),
        }
    }
}

impl Predicate<i64> for BothAbove {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, state_i: &i64, state_j: &i64) -> bool {
        *state_i > self.threshold && *state_j > self.threshold
    }
}

/// The fixed predicate set used by the demo and by scenario files
///
/// | index | predicate              |
/// |-------|------------------------|
/// | 0     | `x_i == x_j`           |
/// | 1     | `x_i + x_j == 15`      |
/// | 2     | `\|x_i - x_j\| >= 6`   |
/// | 3     | `x_i > 5 && x_j > 5`   |
pub fn standard_library() -> PredicateLibrary<i64> {
    PredicateLibrary::new()
        .with(Equal)
        .with(SumEquals::new(15))
        .with(DifferenceAtLeast::new(6))
        .with(BothAbove::new(5))
}
