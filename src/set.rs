use std::{fmt::Debug, hash::Hash};

use indexmap::IndexSet;

use crate::error::OutcomeError;

/// Trait implemented by every type usable as an outcome name.
///
/// Blanket implemented, `&'static str`, `String`, integers and fieldless
/// enums all qualify.
pub trait OutcomeName: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> OutcomeName for T where T: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

/// Closed set of outcome names known at compile time.
///
/// Usually implemented with `#[derive(Outcomes)]` on a fieldless enum:
///
/// ```
/// use outcomes::{Dispatcher, Outcomes};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Outcomes)]
/// enum Fetch {
///     Success,
///     Failure,
/// }
///
/// let dispatcher: Dispatcher<Fetch, ()> = Dispatcher::declared().unwrap();
/// assert_eq!(dispatcher.outcome_names(), vec![Fetch::Success, Fetch::Failure]);
/// ```
pub trait Outcomes: OutcomeName {
    /// Every name of the set, in declaration order.
    fn declared() -> Vec<Self>;
}

/// Immutable, non-empty set of declared outcome names.
///
/// Keeps declaration order, duplicates are dropped on construction.
#[derive(Debug, Clone)]
pub struct OutcomeSet<N> {
    names: IndexSet<N>,
}

impl<N: OutcomeName> OutcomeSet<N> {
    /// Builds set from given names, fails with `EmptyOutcomeSet` if there are none.
    pub fn new<I>(names: I) -> Result<Self, OutcomeError<N>>
    where
        I: IntoIterator<Item = N>,
    {
        let names: IndexSet<N> = names.into_iter().collect();
        if names.is_empty() {
            return Err(OutcomeError::EmptyOutcomeSet);
        }
        Ok(Self { names })
    }

    pub fn contains(&self, name: &N) -> bool {
        self.names.contains(name)
    }

    /// Fails with `InvalidOutcome` carrying the name if it was not declared.
    pub fn validate(&self, name: &N) -> Result<(), OutcomeError<N>> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(OutcomeError::InvalidOutcome(name.clone()))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &N> {
        self.names.iter()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Snapshot of the names in declaration order.
    pub fn to_vec(&self) -> Vec<N> {
        self.names.iter().cloned().collect()
    }
}

impl<N: Outcomes> OutcomeSet<N> {
    /// Builds set from every variant of a closed enumeration.
    pub fn declared() -> Result<Self, OutcomeError<N>> {
        Self::new(N::declared())
    }
}
