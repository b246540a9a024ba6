use std::sync::{Mutex, MutexGuard, PoisonError};

/// The shape of values an option holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Takes no values; counts its occurrences.
    Flag,
    /// Takes precisely one value.
    Single,
    /// Takes one value per occurrence, collecting all of them.
    Multi,
}

impl OptionKind {
    /// Whether an occurrence of this kind must be followed by a value.
    pub fn accepts_value(&self) -> bool {
        !matches!(self, OptionKind::Flag)
    }
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Lock `mutex`, recovering the state from a panicked holder.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
