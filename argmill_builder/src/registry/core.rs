use std::collections::HashMap;
use thiserror::Error;

use crate::constant::*;
use crate::parser::ScanError;
use crate::registry::model::*;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum RegistryError {
    #[error("Cannot register the option '{0}': it is predefined.")]
    Reserved(String),

    #[error("Cannot duplicate the option '{0}'.")]
    DuplicateOption(String),

    #[error("Cannot duplicate the short option '{0}'.")]
    DuplicateShortOption(char),
}

/// Owns the entries keyed by fullname, with a shortname alias map for lookup.
/// Registration order is preserved; for positional registries it is the consumption order.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    entries: Vec<Entry>,
    fullnames: HashMap<String, usize>,
    shortnames: HashMap<char, String>,
}

impl Registry {
    pub(crate) fn check(&self, fullname: &str, shortname: Option<char>) -> Result<(), RegistryError> {
        if fullname == HELP_NAME {
            return Err(RegistryError::Reserved(fullname.to_string()));
        }

        if self.fullnames.contains_key(fullname) {
            return Err(RegistryError::DuplicateOption(fullname.to_string()));
        }

        if let Some(short) = shortname {
            if self.shortnames.contains_key(&short) {
                return Err(RegistryError::DuplicateShortOption(short));
            }
        }

        Ok(())
    }

    pub(crate) fn register(&mut self, entry: Entry) -> Result<(), RegistryError> {
        self.check(entry.fullname(), entry.shortname())?;

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Registering {label} as {kind} (short: {short:?}).",
                label = entry.label(),
                kind = entry.holder().kind(),
                short = entry.shortname(),
            );
        }

        if let Some(short) = entry.shortname() {
            self.shortnames.insert(short, entry.fullname().to_string());
        }

        self.fullnames
            .insert(entry.fullname().to_string(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub(crate) fn lookup_by_fullname(&self, fullname: &str) -> Option<&Entry> {
        self.fullnames
            .get(fullname)
            .map(|index| &self.entries[*index])
    }

    pub(crate) fn lookup_by_shortname(&self, shortname: char) -> Option<&Entry> {
        self.shortnames
            .get(&shortname)
            .and_then(|fullname| self.lookup_by_fullname(fullname))
    }

    /// The entry at registration position `index`.
    pub(crate) fn nth(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub(crate) fn validate_all_required(&self) -> Result<(), ScanError> {
        match self
            .entries
            .iter()
            .find(|entry| entry.holder().is_required() && !entry.holder().has_value())
        {
            Some(entry) => Err(ScanError::MissingRequired(entry.label())),
            None => Ok(()),
        }
    }
}
