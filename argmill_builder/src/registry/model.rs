use std::sync::{Arc, Mutex};

use crate::api::{AnonymousField, FieldError, FlagField};
use crate::model::{lock, OptionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParameterClass {
    Opt,
    Arg,
}

/// The mutable state backing one declared option.
///
/// A closed set: flags count occurrences, single & multi hold typed values behind [`AnonymousField`].
/// Shared with the option's handle, possibly across threads for global options.
#[derive(Clone)]
pub(crate) enum Holder {
    Flag(Arc<Mutex<FlagField>>),
    Single(Arc<Mutex<dyn AnonymousField>>),
    Multi(Arc<Mutex<dyn AnonymousField>>),
}

impl Holder {
    pub(crate) fn kind(&self) -> OptionKind {
        match self {
            Holder::Flag(_) => OptionKind::Flag,
            Holder::Single(_) => OptionKind::Single,
            Holder::Multi(_) => OptionKind::Multi,
        }
    }

    pub(crate) fn accepts_value(&self) -> bool {
        self.kind().accepts_value()
    }

    /// Flags always resolve to a value (their count, possibly 0).
    pub(crate) fn has_value(&self) -> bool {
        match self {
            Holder::Flag(_) => true,
            Holder::Single(field) | Holder::Multi(field) => lock(field).has_value(),
        }
    }

    pub(crate) fn is_required(&self) -> bool {
        match self {
            Holder::Flag(_) => false,
            Holder::Single(field) | Holder::Multi(field) => lock(field).is_required(),
        }
    }

    pub(crate) fn process_flag(&self) -> Result<(), FieldError> {
        match self {
            Holder::Flag(field) => {
                lock(field).occur();
                Ok(())
            }
            Holder::Single(_) | Holder::Multi(_) => Err(FieldError::RequiresValue),
        }
    }

    pub(crate) fn process_value(&self, value: &str) -> Result<(), FieldError> {
        match self {
            Holder::Flag(_) => Err(FieldError::RejectsValue),
            Holder::Single(field) | Holder::Multi(field) => lock(field).capture(value),
        }
    }
}

impl std::fmt::Debug for Holder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Holder[{kind}, has_value={has_value}]",
            kind = self.kind(),
            has_value = self.has_value(),
        )
    }
}

#[derive(Debug)]
pub(crate) struct Entry {
    class: ParameterClass,
    fullname: String,
    shortname: Option<char>,
    help: String,
    holder: Holder,
}

impl Entry {
    pub(crate) fn option(
        fullname: impl Into<String>,
        shortname: Option<char>,
        help: impl Into<String>,
        holder: Holder,
    ) -> Self {
        Self {
            class: ParameterClass::Opt,
            fullname: fullname.into(),
            shortname,
            help: help.into(),
            holder,
        }
    }

    pub(crate) fn argument(
        fullname: impl Into<String>,
        help: impl Into<String>,
        holder: Holder,
    ) -> Self {
        Self {
            class: ParameterClass::Arg,
            fullname: fullname.into(),
            shortname: None,
            help: help.into(),
            holder,
        }
    }

    pub(crate) fn class(&self) -> ParameterClass {
        self.class
    }

    pub(crate) fn fullname(&self) -> &str {
        &self.fullname
    }

    pub(crate) fn shortname(&self) -> Option<char> {
        self.shortname
    }

    pub(crate) fn help(&self) -> &str {
        &self.help
    }

    pub(crate) fn holder(&self) -> &Holder {
        &self.holder
    }

    /// How this entry is referred to in messages.
    pub(crate) fn label(&self) -> String {
        match self.class {
            ParameterClass::Opt => format!("Option '{}'", self.fullname),
            ParameterClass::Arg => format!("Argument '{}'", self.fullname),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CollectionField, ScalarField};
    use rstest::rstest;

    fn flag() -> (Arc<Mutex<FlagField>>, Holder) {
        let field = Arc::new(Mutex::new(FlagField::default()));
        (field.clone(), Holder::Flag(field))
    }

    fn single() -> (Arc<Mutex<ScalarField<u32>>>, Holder) {
        let field = Arc::new(Mutex::new(ScalarField::new("single")));
        (field.clone(), Holder::Single(field))
    }

    fn multi() -> (Arc<Mutex<CollectionField<u32>>>, Holder) {
        let field = Arc::new(Mutex::new(CollectionField::new("multi")));
        (field.clone(), Holder::Multi(field))
    }

    #[test]
    fn holder_flag() {
        let (field, holder) = flag();
        assert_eq!(holder.kind(), OptionKind::Flag);
        assert!(!holder.accepts_value());
        assert!(holder.has_value());
        assert!(!holder.is_required());

        holder.process_flag().unwrap();
        holder.process_flag().unwrap();
        assert_eq!(lock(&field).count(), 2);
        assert_eq!(
            holder.process_value("1").unwrap_err(),
            FieldError::RejectsValue
        );
    }

    #[test]
    fn holder_single() {
        let (field, holder) = single();
        assert_eq!(holder.kind(), OptionKind::Single);
        assert!(holder.accepts_value());
        assert!(!holder.has_value());
        assert_eq!(
            holder.process_flag().unwrap_err(),
            FieldError::RequiresValue
        );

        holder.process_value("3").unwrap();
        assert!(holder.has_value());
        assert_eq!(lock(&field).value(), Some(&3));
        assert_eq!(
            holder.process_value("4").unwrap_err(),
            FieldError::SingleValueOnly
        );
    }

    #[test]
    fn holder_multi() {
        let (field, holder) = multi();
        assert_eq!(holder.kind(), OptionKind::Multi);
        assert_eq!(
            holder.process_flag().unwrap_err(),
            FieldError::RequiresValue
        );

        holder.process_value("3").unwrap();
        holder.process_value("4").unwrap();
        assert_eq!(lock(&field).values(), &[3, 4]);
    }

    #[test]
    fn holder_required() {
        let (field, holder) = single();
        lock(&field).set_required().unwrap();
        assert!(holder.is_required());
    }

    #[rstest]
    #[case(Entry::option("verbose", Some('v'), "", flag().1), "Option 'verbose'")]
    #[case(Entry::argument("arg0", "", single().1), "Argument 'arg0'")]
    fn entry_label(#[case] entry: Entry, #[case] expected: &str) {
        assert_eq!(entry.label(), expected);
    }
}
