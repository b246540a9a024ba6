use thiserror::Error;

use crate::api::capture::*;

pub(crate) type Caster<T> = Box<dyn Fn(&str) -> Result<T, CastError> + Send>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum FieldError {
    #[error("requires a value")]
    RequiresValue,

    #[error("doesn't accept values")]
    RejectsValue,

    #[error("accepts only one value")]
    SingleValueOnly,

    #[error("{0}")]
    Cast(#[from] CastError),

    #[error("does not allow the value '{0}'")]
    NotAllowed(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum ConstraintError {
    #[error("Option '{0}' cannot be both required and have a default value.")]
    RequiredWithDefault(String),

    #[error("Option '{0}' cannot have an empty set of allowed values.")]
    EmptyAllowList(String),

    #[error("Option '{0}' has a type without equality, so it cannot have allowed values.")]
    NoEquality(String),

    #[error("Option '{0}' has a default value that is not among the allowed values.")]
    DefaultNotAllowed(String),
}

/// The whole configuration of a value-accepting option, checked at once.
///
/// Checks always run in the same sequence, so the reported error does not depend on the order the modifiers were applied in.
pub(crate) struct Constraints<'c, T> {
    name: &'c str,
    required: bool,
    defaults: Option<&'c [T]>,
    options: Option<&'c [T]>,
}

impl<'c, T: ArgValue> Constraints<'c, T> {
    pub(crate) fn validate(&self) -> Result<(), ConstraintError> {
        // An empty default is still a default.
        if self.required && self.defaults.is_some() {
            return Err(ConstraintError::RequiredWithDefault(self.name.to_string()));
        }

        if let Some(options) = self.options {
            if options.is_empty() {
                return Err(ConstraintError::EmptyAllowList(self.name.to_string()));
            }

            let equals = T::equality()
                .ok_or_else(|| ConstraintError::NoEquality(self.name.to_string()))?;

            if !self
                .defaults
                .unwrap_or_default()
                .iter()
                .all(|value| options.iter().any(|option| equals(option, value)))
            {
                return Err(ConstraintError::DefaultNotAllowed(self.name.to_string()));
            }
        }

        Ok(())
    }
}

fn check_allowed<T: ArgValue>(
    token: &str,
    value: &T,
    options: &Option<Vec<T>>,
) -> Result<(), FieldError> {
    match (options, T::equality()) {
        (Some(options), Some(equals)) if !options.iter().any(|option| equals(option, value)) => {
            Err(FieldError::NotAllowed(token.to_string()))
        }
        _ => Ok(()),
    }
}

/// Behaviour to receive raw values without knowing the underlying type T.
///
/// We use this at the registry level so that options of differing types may sit in a single collection.
pub(crate) trait AnonymousField: Send {
    fn has_value(&self) -> bool;

    fn is_required(&self) -> bool;

    fn capture(&mut self, value: &str) -> Result<(), FieldError>;
}

#[derive(Debug, Default)]
pub(crate) struct FlagField {
    count: usize,
}

impl FlagField {
    pub(crate) fn occur(&mut self) {
        self.count += 1;
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }
}

/// The state of a single-valued option: unset, default-set, or explicitly-set.
pub(crate) struct ScalarField<T> {
    name: String,
    required: bool,
    value: Option<T>,
    explicit: bool,
    options: Option<Vec<T>>,
    caster: Caster<T>,
}

impl<T: ArgValue> ScalarField<T> {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            value: None,
            explicit: false,
            options: None,
            caster: Box::new(T::cast),
        }
    }

    fn constraints(&self) -> Constraints<'_, T> {
        Constraints {
            name: &self.name,
            required: self.required,
            defaults: if self.explicit {
                None
            } else {
                self.value.as_ref().map(std::slice::from_ref)
            },
            options: self.options.as_deref(),
        }
    }

    // Apply a configuration change, keeping it only if the whole configuration remains valid.
    fn amend<V>(&mut self, slot: fn(&mut Self) -> &mut V, value: V) -> Result<(), ConstraintError> {
        let previous = std::mem::replace(slot(self), value);
        let outcome = self.constraints().validate();

        if outcome.is_err() {
            *slot(self) = previous;
        }

        outcome
    }

    pub(crate) fn set_required(&mut self) -> Result<(), ConstraintError> {
        self.amend(|field| &mut field.required, true)
    }

    pub(crate) fn set_default(&mut self, value: T) -> Result<(), ConstraintError> {
        self.amend(|field| &mut field.value, Some(value))
    }

    pub(crate) fn set_options(&mut self, options: Vec<T>) -> Result<(), ConstraintError> {
        self.amend(|field| &mut field.options, Some(options))
    }

    pub(crate) fn set_caster(&mut self, caster: Caster<T>) {
        self.caster = caster;
    }

    pub(crate) fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub(crate) fn is_explicit(&self) -> bool {
        self.explicit
    }
}

impl<T: ArgValue> AnonymousField for ScalarField<T> {
    fn has_value(&self) -> bool {
        self.value.is_some()
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn capture(&mut self, token: &str) -> Result<(), FieldError> {
        if self.explicit {
            return Err(FieldError::SingleValueOnly);
        }

        let value = (self.caster)(token)?;
        check_allowed(token, &value, &self.options)?;
        // Replaces the default, if any.
        self.value.replace(value);
        self.explicit = true;
        Ok(())
    }
}

/// The state of a multi-valued option.
/// Defaults are discarded on the first explicit value; explicit values accumulate in order.
pub(crate) struct CollectionField<T> {
    name: String,
    required: bool,
    defaults: Option<Vec<T>>,
    values: Vec<T>,
    options: Option<Vec<T>>,
    caster: Caster<T>,
}

impl<T: ArgValue> CollectionField<T> {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            defaults: None,
            values: Vec::default(),
            options: None,
            caster: Box::new(T::cast),
        }
    }

    fn constraints(&self) -> Constraints<'_, T> {
        Constraints {
            name: &self.name,
            required: self.required,
            defaults: self.defaults.as_deref(),
            options: self.options.as_deref(),
        }
    }

    fn amend<V>(&mut self, slot: fn(&mut Self) -> &mut V, value: V) -> Result<(), ConstraintError> {
        let previous = std::mem::replace(slot(self), value);
        let outcome = self.constraints().validate();

        if outcome.is_err() {
            *slot(self) = previous;
        }

        outcome
    }

    pub(crate) fn set_required(&mut self) -> Result<(), ConstraintError> {
        self.amend(|field| &mut field.required, true)
    }

    pub(crate) fn set_defaults(&mut self, values: Vec<T>) -> Result<(), ConstraintError> {
        self.amend(|field| &mut field.defaults, Some(values))
    }

    pub(crate) fn set_options(&mut self, options: Vec<T>) -> Result<(), ConstraintError> {
        self.amend(|field| &mut field.options, Some(options))
    }

    pub(crate) fn set_caster(&mut self, caster: Caster<T>) {
        self.caster = caster;
    }

    pub(crate) fn values(&self) -> &[T] {
        if self.values.is_empty() {
            self.defaults.as_deref().unwrap_or_default()
        } else {
            &self.values
        }
    }
}

impl<T: ArgValue> AnonymousField for CollectionField<T> {
    fn has_value(&self) -> bool {
        !self.values().is_empty()
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn capture(&mut self, token: &str) -> Result<(), FieldError> {
        let value = (self.caster)(token)?;
        check_allowed(token, &value, &self.options)?;
        self.values.push(value);
        Ok(())
    }
}
