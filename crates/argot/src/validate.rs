//! Validators for flag and argument values.
//!
//! Validators are strongly typed: a [`Validator<T>`] inspects a `&T`. The
//! hydration engine does not know `T`, so descriptors keep their validator
//! behind the [`AnyValidator`] erasure boundary produced by [`erase`].
//!
//! ```rust
//! use argot::validate::{erase, AllOf, NumberRange, Validator};
//!
//! let port = AllOf::new()
//!     .with(NumberRange::new(1u16, 65535))
//!     .with(argot::validate::from_fn(|p: &u16| {
//!         if *p == 8080 {
//!             Err(argot::ValidationError::new("8080 is reserved"))
//!         } else {
//!             Ok(())
//!         }
//!     }));
//! assert!(port.validate(&443).is_ok());
//! assert!(port.validate(&8080).is_err());
//!
//! let erased = erase::<u16, _>(port);
//! assert!(erased.validate_any(&443u16).is_ok());
//! assert!(erased.validate_any(&"443").is_err());
//! ```

use std::any::{type_name, Any};
use std::fmt;

use crate::error::ValidationError;

/// Checks a typed value.
pub trait Validator<T: ?Sized> {
    fn validate(&self, value: &T) -> Result<(), ValidationError>;
}

/// A validator invoked without static knowledge of the value's type.
pub trait AnyValidator {
    /// Fails with a type-mismatch error when `value` is not the type the
    /// validator was built for.
    fn validate_any(&self, value: &dyn Any) -> Result<(), ValidationError>;
}

/// Boxes a typed validator behind the erasure boundary.
pub fn erase<T, V>(validator: V) -> Box<dyn AnyValidator>
where
    T: 'static,
    V: Validator<T> + 'static,
{
    Box::new(Erased {
        validator,
        _value: std::marker::PhantomData::<fn(&T)>,
    })
}

struct Erased<T, V> {
    validator: V,
    _value: std::marker::PhantomData<fn(&T)>,
}

impl<T: 'static, V: Validator<T>> AnyValidator for Erased<T, V> {
    fn validate_any(&self, value: &dyn Any) -> Result<(), ValidationError> {
        match value.downcast_ref::<T>() {
            Some(value) => self.validator.validate(value),
            None => Err(ValidationError::type_mismatch(type_name::<T>())),
        }
    }
}

/// Accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOp;

impl<T: ?Sized> Validator<T> for NoOp {
    fn validate(&self, _value: &T) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl AnyValidator for NoOp {
    fn validate_any(&self, _value: &dyn Any) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy)]
pub struct NumberRange<T> {
    min: T,
    max: T,
}

impl<T> NumberRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd + fmt::Display> Validator<T> for NumberRange<T> {
    fn validate(&self, value: &T) -> Result<(), ValidationError> {
        if *value < self.min || *value > self.max {
            return Err(ValidationError::new(format!(
                "value {value} is out of range [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Inclusive bounds on the number of characters in a string.
#[derive(Debug, Clone, Copy)]
pub struct StringLength {
    min: usize,
    max: usize,
}

impl StringLength {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

impl Validator<String> for StringLength {
    fn validate(&self, value: &String) -> Result<(), ValidationError> {
        let len = value.chars().count();
        if len < self.min || len > self.max {
            return Err(ValidationError::new(format!(
                "length {len} is out of range [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Membership in a fixed set of allowed values.
#[derive(Debug, Clone)]
pub struct OneOf<T> {
    allowed: Vec<T>,
}

impl<T> OneOf<T> {
    pub fn new(allowed: impl IntoIterator<Item = T>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }
}

impl<T: PartialEq + fmt::Debug> Validator<T> for OneOf<T> {
    fn validate(&self, value: &T) -> Result<(), ValidationError> {
        if self.allowed.contains(value) {
            Ok(())
        } else {
            Err(ValidationError::new(format!(
                "value {value:?} is not one of {:?}",
                self.allowed
            )))
        }
    }
}

/// Runs validators in order, stopping at the first failure.
pub struct AllOf<T: ?Sized> {
    validators: Vec<Box<dyn Validator<T>>>,
}

impl<T: ?Sized> AllOf<T> {
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Appends a validator to the chain.
    pub fn with(mut self, validator: impl Validator<T> + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl<T: ?Sized> Default for AllOf<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for AllOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllOf")
            .field("len", &self.validators.len())
            .finish()
    }
}

impl<T: ?Sized> Validator<T> for AllOf<T> {
    fn validate(&self, value: &T) -> Result<(), ValidationError> {
        self.validators.iter().try_for_each(|v| v.validate(value))
    }
}

/// Adapts a closure into a validator.
pub fn from_fn<T, F>(f: F) -> FnValidator<F>
where
    T: ?Sized,
    F: Fn(&T) -> Result<(), ValidationError>,
{
    FnValidator(f)
}

/// Validator returned by [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnValidator<F>(F);

impl<T: ?Sized, F> Validator<T> for FnValidator<F>
where
    F: Fn(&T) -> Result<(), ValidationError>,
{
    fn validate(&self, value: &T) -> Result<(), ValidationError> {
        (self.0)(value)
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnValidator")
    }
}
