//! Flag and positional-argument descriptors.
//!
//! Descriptors are built through the typed [`Input`] builder and then frozen
//! into a [`Flag`] or an [`Argument`]. Once built they no longer carry the
//! value type: the default is kept as `Box<dyn Any>` for validation plus its
//! pre-rendered raw strings for coercion, and the validator sits behind
//! [`AnyValidator`].
//!
//! ```rust
//! use argot::{Input, validate::OneOf};
//!
//! let level = Input::<String>::new("level")
//!     .description("Log level")
//!     .default("info".to_string())
//!     .validator(OneOf::new(["debug", "info", "warn"].map(String::from)))
//!     .flag()
//!     .env(["APP_LEVEL", "LEVEL"]);
//!
//! assert!(!level.is_required());
//! assert_eq!(level.default_rendered(), Some(&["info".to_string()][..]));
//! assert_eq!(level.env_sources(), ["APP_LEVEL", "LEVEL"]);
//! ```

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::validate::{erase, AnyValidator, NoOp, Validator};
use crate::value::InputValue;

/// Typed builder shared by flags and arguments.
pub struct Input<T: InputValue> {
    name: String,
    description: String,
    required: bool,
    default: Option<T>,
    validator: Option<Box<dyn AnyValidator>>,
    _value: PhantomData<fn() -> T>,
}

impl<T: InputValue> Input<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            required: false,
            default: None,
            validator: None,
            _value: PhantomData,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the input as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the value used when nothing else supplies one.
    pub fn default(mut self, value: T) -> Self {
        self.default = Some(value);
        self
    }

    /// Sets the validator. A later call replaces an earlier one; chain
    /// several checks with [`AllOf`](crate::validate::AllOf).
    pub fn validator<V>(mut self, validator: V) -> Self
    where
        V: Validator<T> + 'static,
    {
        self.validator = Some(erase::<T, V>(validator));
        self
    }

    /// Freezes the input as a named flag.
    pub fn flag(self) -> Flag {
        Flag {
            spec: self.into_spec(),
            env: Vec::new(),
        }
    }

    /// Freezes the input as a positional argument.
    pub fn argument(self) -> Argument {
        Argument {
            spec: self.into_spec(),
            long_description: String::new(),
        }
    }

    fn into_spec(self) -> InputSpec {
        InputSpec {
            name: self.name,
            description: self.description,
            required: self.required,
            default: self.default.map(|value| DefaultValue {
                rendered: value.render_values(),
                value: Box::new(value),
            }),
            validator: self.validator,
            type_hint: T::type_hint(),
        }
    }
}

/// A typed default, kept as the original value and as raw strings.
pub(crate) struct DefaultValue {
    pub(crate) value: Box<dyn Any>,
    pub(crate) rendered: Vec<String>,
}

/// The type-erased part common to flags and arguments.
pub(crate) struct InputSpec {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) required: bool,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) validator: Option<Box<dyn AnyValidator>>,
    pub(crate) type_hint: String,
}

impl InputSpec {
    pub(crate) fn validator(&self) -> &dyn AnyValidator {
        match &self.validator {
            Some(validator) => validator.as_ref(),
            None => &NoOp,
        }
    }
}

impl fmt::Debug for InputSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputSpec")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("default", &self.default.as_ref().map(|d| &d.rendered))
            .field("has_validator", &self.validator.is_some())
            .field("type_hint", &self.type_hint)
            .finish()
    }
}

/// Accessors shared by [`Flag`] and [`Argument`].
macro_rules! descriptor_accessors {
    () => {
        pub fn name(&self) -> &str {
            &self.spec.name
        }

        pub fn description(&self) -> &str {
            &self.spec.description
        }

        pub fn is_required(&self) -> bool {
            self.spec.required
        }

        pub fn has_default(&self) -> bool {
            self.spec.default.is_some()
        }

        /// The default rendered into raw strings, one per element.
        pub fn default_rendered(&self) -> Option<&[String]> {
            self.spec.default.as_ref().map(|d| d.rendered.as_slice())
        }

        /// The typed default, as handed to the validator.
        pub fn default_value(&self) -> Option<&dyn Any> {
            self.spec.default.as_ref().map(|d| d.value.as_ref())
        }

        /// The validator, or a no-op when none was declared.
        pub fn validator(&self) -> &dyn AnyValidator {
            self.spec.validator()
        }

        /// Type description for help output, such as `int64`.
        pub fn type_hint(&self) -> &str {
            &self.spec.type_hint
        }
    };
}

/// A named `--flag` descriptor.
#[derive(Debug)]
pub struct Flag {
    pub(crate) spec: InputSpec,
    env: Vec<String>,
}

impl Flag {
    descriptor_accessors!();

    /// Sets the environment variables consulted, in order, when the flag is
    /// not given explicitly.
    pub fn env<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn env_sources(&self) -> &[String] {
        &self.env
    }
}

/// A positional argument descriptor.
#[derive(Debug)]
pub struct Argument {
    pub(crate) spec: InputSpec,
    long_description: String,
}

impl Argument {
    descriptor_accessors!();

    pub fn long_description(mut self, text: impl Into<String>) -> Self {
        self.long_description = text.into();
        self
    }

    pub fn long_description_text(&self) -> &str {
        &self.long_description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::NumberRange;

    #[test]
    fn flag_keeps_typed_default_and_rendering() {
        let flag = Input::<i64>::new("count").default(5).flag();
        assert_eq!(flag.default_rendered(), Some(&["5".to_string()][..]));
        let typed = flag.default_value().and_then(|v| v.downcast_ref::<i64>());
        assert_eq!(typed, Some(&5));
        assert_eq!(flag.type_hint(), "int64");
    }

    #[test]
    fn sequence_default_renders_each_element() {
        let flag = Input::<Vec<String>>::new("tags")
            .default(vec!["a".into(), "b".into()])
            .flag();
        assert_eq!(
            flag.default_rendered().unwrap(),
            ["a".to_string(), "b".to_string()]
        );
        assert_eq!(flag.type_hint(), "strings (comma separated)");
    }

    #[test]
    fn validator_is_erased_with_input_type() {
        let flag = Input::<u8>::new("level")
            .validator(NumberRange::new(1u8, 3))
            .flag();
        assert!(flag.validator().validate_any(&2u8).is_ok());
        assert!(flag.validator().validate_any(&9u8).is_err());
        assert!(flag.validator().validate_any(&2i32).is_err());
    }

    #[test]
    fn missing_validator_is_no_op() {
        let arg = Input::<String>::new("path").required().argument();
        assert!(arg.is_required());
        assert!(arg.validator().validate_any(&42).is_ok());
    }

    #[test]
    fn env_sources_keep_order() {
        let flag = Input::<String>::new("token")
            .flag()
            .env(["PRIMARY_TOKEN", "TOKEN"]);
        assert_eq!(flag.env_sources(), ["PRIMARY_TOKEN", "TOKEN"]);
        assert!(!flag.has_default());
    }

    #[test]
    fn argument_long_description() {
        let arg = Input::<String>::new("file")
            .description("Input file")
            .argument()
            .long_description("Path to the file to process.");
        assert_eq!(arg.description(), "Input file");
        assert_eq!(arg.long_description_text(), "Path to the file to process.");
    }
}
