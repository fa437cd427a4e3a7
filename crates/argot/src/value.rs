//! Scalar kinds and string coercion.
//!
//! Every value that reaches a destination record starts as a raw string. The
//! [`Scalar`] trait parses those strings into concrete Rust types, and
//! [`InputValue`] describes the typed values descriptors hold (defaults and
//! validator inputs), which are either scalars or sequences of scalars.

use std::fmt;

use crate::error::ConversionError;

/// The element kind a raw string is coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Verbatim text.
    Text,
    /// Signed integer of the given bit width.
    Int(u32),
    /// Unsigned integer of the given bit width.
    Uint(u32),
    /// Boolean; an empty raw value means `true`.
    Bool,
    /// Floating point of the given bit width.
    Float(u32),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Text => write!(f, "string"),
            ValueKind::Int(bits) => write!(f, "int{bits}"),
            ValueKind::Uint(bits) => write!(f, "uint{bits}"),
            ValueKind::Bool => write!(f, "bool"),
            ValueKind::Float(bits) => write!(f, "float{bits}"),
        }
    }
}

/// A single value parsed from one raw string.
pub trait Scalar: Sized + 'static {
    /// The kind used in error messages and help output.
    const KIND: ValueKind;

    /// Parses a raw command-line string.
    fn parse_raw(raw: &str) -> Result<Self, ConversionError>;

    /// Renders the value back into the form [`parse_raw`](Self::parse_raw) accepts.
    fn render(&self) -> String;
}

impl Scalar for String {
    const KIND: ValueKind = ValueKind::Text;

    fn parse_raw(raw: &str) -> Result<Self, ConversionError> {
        Ok(raw.to_string())
    }

    fn render(&self) -> String {
        self.clone()
    }
}

impl Scalar for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn parse_raw(raw: &str) -> Result<Self, ConversionError> {
        match raw {
            "" | "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            _ => Err(ConversionError::new(
                raw,
                ValueKind::Bool,
                "expected true or false",
            )),
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

macro_rules! numeric_scalar {
    ($kind:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: ValueKind = ValueKind::$kind(<$ty>::BITS);

                fn parse_raw(raw: &str) -> Result<Self, ConversionError> {
                    raw.parse::<$ty>()
                        .map_err(|e| ConversionError::new(raw, Self::KIND, e))
                }

                fn render(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

numeric_scalar!(Int => i8, i16, i32, i64, i128, isize);
numeric_scalar!(Uint => u8, u16, u32, u64, u128, usize);

macro_rules! float_scalar {
    ($($ty:ty => $bits:expr),+ $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: ValueKind = ValueKind::Float($bits);

                fn parse_raw(raw: &str) -> Result<Self, ConversionError> {
                    raw.parse::<$ty>()
                        .map_err(|e| ConversionError::new(raw, Self::KIND, e))
                }

                fn render(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

float_scalar!(f32 => 32, f64 => 64);

/// The typed value carried by a flag or argument descriptor.
///
/// Implemented for every [`Scalar`] and for `Vec<S>` of scalars. Defaults are
/// rendered once, when the descriptor is built, into one string per element.
pub trait InputValue: Clone + 'static {
    /// Renders the value into raw strings, one per element.
    fn render_values(&self) -> Vec<String>;

    /// Short type description used by help output.
    fn type_hint() -> String;
}

macro_rules! scalar_input {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl InputValue for $ty {
                fn render_values(&self) -> Vec<String> {
                    vec![Scalar::render(self)]
                }

                fn type_hint() -> String {
                    scalar_hint(<$ty as Scalar>::KIND)
                }
            }
        )+
    };
}

scalar_input!(
    String, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl<S: Scalar + Clone> InputValue for Vec<S> {
    fn render_values(&self) -> Vec<String> {
        self.iter().map(Scalar::render).collect()
    }

    fn type_hint() -> String {
        let element = match S::KIND {
            ValueKind::Bool => "booleans [true|false]".to_string(),
            ValueKind::Text => "strings".to_string(),
            kind => format!("{kind}s"),
        };
        format!("{element} (comma separated)")
    }
}

fn scalar_hint(kind: ValueKind) -> String {
    match kind {
        ValueKind::Bool => "boolean [true|false]".to_string(),
        kind => kind.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_verbatim() {
        assert_eq!(String::parse_raw(" a,b ").unwrap(), " a,b ");
    }

    #[test]
    fn integers_respect_bit_width() {
        assert_eq!(i8::parse_raw("127").unwrap(), 127);
        assert!(i8::parse_raw("128").is_err());
        assert_eq!(i64::parse_raw("-9000000000").unwrap(), -9_000_000_000);
        assert!(u16::parse_raw("-1").is_err());
        assert!(u8::parse_raw("256").is_err());
        assert_eq!(u64::parse_raw("18446744073709551615").unwrap(), u64::MAX);
    }

    #[test]
    fn floats_parse_at_width() {
        assert_eq!(f32::parse_raw("1.5").unwrap(), 1.5f32);
        assert_eq!(f64::parse_raw("-2.25").unwrap(), -2.25);
        assert!(f64::parse_raw("one").is_err());
    }

    #[test]
    fn empty_bool_is_true() {
        assert!(bool::parse_raw("").unwrap());
        assert!(bool::parse_raw("True").unwrap());
        assert!(!bool::parse_raw("0").unwrap());
        assert!(!bool::parse_raw("false").unwrap());
    }

    #[test]
    fn bool_rejects_other_tokens() {
        let err = bool::parse_raw("yes").unwrap_err();
        assert_eq!(err.kind(), ValueKind::Bool);
        assert_eq!(err.raw(), "yes");
    }

    #[test]
    fn kind_display() {
        assert_eq!(i64::KIND.to_string(), "int64");
        assert_eq!(u8::KIND.to_string(), "uint8");
        assert_eq!(f32::KIND.to_string(), "float32");
        assert_eq!(String::KIND.to_string(), "string");
    }

    #[test]
    fn render_values_per_element() {
        assert_eq!(42i32.render_values(), vec!["42"]);
        assert_eq!(vec![1u8, 2, 3].render_values(), vec!["1", "2", "3"]);
        assert_eq!(
            vec!["one".to_string(), "two".to_string()].render_values(),
            vec!["one", "two"]
        );
    }

    #[test]
    fn type_hints() {
        assert_eq!(<i64 as InputValue>::type_hint(), "int64");
        assert_eq!(<bool as InputValue>::type_hint(), "boolean [true|false]");
        assert_eq!(
            <Vec<i32> as InputValue>::type_hint(),
            "int32s (comma separated)"
        );
        assert_eq!(
            <Vec<String> as InputValue>::type_hint(),
            "strings (comma separated)"
        );
    }
}
