//! Destination records and their binding tables.
//!
//! A destination record describes its fields once through [`Hydrate::bind`],
//! mapping each binding name to a mutable [`Field`]. The hydration engine
//! then looks fields up by descriptor name instead of inspecting the record.
//!
//! Most records derive the implementation:
//!
//! ```rust
//! use argot::Hydrate;
//!
//! #[derive(Default, Hydrate)]
//! struct Deploy {
//!     #[argot(name = "target")]
//!     target: String,
//!     #[argot(name = "replicas")]
//!     replicas: u32,
//!     #[argot(name = "label")]
//!     labels: Vec<String>,
//!     // Not bound to any input.
//!     _cache: Option<String>,
//! }
//! ```
//!
//! Hand-written implementations call [`Bindings::field`] per bound field:
//!
//! ```rust
//! use argot::{Bindings, Hydrate};
//!
//! struct Greet {
//!     name: String,
//!     loud: bool,
//! }
//!
//! impl Hydrate for Greet {
//!     fn bind<'a>(&'a mut self, bindings: &mut Bindings<'a>) {
//!         bindings.field("name", &mut self.name);
//!         bindings.field("loud", &mut self.loud);
//!     }
//! }
//! ```

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::error::{ArgotError, FieldError};
use crate::validate::AnyValidator;
use crate::value::{Scalar, ValueKind};

/// A record that flags and arguments can be hydrated into.
pub trait Hydrate {
    /// Registers every bound field under its binding name.
    fn bind<'a>(&'a mut self, bindings: &mut Bindings<'a>);
}

/// How a field consumes raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Takes the first raw value.
    Scalar(ValueKind),
    /// Splits every raw value on commas and appends each element.
    Sequence(ValueKind),
    /// Cannot be coerced into; carries the type name.
    Unsupported(&'static str),
}

/// A destination field that raw strings can be coerced into.
pub trait Field {
    fn kind(&self) -> FieldKind;

    /// Coerces `raws`, validates the coerced value, and stores it.
    ///
    /// Scalars validate and store the first raw value. Sequences validate the
    /// whole coerced `Vec` and append it to the field.
    fn assign(&mut self, raws: &[String], validator: &dyn AnyValidator) -> Result<(), FieldError>;
}

macro_rules! scalar_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Field for $ty {
                fn kind(&self) -> FieldKind {
                    FieldKind::Scalar(<$ty as Scalar>::KIND)
                }

                fn assign(
                    &mut self,
                    raws: &[String],
                    validator: &dyn AnyValidator,
                ) -> Result<(), FieldError> {
                    let Some(raw) = raws.first() else {
                        return Ok(());
                    };
                    let value = <$ty as Scalar>::parse_raw(raw)?;
                    validator.validate_any(&value)?;
                    *self = value;
                    Ok(())
                }
            }
        )+
    };
}

scalar_field!(
    String, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl<S: Scalar> Field for Vec<S> {
    fn kind(&self) -> FieldKind {
        FieldKind::Sequence(S::KIND)
    }

    fn assign(&mut self, raws: &[String], validator: &dyn AnyValidator) -> Result<(), FieldError> {
        let values = raws
            .iter()
            .flat_map(|raw| raw.split(','))
            .map(S::parse_raw)
            .collect::<Result<Vec<S>, _>>()?;
        validator.validate_any(&values)?;
        self.extend(values);
        Ok(())
    }
}

pub(crate) enum Target<'a> {
    Field(&'a mut dyn Field),
    Unsupported(&'static str),
}

impl Target<'_> {
    pub(crate) fn kind(&self) -> FieldKind {
        match self {
            Target::Field(field) => field.kind(),
            Target::Unsupported(type_name) => FieldKind::Unsupported(*type_name),
        }
    }
}

/// Collects the fields of one destination record.
#[derive(Default)]
pub struct Bindings<'a> {
    entries: Vec<(String, Target<'a>)>,
}

impl<'a> Bindings<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `field` under `name`.
    pub fn field<F: Field>(&mut self, name: impl Into<String>, field: &'a mut F) {
        self.entries.push((name.into(), Target::Field(field)));
    }

    /// Records a bound field whose type cannot be hydrated.
    ///
    /// Hydration fails with [`ArgotError::UnsupportedFieldType`] if a
    /// descriptor of the resolved command targets it.
    pub fn unsupported(&mut self, name: impl Into<String>, type_name: &'static str) {
        self.entries.push((name.into(), Target::Unsupported(type_name)));
    }

    /// Builds the lookup table, rejecting duplicate binding names.
    pub fn finish(self) -> Result<BindingTable<'a>, ArgotError> {
        let mut table = IndexMap::with_capacity(self.entries.len());
        for (name, target) in self.entries {
            match table.entry(name) {
                Entry::Occupied(entry) => {
                    return Err(ArgotError::config(format!(
                        "duplicate binding name '{}' in destination record",
                        entry.key()
                    )));
                }
                Entry::Vacant(entry) => {
                    entry.insert(target);
                }
            }
        }
        Ok(BindingTable { table })
    }
}

/// The finished name-to-field table of one destination record.
pub struct BindingTable<'a> {
    table: IndexMap<String, Target<'a>>,
}

impl<'a> BindingTable<'a> {
    /// Builds the table for `record`.
    pub fn of<D: Hydrate + ?Sized>(record: &'a mut D) -> Result<Self, ArgotError> {
        let mut bindings = Bindings::new();
        record.bind(&mut bindings);
        bindings.finish()
    }

    /// Binding names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + use<'_, 'a> {
        self.table.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// The kind of the field bound under `name`.
    pub fn kind(&self, name: &str) -> Option<FieldKind> {
        self.table.get(name).map(Target::kind)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Target<'a>> {
        self.table.get_mut(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;
    use crate::validate::{erase, from_fn, NoOp, NumberRange};
    use crate::ValidationError;

    struct Record {
        name: String,
        count: u8,
        tags: Vec<String>,
        ratio: f64,
    }

    impl Hydrate for Record {
        fn bind<'a>(&'a mut self, bindings: &mut Bindings<'a>) {
            bindings.field("name", &mut self.name);
            bindings.field("count", &mut self.count);
            bindings.field("tags", &mut self.tags);
            bindings.field("ratio", &mut self.ratio);
            bindings.unsupported("when", "std::time::SystemTime");
        }
    }

    fn record() -> Record {
        Record {
            name: String::new(),
            count: 0,
            tags: Vec::new(),
            ratio: 0.0,
        }
    }

    fn raws(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn table_reports_kinds() {
        let mut rec = record();
        let table = BindingTable::of(&mut rec).unwrap();
        assert_eq!(
            table.names().collect::<Vec<_>>(),
            ["name", "count", "tags", "ratio", "when"]
        );
        assert_eq!(
            table.kind("count"),
            Some(FieldKind::Scalar(ValueKind::Uint(8)))
        );
        assert_eq!(
            table.kind("tags"),
            Some(FieldKind::Sequence(ValueKind::Text))
        );
        assert_eq!(
            table.kind("when"),
            Some(FieldKind::Unsupported("std::time::SystemTime"))
        );
        assert!(!table.contains("missing"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut a = 0i32;
        let mut b = 0i32;
        let mut bindings = Bindings::new();
        bindings.field("n", &mut a);
        bindings.field("n", &mut b);
        let err = bindings.finish().err().unwrap();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("'n'"));
    }

    #[test]
    fn scalar_takes_first_value() {
        let mut count = 0u8;
        count.assign(&raws(&["3", "4"]), &NoOp).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn scalar_conversion_failure_leaves_field() {
        let mut count = 7u8;
        let err = count.assign(&raws(&["300"]), &NoOp).unwrap_err();
        assert!(matches!(err, FieldError::Conversion(_)));
        assert_eq!(count, 7);
    }

    #[test]
    fn scalar_is_validated_after_coercion() {
        let mut count = 0u8;
        let validator = erase::<u8, _>(NumberRange::new(1u8, 5));
        let err = count.assign(&raws(&["9"]), validator.as_ref()).unwrap_err();
        assert!(matches!(err, FieldError::Validation(_)));
        assert_eq!(count, 0);
    }

    #[test]
    fn sequence_splits_and_appends() {
        let mut tags = vec!["existing".to_string()];
        tags.assign(&raws(&["a,b", "c"]), &NoOp).unwrap();
        assert_eq!(tags, ["existing", "a", "b", "c"]);
    }

    #[test]
    fn sequence_validator_sees_whole_vec() {
        let mut ports: Vec<u16> = Vec::new();
        let validator = erase::<Vec<u16>, _>(from_fn(|v: &Vec<u16>| {
            if v.len() <= 2 {
                Ok(())
            } else {
                Err(ValidationError::new("at most two ports"))
            }
        }));
        ports.assign(&raws(&["80,443"]), validator.as_ref()).unwrap();
        assert_eq!(ports, [80, 443]);

        let err = ports
            .assign(&raws(&["1", "2", "3"]), validator.as_ref())
            .unwrap_err();
        assert!(matches!(err, FieldError::Validation(_)));
        assert_eq!(ports, [80, 443]);
    }

    #[test]
    fn bool_sequence_parses_each_element() {
        let mut flags: Vec<bool> = Vec::new();
        flags.assign(&raws(&["true,0", "T"]), &NoOp).unwrap();
        assert_eq!(flags, [true, false, true]);
    }
}
