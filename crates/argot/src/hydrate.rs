//! The hydration engine.
//!
//! [`hydrate`] fills a destination record from one resolved command's flags
//! and positional arguments. Checks that do not depend on input values run
//! first, so a malformed command or record fails before any field changes:
//!
//! 1. the command's own shape ([`Command::validate`]);
//! 2. the record's binding table (no duplicate names);
//! 3. every required descriptor has a bound field, and no descriptor targets
//!    an unsupported field.
//!
//! Flags are then processed in declaration order and arguments in position
//! order. A failure part way through can leave earlier fields assigned, so
//! callers should discard the record on error.
//!
//! A flag's raw values come from the first source that has any:
//!
//! ```text
//! --name value (all occurrences)  >  first set env source  >  default
//! ```

use crate::bind::{BindingTable, FieldKind, Hydrate, Target};
use crate::command::Command;
use crate::env::EnvReader;
use crate::error::ArgotError;
use crate::input::{Argument, Flag, InputSpec};
use crate::tokenize::ParsedArgs;
use crate::validate::{AnyValidator, NoOp};

/// Populates `dest` from `command`'s descriptors.
///
/// `args` must already have the command path removed from its positionals.
///
/// # Example
///
/// ```rust
/// use argot::{hydrate, tokenize, Command, Context, Hydrate, Input, MockEnv};
///
/// #[derive(Default, Hydrate)]
/// struct Opts {
///     #[argot(name = "name")]
///     name: String,
///     #[argot(name = "times")]
///     times: u32,
/// }
///
/// fn noop(_: &mut Context<'_>, _: &[String]) -> anyhow::Result<()> {
///     Ok(())
/// }
///
/// let cmd = Command::new("greet", noop)
///     .argument(Input::<String>::new("name").required().argument())
///     .flag(Input::<u32>::new("times").default(1).flag().env(["GREET_TIMES"]));
///
/// let env = MockEnv::new().with_var("GREET_TIMES", "3");
/// let mut opts = Opts::default();
/// hydrate(&cmd, &tokenize(["world"]), &env, &mut opts).unwrap();
/// assert_eq!(opts.name, "world");
/// assert_eq!(opts.times, 3);
/// ```
pub fn hydrate<D: Hydrate + ?Sized>(
    command: &Command,
    args: &ParsedArgs,
    env: &dyn EnvReader,
    dest: &mut D,
) -> Result<(), ArgotError> {
    command.validate()?;
    let mut table = BindingTable::of(dest)?;
    check_bindings(command, &table)?;

    for flag in command.flags() {
        hydrate_flag(flag, args, env, &mut table)?;
    }

    let positionals = args.positionals();
    let need = command.arguments().iter().filter(|a| a.is_required()).count();
    for (position, argument) in command.arguments().iter().enumerate() {
        let token = positionals.get(position);
        hydrate_argument(argument, token, need, positionals.len(), &mut table)?;
    }

    Ok(())
}

fn check_bindings(command: &Command, table: &BindingTable<'_>) -> Result<(), ArgotError> {
    let specs = command
        .flags()
        .iter()
        .map(|f| ("flag", &f.spec))
        .chain(command.arguments().iter().map(|a| ("argument", &a.spec)));

    for (what, spec) in specs {
        match table.kind(&spec.name) {
            None if spec.required => {
                return Err(ArgotError::config(format!(
                    "required {what} '{}' of command '{}' has no bound field",
                    spec.name,
                    command.name()
                )));
            }
            Some(FieldKind::Unsupported(kind)) => {
                return Err(ArgotError::UnsupportedFieldType {
                    name: spec.name.clone(),
                    kind: kind.to_string(),
                });
            }
            _ => {}
        }
    }
    Ok(())
}

fn hydrate_flag(
    flag: &Flag,
    args: &ParsedArgs,
    env: &dyn EnvReader,
    table: &mut BindingTable<'_>,
) -> Result<(), ArgotError> {
    let spec = &flag.spec;
    let Some(target) = table.get_mut(&spec.name) else {
        tracing::debug!(flag = %spec.name, "skipping unbound flag");
        return Ok(());
    };

    if let Some(values) = args.values(&spec.name).filter(|v| !v.is_empty()) {
        tracing::debug!(flag = %spec.name, source = "explicit", "resolved flag");
        return assign(target, spec, values, spec.validator());
    }

    if let Some((var, value)) = env.first_set(flag.env_sources()) {
        tracing::debug!(flag = %spec.name, source = "env", var, "resolved flag");
        return assign(target, spec, &[value], spec.validator());
    }

    if spec.default.is_some() {
        tracing::debug!(flag = %spec.name, source = "default", "resolved flag");
        return assign_default(target, spec);
    }

    if spec.required {
        return Err(ArgotError::MissingRequiredFlag {
            name: spec.name.clone(),
        });
    }
    Ok(())
}

fn hydrate_argument(
    argument: &Argument,
    token: Option<&String>,
    need: usize,
    got: usize,
    table: &mut BindingTable<'_>,
) -> Result<(), ArgotError> {
    let spec = &argument.spec;
    let Some(target) = table.get_mut(&spec.name) else {
        tracing::debug!(argument = %spec.name, "skipping unbound argument");
        return Ok(());
    };

    if let Some(token) = token {
        return assign(target, spec, std::slice::from_ref(token), spec.validator());
    }
    if spec.default.is_some() {
        return assign_default(target, spec);
    }
    if spec.required {
        return Err(ArgotError::MissingRequiredArgument {
            name: spec.name.clone(),
            need,
            got,
        });
    }
    Ok(())
}

/// Validates the typed default, then coerces its rendered form.
fn assign_default(target: &mut Target<'_>, spec: &InputSpec) -> Result<(), ArgotError> {
    let Some(default) = &spec.default else {
        return Ok(());
    };
    spec.validator()
        .validate_any(default.value.as_ref())
        .map_err(|source| ArgotError::ValidationFailed {
            name: spec.name.clone(),
            source,
        })?;
    assign(target, spec, &default.rendered, &NoOp)
}

fn assign(
    target: &mut Target<'_>,
    spec: &InputSpec,
    raws: &[String],
    validator: &dyn AnyValidator,
) -> Result<(), ArgotError> {
    match target {
        Target::Field(field) => field
            .assign(raws, validator)
            .map_err(|e| e.named(&spec.name)),
        Target::Unsupported(kind) => Err(ArgotError::UnsupportedFieldType {
            name: spec.name.clone(),
            kind: kind.to_string(),
        }),
    }
}
