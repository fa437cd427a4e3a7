//! Command descriptors.
//!
//! A [`Command`] is built once with builder calls and attached to a
//! [`CommandTree`](crate::CommandTree), which freezes it. Every hook slot is
//! filled with [`noop_hook`] until replaced, so the sequencer never has to
//! check for a missing hook.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::context::Context;
use crate::error::ArgotError;
use crate::input::{Argument, Flag};

/// Signature shared by actions and lifecycle hooks.
///
/// The second parameter is the residual argument list: unconsumed
/// positionals followed by every flag rebuilt as `--name=value`.
pub type Hook = Rc<dyn Fn(&mut Context<'_>, &[String]) -> anyhow::Result<()>>;

/// A hook that does nothing.
pub fn noop_hook() -> Hook {
    Rc::new(|_, _| Ok(()))
}

/// A node of the command tree.
pub struct Command {
    name: String,
    description: String,
    long_description: String,
    action: Hook,
    flags: Vec<Flag>,
    arguments: Vec<Argument>,
    pub(crate) children: Vec<Command>,
    pre_run: Hook,
    post_run: Hook,
    persistent_pre_run: Hook,
    persistent_post_run: Hook,
}

impl Command {
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut Context<'_>, &[String]) -> anyhow::Result<()> + 'static,
    {
        Self {
            name: name.into(),
            description: String::new(),
            long_description: String::new(),
            action: Rc::new(action),
            flags: Vec::new(),
            arguments: Vec::new(),
            children: Vec::new(),
            pre_run: noop_hook(),
            post_run: noop_hook(),
            persistent_pre_run: noop_hook(),
            persistent_post_run: noop_hook(),
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn long_description(mut self, text: impl Into<String>) -> Self {
        self.long_description = text.into();
        self
    }

    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Appends a positional argument; position follows call order.
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn child(mut self, command: Command) -> Self {
        self.children.push(command);
        self
    }

    /// Runs before this command's action.
    pub fn pre_run<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_>, &[String]) -> anyhow::Result<()> + 'static,
    {
        self.pre_run = Rc::new(hook);
        self
    }

    /// Runs after this command's action.
    pub fn post_run<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_>, &[String]) -> anyhow::Result<()> + 'static,
    {
        self.post_run = Rc::new(hook);
        self
    }

    /// Runs before the action of every descendant, outermost ancestor first.
    pub fn persistent_pre_run<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_>, &[String]) -> anyhow::Result<()> + 'static,
    {
        self.persistent_pre_run = Rc::new(hook);
        self
    }

    /// Runs after the action of every descendant, nearest ancestor first.
    pub fn persistent_post_run<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_>, &[String]) -> anyhow::Result<()> + 'static,
    {
        self.persistent_post_run = Rc::new(hook);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description_text(&self) -> &str {
        &self.description
    }

    pub fn long_description_text(&self) -> &str {
        &self.long_description
    }

    /// Flags in declaration order.
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// Positional arguments in position order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn find_flag(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name() == name)
    }

    pub(crate) fn action_hook(&self) -> &Hook {
        &self.action
    }

    pub(crate) fn pre_run_hook(&self) -> &Hook {
        &self.pre_run
    }

    pub(crate) fn post_run_hook(&self) -> &Hook {
        &self.post_run
    }

    pub(crate) fn persistent_pre_run_hook(&self) -> &Hook {
        &self.persistent_pre_run
    }

    pub(crate) fn persistent_post_run_hook(&self) -> &Hook {
        &self.persistent_post_run
    }

    /// Checks the command's own shape, ignoring children.
    ///
    /// Fails with [`ArgotError::InvalidConfiguration`] when the name is empty,
    /// when a flag or argument name repeats (including across the two), when a
    /// required argument follows an optional one, when an optional flag has
    /// neither a default nor an environment source, or when an optional
    /// argument has no default.
    pub fn validate(&self) -> Result<(), ArgotError> {
        if self.name.is_empty() {
            return Err(ArgotError::config("command name is required"));
        }
        if self.name.starts_with("--") {
            return Err(ArgotError::config(format!(
                "command name '{}' must not start with '--'",
                self.name
            )));
        }

        let mut flag_names = HashSet::new();
        for flag in &self.flags {
            if flag.name().is_empty() {
                return Err(self.invalid("flag with empty name"));
            }
            if !flag_names.insert(flag.name()) {
                return Err(self.invalid(format!("duplicate flag '{}'", flag.name())));
            }
            if !flag.is_required() && !flag.has_default() && flag.env_sources().is_empty() {
                return Err(self.invalid(format!(
                    "optional flag '{}' needs a default value or an environment source",
                    flag.name()
                )));
            }
        }

        let mut arg_names = HashSet::new();
        let mut optional_seen = None;
        for arg in &self.arguments {
            if arg.name().is_empty() {
                return Err(self.invalid("argument with empty name"));
            }
            if !arg_names.insert(arg.name()) {
                return Err(self.invalid(format!("duplicate argument '{}'", arg.name())));
            }
            if flag_names.contains(arg.name()) {
                return Err(self.invalid(format!(
                    "'{}' is used as both a flag and an argument",
                    arg.name()
                )));
            }
            if !arg.is_required() && !arg.has_default() {
                return Err(self.invalid(format!(
                    "optional argument '{}' needs a default value",
                    arg.name()
                )));
            }
            match (arg.is_required(), optional_seen) {
                (true, Some(optional)) => {
                    return Err(self.invalid(format!(
                        "required argument '{}' follows optional argument '{optional}'",
                        arg.name()
                    )));
                }
                (false, None) => optional_seen = Some(arg.name()),
                _ => {}
            }
        }

        Ok(())
    }

    fn invalid(&self, message: impl fmt::Display) -> ArgotError {
        ArgotError::config(format!("{message} in command '{}'", self.name))
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("arguments", &self.arguments)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
