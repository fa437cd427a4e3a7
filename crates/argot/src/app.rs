//! The application runner.
//!
//! [`App`] ties the pieces together for one process invocation:
//!
//! ```text
//! argv → tokenize → --version? → resolve → --help? → app pre-run
//!      → command hooks + action → app post-run
//! ```
//!
//! # Example
//!
//! ```rust
//! use argot::{App, Command, Hydrate, Input, RunResult};
//!
//! #[derive(Default, Hydrate)]
//! struct Add {
//!     #[argot(name = "a")]
//!     a: i64,
//!     #[argot(name = "b")]
//!     b: i64,
//! }
//!
//! let app = App::builder("calc", "0.1.0")
//!     .description("Tiny calculator")
//!     .command(
//!         Command::new("add", |ctx, _| {
//!             let mut add = Add::default();
//!             ctx.hydrate(&mut add)?;
//!             println!("{}", add.a + add.b);
//!             Ok(())
//!         })
//!         .argument(Input::<i64>::new("a").required().argument())
//!         .argument(Input::<i64>::new("b").required().argument()),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(app.dispatch(["calc", "add", "2", "3"]).unwrap(), RunResult::Executed);
//! assert_eq!(
//!     app.dispatch(["calc", "--version"]).unwrap(),
//!     RunResult::Version("calc v0.1.0".to_string())
//! );
//! ```

use std::fmt;

use crate::command::{noop_hook, Command, Hook};
use crate::context::{CancelToken, Context};
use crate::env::{EnvReader, RealEnv};
use crate::error::ArgotError;
use crate::help;
use crate::hooks::{execute, run_phase, HookPhase};
use crate::tokenize::tokenize;
use crate::tree::CommandTree;

/// What a dispatch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    /// A command ran to completion.
    Executed,
    /// `--version` was given; holds `"<name> v<version>"`.
    Version(String),
    /// `--help` was given; holds the rendered help.
    Help(String),
    /// No command matched; holds the top-level usage text.
    Usage(String),
}

/// A command-line application: a validated command tree plus app-level hooks.
pub struct App {
    name: String,
    version: String,
    description: String,
    long_description: String,
    tree: CommandTree,
    pre_run: Hook,
    post_run: Hook,
    env: Box<dyn EnvReader>,
}

impl App {
    pub fn builder(name: impl Into<String>, version: impl Into<String>) -> AppBuilder {
        AppBuilder::new(name, version)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    /// The top-level usage text.
    pub fn usage(&self) -> String {
        let about = if self.long_description.is_empty() {
            &self.description
        } else {
            &self.long_description
        };
        help::render_usage(&self.name, about, &self.tree)
    }

    /// Help for the command at `path`, if it exists.
    pub fn help(&self, path: &[&str]) -> Option<String> {
        let id = self.tree.find(path)?;
        Some(help::render_help(&self.name, &self.tree, id))
    }

    /// Runs one invocation. `args[0]` is the program name and is ignored.
    pub fn dispatch<I, S>(&self, args: I) -> Result<RunResult, ArgotError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dispatch_with_cancel(args, CancelToken::new())
    }

    /// Like [`dispatch`](Self::dispatch), handing `cancel` to the context.
    pub fn dispatch_with_cancel<I, S>(
        &self,
        args: I,
        cancel: CancelToken,
    ) -> Result<RunResult, ArgotError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = tokenize(args.into_iter().skip(1));

        if parsed.has_flag("version") {
            return Ok(RunResult::Version(format!("{} v{}", self.name, self.version)));
        }
        if parsed.positionals().is_empty() && parsed.has_flag("help") {
            return Ok(RunResult::Help(self.usage()));
        }

        let resolution = match self.tree.resolve(parsed.positionals()) {
            Ok(resolution) => resolution,
            Err(ArgotError::CommandNotFound { name }) => {
                tracing::debug!(%name, "no command found");
                return Ok(RunResult::Usage(self.usage()));
            }
            Err(err) => return Err(err),
        };
        let id = resolution.command;

        if parsed.has_flag("help") {
            return Ok(RunResult::Help(help::render_help(&self.name, &self.tree, id)));
        }

        let rest = parsed.skip_positionals(resolution.depth);
        let residual = rest.to_args();
        let mut ctx = Context::new(&self.tree, id, &rest, self.env.as_ref()).with_cancel(cancel);

        run_phase(HookPhase::AppPreRun, &self.name, &self.pre_run, &mut ctx, &residual)?;
        execute(&self.tree, id, &mut ctx, &residual)?;
        run_phase(HookPhase::AppPostRun, &self.name, &self.post_run, &mut ctx, &residual)?;
        Ok(RunResult::Executed)
    }

    /// Dispatches and prints any version, help, or usage text to stdout.
    ///
    /// A missing command prints the usage to stderr and returns
    /// [`ArgotError::MissingCommand`].
    pub fn run<I, S>(&self, args: I) -> Result<(), ArgotError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.dispatch(args) {
            Ok(RunResult::Executed) => Ok(()),
            Ok(RunResult::Version(text)) => {
                println!("{text}");
                Ok(())
            }
            Ok(RunResult::Help(text)) | Ok(RunResult::Usage(text)) => {
                print!("{text}");
                Ok(())
            }
            Err(ArgotError::MissingCommand) => {
                eprint!("{}", self.usage());
                Err(ArgotError::MissingCommand)
            }
            Err(err) => Err(err),
        }
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}

/// Builder for [`App`].
pub struct AppBuilder {
    name: String,
    version: String,
    description: String,
    long_description: String,
    commands: Vec<Command>,
    pre_run: Hook,
    post_run: Hook,
    env: Box<dyn EnvReader>,
}

impl AppBuilder {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: String::new(),
            long_description: String::new(),
            commands: Vec::new(),
            pre_run: noop_hook(),
            post_run: noop_hook(),
            env: Box::new(RealEnv),
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

    /// Adds a top-level command.
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Runs before every command's hooks.
    pub fn pre_run<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_>, &[String]) -> anyhow::Result<()> + 'static,
    {
        self.pre_run = std::rc::Rc::new(hook);
        self
    }

    /// Runs after every command's hooks.
    pub fn post_run<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_>, &[String]) -> anyhow::Result<()> + 'static,
    {
        self.post_run = std::rc::Rc::new(hook);
        self
    }

    /// Replaces the process environment as the flag fallback source.
    pub fn env_reader(mut self, env: impl EnvReader + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Validates every command and freezes the tree.
    pub fn build(self) -> Result<App, ArgotError> {
        if self.name.is_empty() {
            return Err(ArgotError::config("application name is required"));
        }
        let tree = CommandTree::new(self.commands)?;
        Ok(App {
            name: self.name,
            version: self.version,
            description: self.description,
            long_description: self.long_description,
            tree,
            pre_run: self.pre_run,
            post_run: self.post_run,
            env: self.env,
        })
    }
}
