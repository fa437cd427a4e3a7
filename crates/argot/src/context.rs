//! Execution context handed to hooks and actions.
//!
//! The context carries the resolved command, the parsed arguments left after
//! command-path resolution, the environment reader, a cancellation token, and
//! an [`Extensions`] map for passing per-invocation state from hooks to the
//! action:
//!
//! ```rust
//! use argot::{App, Command};
//!
//! struct RequestId(u64);
//!
//! let app = App::builder("svc", "1.0.0")
//!     .command(
//!         Command::new("ping", |ctx, _| {
//!             let id = ctx.extensions.get_required::<RequestId>()?;
//!             assert_eq!(id.0, 7);
//!             Ok(())
//!         })
//!         .pre_run(|ctx, _| {
//!             ctx.extensions.insert(RequestId(7));
//!             Ok(())
//!         }),
//!     )
//!     .build()
//!     .unwrap();
//!
//! app.dispatch(["svc", "ping"]).unwrap();
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::bind::Hydrate;
use crate::command::Command;
use crate::env::EnvReader;
use crate::error::ArgotError;
use crate::hydrate::hydrate;
use crate::tokenize::ParsedArgs;
use crate::tree::{CommandId, CommandTree};

/// Type-safe container for per-invocation state.
///
/// Hooks insert values; the action and later hooks read them back by type.
#[derive(Default)]
pub struct Extensions {
    map: HashMap<TypeId, Box<dyn Any>>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous value of the same type.
    pub fn insert<T: 'static>(&mut self, val: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(val))
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref())
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut())
    }

    /// Like [`get`](Self::get), but a missing value is an error.
    pub fn get_required<T: 'static>(&self) -> anyhow::Result<&T> {
        self.get::<T>().ok_or_else(|| {
            anyhow::anyhow!(
                "extension missing: type {} not found in context",
                std::any::type_name::<T>()
            )
        })
    }

    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.map.len())
            .finish_non_exhaustive()
    }
}

/// Cooperative cancellation flag.
///
/// Clones share the flag. Nothing in resolution or hydration polls it; the
/// action decides where it can stop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// State available to hooks and actions during one invocation.
pub struct Context<'a> {
    tree: &'a CommandTree,
    command: CommandId,
    args: &'a ParsedArgs,
    env: &'a dyn EnvReader,
    cancel: CancelToken,
    /// Values hooks pass along to later steps.
    pub extensions: Extensions,
}

impl<'a> Context<'a> {
    /// Creates a context for `command`.
    ///
    /// `args` should hold the positionals left after the command path.
    pub fn new(
        tree: &'a CommandTree,
        command: CommandId,
        args: &'a ParsedArgs,
        env: &'a dyn EnvReader,
    ) -> Self {
        Self {
            tree,
            command,
            args,
            env,
            cancel: CancelToken::new(),
            extensions: Extensions::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn tree(&self) -> &'a CommandTree {
        self.tree
    }

    pub fn command_id(&self) -> CommandId {
        self.command
    }

    /// The resolved command.
    pub fn command(&self) -> &'a Command {
        self.tree.command(self.command)
    }

    /// Names from the top-level command down to the resolved one.
    pub fn command_path(&self) -> Vec<&'a str> {
        self.tree.command_path(self.command)
    }

    pub fn args(&self) -> &'a ParsedArgs {
        self.args
    }

    /// Positionals after the command path.
    pub fn positionals(&self) -> &'a [String] {
        self.args.positionals()
    }

    pub fn env(&self) -> &'a dyn EnvReader {
        self.env
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Hydrates `dest` from the resolved command's flags and arguments.
    pub fn hydrate<D: Hydrate + ?Sized>(&self, dest: &mut D) -> Result<(), ArgotError> {
        hydrate(self.command(), self.args, self.env, dest)
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("command", &self.command_path())
            .field("args", &self.args)
            .field("cancelled", &self.is_cancelled())
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}
