//! Lifecycle hook sequencing around a command's action.
//!
//! For a command `c` with ancestors `root → … → parent`:
//!
//! ```text
//! root.persistent_pre_run … parent.persistent_pre_run
//!   → c.pre_run
//!   → c.action
//!   → c.post_run
//! parent.persistent_post_run … root.persistent_post_run
//! ```
//!
//! The first failure stops the chain. Nothing already run is undone.
//!
//! Persistent hooks wrap descendants only: `c`'s own `persistent_pre_run` and
//! `persistent_post_run` do not run when `c` itself is invoked. This differs
//! from sequencers whose path to the root starts at the invoked command;
//! register the hook as `pre_run` as well to get that behavior.

use std::fmt;

use crate::command::{Command, Hook};
use crate::context::Context;
use crate::error::ArgotError;
use crate::tree::{CommandId, CommandTree};

/// The step of the lifecycle a hook belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    /// Application-wide hook run before anything else.
    AppPreRun,
    /// An ancestor's persistent pre-run hook.
    PersistentPreRun,
    /// The command's own pre-run hook.
    PreRun,
    /// The command's action.
    Action,
    /// The command's own post-run hook.
    PostRun,
    /// An ancestor's persistent post-run hook.
    PersistentPostRun,
    /// Application-wide hook run after everything else.
    AppPostRun,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::AppPreRun => write!(f, "app pre-run"),
            HookPhase::PersistentPreRun => write!(f, "persistent pre-run"),
            HookPhase::PreRun => write!(f, "pre-run"),
            HookPhase::Action => write!(f, "action"),
            HookPhase::PostRun => write!(f, "post-run"),
            HookPhase::PersistentPostRun => write!(f, "persistent post-run"),
            HookPhase::AppPostRun => write!(f, "app post-run"),
        }
    }
}

/// Runs `id`'s hooks and action in lifecycle order.
pub fn execute(
    tree: &CommandTree,
    id: CommandId,
    ctx: &mut Context<'_>,
    args: &[String],
) -> Result<(), ArgotError> {
    let command = tree.command(id);
    // Ancestors nearest first.
    let ancestors: Vec<&Command> = tree
        .path_to_root(id)
        .into_iter()
        .skip(1)
        .map(|ancestor| tree.command(ancestor))
        .collect();

    for ancestor in ancestors.iter().rev() {
        let hook = ancestor.persistent_pre_run_hook();
        run_phase(HookPhase::PersistentPreRun, ancestor.name(), hook, ctx, args)?;
    }
    let name = command.name();
    run_phase(HookPhase::PreRun, name, command.pre_run_hook(), ctx, args)?;
    run_phase(HookPhase::Action, name, command.action_hook(), ctx, args)?;
    run_phase(HookPhase::PostRun, name, command.post_run_hook(), ctx, args)?;
    for ancestor in &ancestors {
        let hook = ancestor.persistent_post_run_hook();
        run_phase(HookPhase::PersistentPostRun, ancestor.name(), hook, ctx, args)?;
    }
    Ok(())
}

/// Runs a single hook, attributing a failure to `owner` and `phase`.
pub(crate) fn run_phase(
    phase: HookPhase,
    owner: &str,
    hook: &Hook,
    ctx: &mut Context<'_>,
    args: &[String],
) -> Result<(), ArgotError> {
    tracing::debug!(%phase, command = owner, "running hook");
    hook(ctx, args).map_err(|source| match phase {
        HookPhase::Action => ArgotError::Action {
            command: owner.to_string(),
            source,
        },
        phase => ArgotError::Hook {
            phase,
            command: owner.to_string(),
            source,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnv;
    use crate::tokenize::ParsedArgs;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn record(
        log: &Log,
        entry: &str,
    ) -> impl Fn(&mut Context<'_>, &[String]) -> anyhow::Result<()> {
        let log = Rc::clone(log);
        let entry = entry.to_string();
        move |_, _| {
            log.borrow_mut().push(entry.clone());
            Ok(())
        }
    }

    fn fail(entry: &str) -> impl Fn(&mut Context<'_>, &[String]) -> anyhow::Result<()> {
        let entry = entry.to_string();
        move |_, _| Err(anyhow::anyhow!("{entry} failed"))
    }

    fn traced(log: &Log, name: &str) -> Command {
        Command::new(name, record(log, &format!("{name}:action")))
            .pre_run(record(log, &format!("{name}:pre")))
            .post_run(record(log, &format!("{name}:post")))
            .persistent_pre_run(record(log, &format!("{name}:ppre")))
            .persistent_post_run(record(log, &format!("{name}:ppost")))
    }

    fn run(tree: &CommandTree, path: &[&str]) -> Result<(), ArgotError> {
        let id = tree.find(path).unwrap();
        let args = ParsedArgs::default();
        let env = MockEnv::new();
        let mut ctx = Context::new(tree, id, &args, &env);
        execute(tree, id, &mut ctx, &[])
    }

    #[test]
    fn hooks_run_in_lifecycle_order() {
        let log = Log::default();
        let tree = CommandTree::new(vec![traced(&log, "root")
            .child(traced(&log, "mid").child(traced(&log, "leaf")))])
        .unwrap();

        run(&tree, &["root", "mid", "leaf"]).unwrap();
        assert_eq!(
            *log.borrow(),
            [
                "root:ppre",
                "mid:ppre",
                "leaf:pre",
                "leaf:action",
                "leaf:post",
                "mid:ppost",
                "root:ppost",
            ]
        );
    }

    #[test]
    fn own_persistent_hooks_do_not_run_for_self() {
        let log = Log::default();
        let tree = CommandTree::new(vec![traced(&log, "root")]).unwrap();
        run(&tree, &["root"]).unwrap();
        assert_eq!(*log.borrow(), ["root:pre", "root:action", "root:post"]);
    }

    #[test]
    fn failing_pre_run_stops_the_chain() {
        let log = Log::default();
        let tree = CommandTree::new(vec![traced(&log, "root")
            .child(traced(&log, "leaf").pre_run(fail("leaf:pre")))])
        .unwrap();

        let err = run(&tree, &["root", "leaf"]).unwrap_err();
        assert!(matches!(
            err,
            ArgotError::Hook { phase: HookPhase::PreRun, ref command, .. } if command == "leaf"
        ));
        assert_eq!(*log.borrow(), ["root:ppre"]);
    }

    #[test]
    fn failing_action_skips_post_hooks() {
        let log = Log::default();
        let tree = CommandTree::new(vec![traced(&log, "root").child(
            Command::new("leaf", fail("leaf:action")).post_run(record(&log, "leaf:post")),
        )])
        .unwrap();

        let err = run(&tree, &["root", "leaf"]).unwrap_err();
        assert!(matches!(err, ArgotError::Action { ref command, .. } if command == "leaf"));
        assert_eq!(*log.borrow(), ["root:ppre"]);
    }

    #[test]
    fn failing_persistent_post_run_names_ancestor() {
        let log = Log::default();
        let tree = CommandTree::new(vec![traced(&log, "root")
            .persistent_post_run(fail("root:ppost"))
            .child(traced(&log, "leaf"))])
        .unwrap();

        let err = run(&tree, &["root", "leaf"]).unwrap_err();
        assert!(matches!(
            err,
            ArgotError::Hook { phase: HookPhase::PersistentPostRun, ref command, .. }
                if command == "root"
        ));
        assert_eq!(
            err.to_string(),
            "persistent post-run hook of 'root' failed: root:ppost failed"
        );
    }

    #[test]
    fn phase_display() {
        assert_eq!(HookPhase::PersistentPreRun.to_string(), "persistent pre-run");
        assert_eq!(HookPhase::AppPostRun.to_string(), "app post-run");
    }
}
