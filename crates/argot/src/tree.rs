//! The command arena and the command-path resolver.
//!
//! [`CommandTree::new`] flattens nested [`Command`] builders into a vector of
//! nodes. Each node stores its parent's [`CommandId`], so walking to the root
//! is index chasing with no back-pointers.
//!
//! ```rust
//! use argot::{Command, CommandTree, Context};
//!
//! fn noop(_: &mut Context<'_>, _: &[String]) -> anyhow::Result<()> {
//!     Ok(())
//! }
//!
//! let tree = CommandTree::new(vec![
//!     Command::new("db", noop).child(Command::new("migrate", noop)),
//! ])
//! .unwrap();
//!
//! let positionals = ["db", "migrate", "up"].map(String::from);
//! let resolved = tree.resolve(&positionals).unwrap();
//! assert_eq!(tree.command_path(resolved.command), ["db", "migrate"]);
//! assert_eq!(resolved.depth, 2);
//! assert_eq!(resolved.remaining, ["up"]);
//! ```

use std::collections::HashSet;
use std::mem;

use crate::command::Command;
use crate::error::ArgotError;

/// Stable index of a command inside a [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(usize);

#[derive(Debug)]
struct Node {
    command: Command,
    parent: Option<CommandId>,
    children: Vec<CommandId>,
}

/// A validated, immutable command hierarchy.
#[derive(Debug)]
pub struct CommandTree {
    nodes: Vec<Node>,
    roots: Vec<CommandId>,
}

/// Outcome of resolving a command path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// The deepest matching command.
    pub command: CommandId,
    /// Number of positional tokens consumed by the path.
    pub depth: usize,
    /// Positional tokens after the command path.
    pub remaining: &'a [String],
}

impl CommandTree {
    /// Validates and flattens `roots` and all their descendants.
    ///
    /// Every command must pass [`Command::validate`], and sibling names
    /// (top-level commands included) must be unique.
    pub fn new(roots: Vec<Command>) -> Result<Self, ArgotError> {
        check_unique_names(&roots, None)?;

        let mut tree = CommandTree {
            nodes: Vec::new(),
            roots: Vec::with_capacity(roots.len()),
        };
        for root in roots {
            let id = tree.insert(root, None)?;
            tree.roots.push(id);
        }
        tracing::debug!(commands = tree.nodes.len(), "command tree built");
        Ok(tree)
    }

    fn insert(
        &mut self,
        mut command: Command,
        parent: Option<CommandId>,
    ) -> Result<CommandId, ArgotError> {
        command.validate()?;
        let children = mem::take(&mut command.children);
        check_unique_names(&children, Some(command.name()))?;

        let id = CommandId(self.nodes.len());
        self.nodes.push(Node {
            command,
            parent,
            children: Vec::with_capacity(children.len()),
        });
        for child in children {
            let child_id = self.insert(child, Some(id))?;
            self.nodes[id.0].children.push(child_id);
        }
        Ok(id)
    }

    pub fn command(&self, id: CommandId) -> &Command {
        &self.nodes[id.0].command
    }

    pub fn parent(&self, id: CommandId) -> Option<CommandId> {
        self.nodes[id.0].parent
    }

    /// Children in declaration order.
    pub fn children(&self, id: CommandId) -> &[CommandId] {
        &self.nodes[id.0].children
    }

    /// Top-level commands in declaration order.
    pub fn roots(&self) -> &[CommandId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `id` followed by each ancestor up to its root.
    pub fn path_to_root(&self, id: CommandId) -> Vec<CommandId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        path
    }

    /// Names from the root down to `id`.
    pub fn command_path(&self, id: CommandId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .path_to_root(id)
            .into_iter()
            .map(|id| self.command(id).name())
            .collect();
        names.reverse();
        names
    }

    /// Looks up a command by its full name path.
    pub fn find(&self, path: &[&str]) -> Option<CommandId> {
        let (first, rest) = path.split_first()?;
        let mut current = self.find_in(&self.roots, first)?;
        for name in rest {
            current = self.find_in(self.children(current), name)?;
        }
        Some(current)
    }

    /// Resolves the command named by the leading positional tokens.
    ///
    /// The first token must name a top-level command; resolution then
    /// descends one level per token while a child of that name exists.
    pub fn resolve<'a>(&self, positionals: &'a [String]) -> Result<Resolution<'a>, ArgotError> {
        let first = positionals.first().ok_or(ArgotError::MissingCommand)?;
        let mut current = self
            .find_in(&self.roots, first)
            .ok_or_else(|| ArgotError::CommandNotFound {
                name: first.clone(),
            })?;

        let mut depth = 1;
        while let Some(token) = positionals.get(depth) {
            match self.find_in(self.children(current), token) {
                Some(child) => {
                    current = child;
                    depth += 1;
                }
                None => break,
            }
        }

        tracing::debug!(
            command = %self.command_path(current).join(" "),
            depth,
            remaining = positionals.len() - depth,
            "resolved command"
        );
        Ok(Resolution {
            command: current,
            depth,
            remaining: &positionals[depth..],
        })
    }

    fn find_in(&self, candidates: &[CommandId], name: &str) -> Option<CommandId> {
        candidates
            .iter()
            .copied()
            .find(|&id| self.command(id).name() == name)
    }
}

fn check_unique_names(siblings: &[Command], parent: Option<&str>) -> Result<(), ArgotError> {
    let mut seen = HashSet::new();
    for command in siblings {
        if !seen.insert(command.name()) {
            let scope = match parent {
                Some(parent) => format!("under '{parent}'"),
                None => "at top level".to_string(),
            };
            return Err(ArgotError::config(format!(
                "duplicate command '{}' {scope}",
                command.name()
            )));
        }
    }
    Ok(())
}
