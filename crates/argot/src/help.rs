//! Help and usage text.
//!
//! Headings are bold through `console`, which drops the styling when the
//! output is not a terminal.

use std::fmt::Write as _;

use console::{pad_str, style, Alignment};

use crate::input::Flag;
use crate::tree::{CommandId, CommandTree};

/// Top-level usage: what `<app>` prints when no command matched.
pub(crate) fn render_usage(name: &str, description: &str, tree: &CommandTree) -> String {
    let mut out = String::new();
    if !description.is_empty() {
        let _ = writeln!(out, "{description}\n");
    }
    let _ = writeln!(out, "{}", style("Usage:").bold());
    let _ = writeln!(out, "  {name} <command> [flags]");

    let commands: Vec<(String, String)> = tree
        .roots()
        .iter()
        .map(|&id| {
            let command = tree.command(id);
            (command.name().to_string(), command.description_text().to_string())
        })
        .collect();
    if !commands.is_empty() {
        section(&mut out, "Available Commands:", &commands);
    }

    section(
        &mut out,
        "Flags:",
        &[
            ("--help".to_string(), "Show help for a command".to_string()),
            ("--version".to_string(), "Print version information".to_string()),
        ],
    );

    let _ = write!(
        out,
        "\nUse \"{name} [command] --help\" for more information about a command.\n"
    );
    out
}

/// Help for one command, reached with `<app> <path> --help`.
pub(crate) fn render_help(app_name: &str, tree: &CommandTree, id: CommandId) -> String {
    let command = tree.command(id);
    let path = tree.command_path(id).join(" ");
    let children = tree.children(id);
    let mut out = String::new();

    let about = if command.long_description_text().is_empty() {
        command.description_text()
    } else {
        command.long_description_text()
    };
    if !about.is_empty() {
        let _ = writeln!(out, "{about}\n");
    }

    let mut usage = format!("{app_name} {path}");
    if !children.is_empty() {
        usage.push_str(" <command>");
    }
    for arg in command.arguments() {
        if arg.is_required() {
            let _ = write!(usage, " <{}>", arg.name());
        } else {
            let _ = write!(usage, " [{}]", arg.name());
        }
    }
    if !command.flags().is_empty() {
        usage.push_str(" [flags]");
    }
    let _ = writeln!(out, "{}", style("Usage:").bold());
    let _ = writeln!(out, "  {usage}");

    if !command.arguments().is_empty() {
        let rows: Vec<(String, String)> = command
            .arguments()
            .iter()
            .map(|arg| {
                let mut text = arg.description().to_string();
                if let Some(default) = arg.default_rendered() {
                    let _ = write!(text, " (default: {})", default.join(","));
                }
                (format!("{} {}", arg.name(), arg.type_hint()), text.trim().to_string())
            })
            .collect();
        section(&mut out, "Arguments:", &rows);
    }

    if !children.is_empty() {
        let rows: Vec<(String, String)> = children
            .iter()
            .map(|&child| {
                let child = tree.command(child);
                (child.name().to_string(), child.description_text().to_string())
            })
            .collect();
        section(&mut out, "Available Commands:", &rows);
    }

    if !command.flags().is_empty() {
        let rows: Vec<(String, String)> = command.flags().iter().map(flag_row).collect();
        section(&mut out, "Flags:", &rows);
    }

    if !children.is_empty() {
        let _ = write!(
            out,
            "\nUse \"{app_name} {path} [command] --help\" for more information about a command.\n"
        );
    }
    out
}

fn flag_row(flag: &Flag) -> (String, String) {
    let mut text = flag.description().to_string();
    if flag.is_required() {
        text.push_str(" (required)");
    }
    if let Some(default) = flag.default_rendered() {
        let _ = write!(text, " (default: {})", default.join(","));
    }
    if !flag.env_sources().is_empty() {
        let _ = write!(text, " (env: {})", flag.env_sources().join(", "));
    }
    (
        format!("--{} {}", flag.name(), flag.type_hint()),
        text.trim().to_string(),
    )
}

fn section(out: &mut String, heading: &str, rows: &[(String, String)]) {
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
    let _ = writeln!(out, "\n{}", style(heading).bold());
    for (left, right) in rows {
        if right.is_empty() {
            let _ = writeln!(out, "  {left}");
        } else {
            let _ = writeln!(
                out,
                "  {}  {right}",
                pad_str(left, width, Alignment::Left, None)
            );
        }
    }
}
