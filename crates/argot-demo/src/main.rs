//! A small task tracker built on argot.
//!
//! ```text
//! argot-demo add "write docs" 2 --tag docs --tag writing
//! argot-demo list --status done
//! ARGOT_DEMO_LIMIT=5 argot-demo list
//! argot-demo remote add origin https://example.invalid/tasks
//! argot-demo remote show origin --verbose
//! argot-demo --help
//! ```
//!
//! Set `RUST_LOG=debug` to watch resolution and hydration.

use std::process;
use std::time::Instant;

use anyhow::{bail, Context as _};
use argot::validate::{AllOf, NumberRange, OneOf, StringLength};
use argot::{App, ArgotError, Command, Context, ExitError, Hydrate, Input};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Default, Hydrate)]
struct AddTask {
    #[argot]
    title: String,
    #[argot]
    priority: u8,
    #[argot(name = "tag")]
    tags: Vec<String>,
    #[argot]
    due: String,
}

#[derive(Debug, Default, Hydrate)]
struct ListTasks {
    #[argot]
    status: String,
    #[argot]
    limit: usize,
    #[argot(name = "tag")]
    tags: Vec<String>,
}

#[derive(Debug, Default, Hydrate)]
struct AddRemote {
    #[argot]
    name: String,
    #[argot]
    url: String,
}

#[derive(Debug, Default, Hydrate)]
struct ShowRemote {
    #[argot]
    name: String,
    #[argot]
    verbose: bool,
}

/// Wall-clock start of the current command, stored by the app pre-run hook.
struct Started(Instant);

fn add_task(ctx: &mut Context<'_>, _args: &[String]) -> anyhow::Result<()> {
    let mut task = AddTask::default();
    ctx.hydrate(&mut task)?;
    debug!(?task, "hydrated");

    let tags = if task.tags.is_empty() {
        "-".to_string()
    } else {
        task.tags.join(", ")
    };
    println!("added: {} (priority {})", task.title, task.priority);
    println!("  tags: {tags}");
    if !task.due.is_empty() {
        println!("  due:  {}", task.due);
    }
    Ok(())
}

fn list_tasks(ctx: &mut Context<'_>, _args: &[String]) -> anyhow::Result<()> {
    let mut query = ListTasks::default();
    ctx.hydrate(&mut query)?;
    println!(
        "listing up to {} {} task(s){}",
        query.limit,
        query.status,
        if query.tags.is_empty() {
            String::new()
        } else {
            format!(" tagged {}", query.tags.join("+"))
        }
    );
    Ok(())
}

fn add_remote(ctx: &mut Context<'_>, _args: &[String]) -> anyhow::Result<()> {
    let mut remote = AddRemote::default();
    ctx.hydrate(&mut remote)?;
    if !remote.url.contains("://") {
        bail!("'{}' is not a URL", remote.url);
    }
    println!("remote '{}' -> {}", remote.name, remote.url);
    Ok(())
}

fn show_remote(ctx: &mut Context<'_>, _args: &[String]) -> anyhow::Result<()> {
    let mut show = ShowRemote::default();
    ctx.hydrate(&mut show)?;
    if show.name != "origin" {
        // Distinct exit code so scripts can tell "unknown remote" apart.
        return Err(ExitError::new(anyhow::anyhow!("no such remote '{}'", show.name), 3).into());
    }
    println!("remote origin");
    if show.verbose {
        println!("  fetch: https://example.invalid/tasks");
    }
    Ok(())
}

fn remote_command() -> Command {
    Command::new("remote", |_, _| {
        println!("use 'remote add' or 'remote show'");
        Ok(())
    })
    .description("Manage sync remotes")
    .persistent_pre_run(|ctx, _| {
        info!(command = %ctx.command_path().join(" "), "remote: loading remotes");
        Ok(())
    })
    .persistent_post_run(|_, _| {
        info!("remote: saving remotes");
        Ok(())
    })
    .child(
        Command::new("add", add_remote)
            .description("Register a remote")
            .argument(
                Input::<String>::new("name")
                    .description("Remote name")
                    .required()
                    .validator(StringLength::new(1, 32))
                    .argument(),
            )
            .argument(
                Input::<String>::new("url")
                    .description("Remote URL")
                    .required()
                    .argument()
                    .long_description("Any URL with a scheme, e.g. https://host/path"),
            ),
    )
    .child(
        Command::new("show", show_remote)
            .description("Show a remote")
            .argument(
                Input::<String>::new("name")
                    .description("Remote name")
                    .default("origin".to_string())
                    .argument(),
            )
            .flag(
                Input::<bool>::new("verbose")
                    .description("Print URLs")
                    .default(false)
                    .flag(),
            ),
    )
}

fn build_app() -> Result<App, ArgotError> {
    App::builder("argot-demo", env!("CARGO_PKG_VERSION"))
        .description("A tiny task tracker")
        .pre_run(|ctx, _| {
            ctx.extensions.insert(Started(Instant::now()));
            Ok(())
        })
        .post_run(|ctx, _| {
            let started = ctx
                .extensions
                .get_required::<Started>()
                .context("app pre-run did not record a start time")?;
            debug!(elapsed = ?started.0.elapsed(), "done");
            Ok(())
        })
        .command(
            Command::new("add", add_task)
                .description("Add a task")
                .argument(
                    Input::<String>::new("title")
                        .description("What needs doing")
                        .required()
                        .validator(StringLength::new(1, 80))
                        .argument(),
                )
                .argument(
                    Input::<u8>::new("priority")
                        .description("1 (highest) to 5")
                        .default(3)
                        .validator(NumberRange::new(1, 5))
                        .argument(),
                )
                .flag(
                    Input::<Vec<String>>::new("tag")
                        .description("Labels, repeated or comma separated")
                        .default(Vec::new())
                        .flag(),
                )
                .flag(
                    Input::<String>::new("due")
                        .description("Due date")
                        .default(String::new())
                        .flag()
                        .env(["ARGOT_DEMO_DUE"]),
                ),
        )
        .command(
            Command::new("list", list_tasks)
                .description("List tasks")
                .flag(
                    Input::<String>::new("status")
                        .description("Which tasks to show")
                        .default("open".to_string())
                        .validator(OneOf::new(["open", "done", "all"].map(String::from)))
                        .flag(),
                )
                .flag(
                    Input::<usize>::new("limit")
                        .description("Maximum number of tasks")
                        .default(20)
                        .validator(
                            AllOf::<usize>::new()
                                .with(NumberRange::new(1, 500))
                                .with(argot::validate::from_fn(|n: &usize| {
                                    if n % 5 == 0 {
                                        Ok(())
                                    } else {
                                        Err(argot::ValidationError::new(format!(
                                            "{n} is not a multiple of 5"
                                        )))
                                    }
                                })),
                        )
                        .flag()
                        .env(["ARGOT_DEMO_LIMIT", "TASKS_LIMIT"]),
                )
                .flag(
                    Input::<Vec<String>>::new("tag")
                        .description("Only tasks with all of these labels")
                        .default(Vec::new())
                        .flag(),
                ),
        )
        .command(remote_command())
        .build()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    init_tracing();

    let app = match build_app() {
        Ok(app) => app,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(err.exit_code());
        }
    };

    if let Err(err) = app.run(std::env::args()) {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}
