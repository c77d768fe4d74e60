pub mod cli;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod manager;
pub mod messages;
pub mod prefs;
pub mod task;
pub mod windows;

use std::ffi::OsString;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{debug, info};

use crate::cli::Command;
use crate::events::{AppEvents, TaskStateChangeListener};
use crate::lifecycle::{AppLifecycle, CloseCoordinator, ClosePolicy, CloseState};
use crate::manager::TaskManager;
use crate::messages::MessageBundle;
use crate::prefs::{PrefsStore, Theme};
use crate::task::Task;

// Every CLI invocation starts fresh, so terminate and restart are no-ops.
#[derive(Debug, Default)]
struct CliLifecycle;

impl AppLifecycle for CliLifecycle {
    fn terminate(&mut self) {
        debug!("lifecycle terminate; run ends");
    }

    fn restart(&mut self) {
        debug!("lifecycle restart requested; no-op for the CLI driver");
    }
}

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;
    info!(verbose = cli.verbose, quiet = cli.quiet, "starting daylist");

    let store_path = cli::resolve_store_path(cli.data.as_deref())
        .context("failed to resolve the preferences path")?;
    let mut store = PrefsStore::open(&store_path)
        .with_context(|| format!("failed to open preferences at {}", store_path.display()))?;

    let locale = store.get_locale()?;
    let bundle = MessageBundle::new(&locale);
    let mut manager = TaskManager::load(store, &bundle)?;

    let mut coordinator = CloseCoordinator::new(ClosePolicy::TerminateProcess);
    coordinator.set_observer(|state| debug!(?state, "close state changed"));

    let command = cli.command.unwrap_or(Command::List);
    dispatch(&mut manager, &mut coordinator, &bundle, command)?;

    for warning in manager.store_mut().take_warnings() {
        eprintln!("warning: {warning}");
    }

    info!("done");
    Ok(())
}

fn dispatch(
    manager: &mut TaskManager,
    coordinator: &mut CloseCoordinator,
    bundle: &MessageBundle,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::List => print_tasks(manager, bundle),
        Command::Add { label } => {
            let label = label.join(" ");
            if label.trim().is_empty() {
                bail!("a task needs a label");
            }
            manager.add_task(Task::new(label.trim()))?;
            print_tasks(manager, bundle);
        }
        Command::Done { id } => {
            let mut events = AppEvents::new(manager, coordinator);
            let task = events.update_task_state(id.into(), true)?;
            println!("{task}");
            if coordinator.state() == CloseState::Closing {
                let mut lifecycle = CliLifecycle::default();
                coordinator.finish_teardown(&mut lifecycle);
                println!("All tasks done. See you tomorrow!");
            }
        }
        Command::Undone { id } => {
            let mut events = AppEvents::new(manager, coordinator);
            let task = events.update_task_state(id.into(), false)?;
            println!("{task}");
        }
        Command::Remove { id } => {
            manager.remove_task(id.into())?;
            print_tasks(manager, bundle);
        }
        Command::Prefs => {
            let store = manager.store_mut();
            let prefs = store.ui_preferences()?;
            println!("locale  {}", prefs.locale);
            println!(
                "theme   {} ({})",
                bundle.theme_name(prefs.theme),
                prefs.theme.background()
            );
            println!("ontop   {}", prefs.always_on_top);
        }
        Command::Theme { name } => {
            let Some(theme) = Theme::from_name(&name.to_uppercase()) else {
                let known: Vec<&str> = Theme::ALL.iter().map(|t| t.name()).collect();
                bail!("unknown theme {name:?}; known themes: {}", known.join(", "));
            };
            manager.store_mut().set_theme(theme)?;
            println!("theme set to {}", bundle.theme_name(theme));
        }
        Command::Ontop { value } => {
            manager.store_mut().set_always_on_top(value)?;
            println!("ontop set to {value}");
        }
        Command::Reset => {
            manager.store_mut().clear()?;
            manager.reset(prefs::default_task_set(bundle))?;
            print_tasks(manager, bundle);
        }
    }
    Ok(())
}

fn print_tasks(manager: &TaskManager, bundle: &MessageBundle) {
    println!("{}", bundle.get("app.title"));
    for task in manager.tasks() {
        println!("{:>4}  {task}", task.id());
    }
    if manager.all_done() {
        println!("(all done)");
    }
}
