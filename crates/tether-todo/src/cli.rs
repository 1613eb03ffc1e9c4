use std::collections::BTreeSet;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tether_harness::Mount;
use tether_reactive::publisher;

use crate::app::app;
use crate::error::{CliError, Result};
use crate::model::{TodoItem, todo_list};

#[derive(Debug, Parser)]
#[command(
    name = "tether-todo",
    about = "Render the Tether todo page for a list of items",
    version
)]
pub struct Cli {
    /// Item text; repeat for several items.
    #[arg(long = "item", value_name = "TEXT")]
    pub items: Vec<String>,

    /// Zero-based index of an item to mark completed; repeatable.
    #[arg(long = "completed", value_name = "INDEX")]
    pub completed: Vec<usize>,

    /// Current location fragment, e.g. `/active`.
    #[arg(long, value_name = "PATH", default_value = "/")]
    pub fragment: String,

    /// Log filter; falls back to `RUST_LOG`, then `warn`.
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;
    let markup = render(&cli)?;
    println!("{markup}");
    Ok(())
}

fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).map_err(|err| CliError::InvalidLogFilter {
            filter: level.to_owned(),
            message: err.to_string(),
        })?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| CliError::LogInit {
            message: err.to_string(),
        })
}

/// Build the list described by `cli` and return the rendered page.
pub fn render(cli: &Cli) -> Result<String> {
    let mut items = Vec::with_capacity(cli.items.len());
    for (index, text) in cli.items.iter().enumerate() {
        let text = text.trim();
        if text.is_empty() {
            return Err(CliError::BlankItem { index });
        }
        items.push(TodoItem::new(text));
    }

    let mut seen = BTreeSet::new();
    for &index in &cli.completed {
        let Some(item) = items.get(index) else {
            return Err(CliError::IndexOutOfRange {
                index,
                len: items.len(),
            });
        };
        if !seen.insert(index) {
            tracing::warn!(message = "cli.completed.duplicate", index);
            continue;
        }
        item.completed.set(true);
    }

    let list = todo_list(items);
    let fragment = publisher(cli.fragment.clone());
    let page = app(&list, &fragment.observe())?;
    let mount = Mount::new(&page);
    tracing::info!(
        message = "cli.render",
        items = list.with(Vec::len),
        bindings = mount.binding_count()
    );
    Ok(mount.markup())
}
