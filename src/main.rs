use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{self, Event, KeyEventKind};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use regdesk::api::{HttpApi, InMemoryApi, Operation, RegistrationApi};
use regdesk::app::App;
use regdesk::logging::LogRouting;
use regdesk::config::{Config, ConfigStorage, TomlConfigStorage, ensure_directories};
use regdesk::models::{Registration, RegistrationId, Status};
use regdesk::report::reporter_for;
use regdesk::{form, logging, view};

/// How often the event loop wakes up to apply finished requests
const TICK: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "regdesk")]
#[command(about = "Event registration manager TUI", long_about = None)]
struct Cli {
    /// Registrations collection endpoint (overrides the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use a built-in in-memory collection instead of a server
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the registrations table
    List {
        /// Number of rows to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print the gallery preview
    Gallery,

    /// Print one registration as JSON
    Show {
        /// Registration id
        id: String,
    },

    /// Create a registration
    Add(RecordArgs),

    /// Replace a registration
    Update {
        /// Registration id
        id: String,

        #[command(flatten)]
        record: RecordArgs,
    },

    /// Delete a registration
    Delete {
        /// Registration id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Clone)]
struct RecordArgs {
    #[arg(long)]
    event_name: String,

    #[arg(long)]
    category: String,

    /// Date as YYYY-MM-DD (RFC 3339 timestamps are accepted too)
    #[arg(long)]
    date: String,

    #[arg(long, default_value = "Registered")]
    status: Status,
}

impl RecordArgs {
    fn into_registration(self) -> Result<Registration> {
        let record = Registration::new(self.event_name, self.category, self.date, self.status);
        form::validate(&record)?;
        Ok(record)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => run_tui(&cli),
        Some(ref command) => {
            env_logger::init();
            let (_, config_dir) = ensure_directories()?;
            let config = load_config(&cli, &config_dir)?;
            let api = build_api(&cli, &config)?;
            run_command(api.as_ref(), command)
        }
    }
}

/// Load the config file and apply command-line overrides
fn load_config(cli: &Cli, config_dir: &Path) -> Result<Config> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("regdesk.toml"));
    let mut config = TomlConfigStorage::new(path).load()?;

    if let Some(url) = &cli.api_url {
        config.general.api_url = url.clone();
    }
    Ok(config)
}

fn build_api(cli: &Cli, config: &Config) -> Result<Box<dyn RegistrationApi>> {
    if cli.demo {
        log::info!("Using in-memory demo collection");
        return Ok(Box::new(InMemoryApi::with_sample_data()));
    }

    let api = HttpApi::new(&config.general.api_url)
        .with_context(|| format!("Cannot use endpoint '{}'", config.general.api_url))?;
    Ok(Box::new(api))
}

/// Launch the interactive UI
fn run_tui(cli: &Cli) -> Result<()> {
    let (data_dir, config_dir) = ensure_directories()?;
    let config = load_config(cli, &config_dir)?;

    let (flash_tx, flash_rx) = mpsc::channel();
    logging::init_logger(
        &data_dir.join("regdesk.log"),
        Some(flash_tx),
        LogRouting::new(&config.general.log_level, &config.general.flash_level),
    )?;

    let api = build_api(cli, &config)?;
    log::info!("Starting regdesk against {}", api.endpoint());

    let reporter = reporter_for(config.general.error_policy);
    let mut app = App::new(api, config, reporter, Some(flash_rx));

    let mut terminal = ratatui::init();
    let result = run_event_loop(&mut terminal, &mut app);
    ratatui::restore();

    log::info!("Exiting regdesk");
    result
}

fn run_event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    while !app.should_quit {
        app.poll_responses();
        app.poll_flash_messages();
        app.prune_flash_messages();

        terminal
            .draw(|frame| app.draw(frame))
            .context("Failed to draw frame")?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key)?;
        }
    }
    Ok(())
}

fn run_command(api: &dyn RegistrationApi, command: &Commands) -> Result<()> {
    match command {
        Commands::List { limit } => cmd_list(api, *limit),
        Commands::Gallery => cmd_gallery(api),
        Commands::Show { id } => cmd_show(api, id),
        Commands::Add(args) => cmd_add(api, args),
        Commands::Update { id, record } => cmd_update(api, id, record),
        Commands::Delete { id, yes } => cmd_delete(api, id, *yes),
    }
}

fn fetch_all(api: &dyn RegistrationApi) -> Result<Vec<Registration>> {
    api.list_all()
        .with_context(|| format!("Error {}", Operation::List))
}

/// Print the registrations table
fn cmd_list(api: &dyn RegistrationApi, limit: Option<usize>) -> Result<()> {
    let records = fetch_all(api)?;
    let rows = view::table_rows(&records);
    let shown = limit.unwrap_or(rows.len());

    println!("Registrations ({}):", rows.len());
    println!(
        "{:<8} {} {} {:<12} STATUS",
        "ID",
        pad("EVENT", 28),
        pad("CATEGORY", 16),
        "DATE"
    );
    println!("{}", "=".repeat(80));

    for row in rows.iter().take(shown) {
        let id = row.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
        println!(
            "{:<8} {} {} {:<12} [{}]",
            id,
            pad(&row.event_name, 28),
            pad(&row.category, 16),
            row.date,
            row.badge.label
        );
    }

    if rows.is_empty() {
        println!("(no registrations yet)");
    }

    Ok(())
}

/// Print the gallery preview
fn cmd_gallery(api: &dyn RegistrationApi) -> Result<()> {
    let records = fetch_all(api)?;
    let cards = view::gallery_cards(&records);

    for card in &cards {
        println!("{}", card.event_name);
        println!("  Category: {}", card.category);
        println!("  Date:     {}", card.date);
        println!("  Status:   [{}]", card.badge.label);
        println!();
    }

    if cards.is_empty() {
        println!("(no registrations yet)");
    }

    Ok(())
}

fn cmd_show(api: &dyn RegistrationApi, id: &str) -> Result<()> {
    let record = api
        .get_one(&RegistrationId::from(id))
        .with_context(|| format!("Error {}", Operation::Get))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn cmd_add(api: &dyn RegistrationApi, args: &RecordArgs) -> Result<()> {
    let record = args.clone().into_registration()?;
    api.create(&record)
        .with_context(|| format!("Error {}", Operation::Create))?;
    log::info!("Created registration '{}'", record.event_name);
    cmd_list(api, None)
}

fn cmd_update(api: &dyn RegistrationApi, id: &str, args: &RecordArgs) -> Result<()> {
    let id = RegistrationId::from(id);
    let record = args.clone().into_registration()?;
    api.update(&id, &record)
        .with_context(|| format!("Error {}", Operation::Update))?;
    log::info!("Updated registration {}", id);
    cmd_list(api, None)
}

fn cmd_delete(api: &dyn RegistrationApi, id: &str, yes: bool) -> Result<()> {
    if !yes && !confirm("Are you sure you want to delete this registration?")? {
        println!("Kept registration {}", id);
        return Ok(());
    }

    let id = RegistrationId::from(id);
    api.delete(&id)
        .with_context(|| format!("Error {}", Operation::Delete))?;
    log::info!("Deleted registration {}", id);
    cmd_list(api, None)
}

/// Ask a yes/no question on stdin, defaulting to no
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read answer from stdin")?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

/// Truncate or pad to an exact display width
fn pad(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&" ".repeat(width.saturating_sub(out.width())));
    out
}
