use anyhow::{Context, Result};
use calcugenius::ai::{ExplanationPanel, FAILURE_MESSAGE, GeminiClient};
use calcugenius::calculator::{copy_to_clipboard, evaluate_expression, parse_keys};
use calcugenius::items::{CalculationEntry, RecallItem, SavedCalculation};
use calcugenius::storage::{FileStore, JsonRepository, history_repository, saved_repository};
use calcugenius::ui::{render_calculator, render_explanation, render_list, render_notice};
use calcugenius::{Calculator, Config, Session, logging};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

type FileSession = Session<
    JsonRepository<FileStore, CalculationEntry>,
    JsonRepository<FileStore, SavedCalculation>,
>;

/// Keypad calculator with history, saved calculations and an AI explainer
#[derive(Parser)]
#[command(name = "calcugenius", version, about)]
struct Cli {
    /// Path to a custom config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for history and saved calculations (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Press keys on the keypad, e.g. `press 5 + 3 =` or `press 9 sqrt`
    Press {
        #[arg(value_name = "KEY", required = true, allow_hyphen_values = true, trailing_var_arg = true)]
        keys: Vec<String>,

        /// Copy the final display value to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Read key presses line by line from stdin
    Repl,

    /// Evaluate a flat expression left to right, e.g. `eval "2+3×4"`
    Eval {
        #[arg(value_name = "TEXT", required = true, allow_hyphen_values = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Show or edit the calculation history
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },

    /// Save the most recent calculation under a name
    Save {
        #[arg(value_name = "NAME", required = true, trailing_var_arg = true)]
        name: Vec<String>,
    },

    /// Show or edit saved calculations
    Saved {
        #[command(subcommand)]
        action: Option<SavedAction>,
    },

    /// Load a history entry or saved calculation onto the display
    Recall { id: String },

    /// Ask the AI model to explain equations step by step
    Explain {
        #[arg(value_name = "EQUATION", required = true)]
        equations: Vec<String>,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    List,
    Clear,
    Delete { id: String },
}

#[derive(Subcommand)]
enum SavedAction {
    List,
    Delete { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }
    logging::init(&config.logging);

    match cli.command {
        Commands::Press { keys, copy } => press(&config, &keys.join(" "), copy),
        Commands::Repl => repl(&config),
        Commands::Eval { text } => {
            let result = evaluate_expression(&text.join(" "));
            println!("{}", result.display());
            Ok(())
        }
        Commands::History { action } => history(&config, action.unwrap_or(HistoryAction::List)),
        Commands::Save { name } => {
            let mut session = open_session(&config);
            let notice = session.save_last(&name.join(" "))?;
            println!("{}", render_notice(&notice));
            Ok(())
        }
        Commands::Saved { action } => saved(&config, action.unwrap_or(SavedAction::List)),
        Commands::Recall { id } => {
            let mut session = open_session(&config);
            let outcome = session.recall(&id)?;
            if let Some(notice) = outcome.notice {
                eprintln!("{}", render_notice(&notice));
            }
            println!("{}", render_calculator(session.calculator()));
            Ok(())
        }
        Commands::Explain { equations } => explain(&config, &equations),
    }
}

fn open_session(config: &Config) -> FileSession {
    let store = FileStore::new(config.storage.resolved_data_dir());
    tracing::debug!(dir = %store.dir().display(), "using data directory");
    Session::open(
        Calculator::with_max_display_length(config.calculator.max_display_length),
        history_repository(store.clone(), config.storage.history_capacity),
        saved_repository(store, config.storage.saved_capacity),
    )
}

/// Run typed keys through the session, printing notices to stderr.
fn run_keys(session: &mut FileSession, input: &str) -> Result<()> {
    let keys = parse_keys(input)?;
    for outcome in session.press_all(keys) {
        if let Some(notice) = outcome.notice {
            eprintln!("{}", render_notice(&notice));
        }
    }
    Ok(())
}

fn press(config: &Config, input: &str, copy: bool) -> Result<()> {
    let mut session = open_session(config);
    run_keys(&mut session, input)?;
    println!("{}", render_calculator(session.calculator()));

    if copy || config.calculator.copy_results {
        let value = session.calculator().display_value();
        if let Err(e) = copy_to_clipboard(value) {
            tracing::warn!("{:#}", e);
        }
    }
    Ok(())
}

fn repl(config: &Config) -> Result<()> {
    let mut session = open_session(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", render_calculator(session.calculator()));
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let line = line.trim();

        match line {
            "" => continue,
            ":q" | ":quit" => break,
            ":history" => {
                let items: Vec<_> = session.history().iter().cloned().map(RecallItem::from).collect();
                println!("{}", render_list("History", &items));
                continue;
            }
            ":saved" => {
                let items: Vec<_> = session.saved().iter().cloned().map(RecallItem::from).collect();
                println!("{}", render_list("Saved", &items));
                continue;
            }
            _ => {}
        }

        if let Some(name) = line.strip_prefix(":save ") {
            match session.save_last(name) {
                Ok(notice) => println!("{}", render_notice(&notice)),
                Err(e) => eprintln!("[!] {}", e),
            }
        } else if let Some(id) = line.strip_prefix(":recall ") {
            match session.recall(id.trim()) {
                Ok(_) => println!("{}", render_calculator(session.calculator())),
                Err(e) => eprintln!("[!] {}", e),
            }
        } else if let Err(e) = run_keys(&mut session, line) {
            eprintln!("[!] {:#}", e);
        } else {
            println!("{}", render_calculator(session.calculator()));
        }
        stdout.flush()?;
    }
    Ok(())
}

fn history(config: &Config, action: HistoryAction) -> Result<()> {
    let mut session = open_session(config);
    match action {
        HistoryAction::List => {
            let items: Vec<_> = session.history().iter().cloned().map(RecallItem::from).collect();
            println!("{}", render_list("History", &items));
        }
        HistoryAction::Clear => println!("{}", render_notice(&session.clear_history()?)),
        HistoryAction::Delete { id } => println!("{}", render_notice(&session.delete_history(&id)?)),
    }
    Ok(())
}

fn saved(config: &Config, action: SavedAction) -> Result<()> {
    let mut session = open_session(config);
    match action {
        SavedAction::List => {
            let items: Vec<_> = session.saved().iter().cloned().map(RecallItem::from).collect();
            println!("{}", render_list("Saved", &items));
        }
        SavedAction::Delete { id } => println!("{}", render_notice(&session.delete_saved(&id)?)),
    }
    Ok(())
}

fn explain(config: &Config, equations: &[String]) -> Result<()> {
    let client = GeminiClient::from_config(&config.ai)
        .with_context(|| format!("set ${} to use the explainer", config.ai.api_key_env))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let mut panel = ExplanationPanel::new();
    let outcomes = runtime.block_on(panel.submit_all(&client, equations));

    if outcomes.len() > 1 {
        for (equation, result) in &outcomes {
            match result {
                Ok(response) => println!("{}:\n{}\n", equation, response.explanation),
                Err(_) => println!("{}:\n[!] {}\n", equation, FAILURE_MESSAGE),
            }
        }
    } else {
        println!("{}", render_explanation(&panel));
    }
    Ok(())
}
