mod actions;
mod app;
mod input;
mod view;

use anyhow::{Context, Result};
use app::App;
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use oddsboard_client::logging::{init_file, log_file_from_env};
use oddsboard_client::{ConfigFlags, Dispatcher, EngineConfig, HttpEngine};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};

const TICK_RATE: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub config_path: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub opponents: Option<u32>,
}

impl LaunchOptions {
    /// Config file and environment first, then explicit options on top.
    pub fn resolve_config(&self) -> Result<EngineConfig> {
        let flags = ConfigFlags {
            endpoint: self.endpoint.clone(),
            opponents: self.opponents,
        };
        EngineConfig::resolve(self.config_path.as_deref(), &flags).context("load engine config")
    }
}

pub fn run(options: LaunchOptions) -> Result<()> {
    let config = options.resolve_config()?;
    // The terminal belongs to the UI; logs only go to a file when asked for.
    let _log_guard = match log_file_from_env() {
        Some(path) => Some(
            init_file(&path, Level::INFO)
                .with_context(|| format!("open log file {}", path.display()))?,
        ),
        None => None,
    };
    info!(endpoint = %config.endpoint, opponents = config.num_opponents, "starting terminal ui");

    let engine = HttpEngine::new(&config).context("build http engine")?;
    let mut app = App::new(config, Dispatcher::spawn(engine));

    ensure_interactive_terminal()?;

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let options = parse_options(args)?;
    run(options)
}

pub fn parse_options(args: &[String]) -> Result<LaunchOptions> {
    let mut options = LaunchOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--config" | "-c" => {
                if let Some(value) = args.get(idx + 1) {
                    options.config_path = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--endpoint" => {
                if let Some(value) = args.get(idx + 1) {
                    options.endpoint = Some(value.clone());
                    idx += 1;
                }
            }
            "--opponents" => {
                if let Some(value) = args.get(idx + 1) {
                    let opponents = value
                        .parse::<u32>()
                        .with_context(|| format!("invalid opponent count '{value}'"))?;
                    options.opponents = Some(opponents);
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    Ok(options)
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        // Poll with a timeout so finished engine requests show up without a key press.
        if event::poll(TICK_RATE)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = input::map_key(key);
                actions::dispatch(app, action);
            }
        }
        app.on_tick();
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("the odds board needs an interactive terminal; use the REPL for piped input");
    }
    Ok(())
}
