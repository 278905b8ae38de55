use anyhow::{Context, Result};
use oddsboard_client::logging::init_stderr;
use oddsboard_client::{calculate_now, HttpEngine, ProbabilityEngine};
use oddsboard_core::{Card, PickOutcome, Rank, Selection, SlotGroup, SlotRef, Suit};
use oddsboard_cui::LaunchOptions;
use std::io::{self, BufRead, Write};
use tracing::{info, Level};

#[derive(Debug, Clone, Default)]
struct CliOptions {
    cui: bool,
    json: bool,
    launch: LaunchOptions,
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions> {
    let mut options = CliOptions {
        launch: oddsboard_cui::parse_options(args)?,
        ..CliOptions::default()
    };
    for arg in args {
        match arg.as_str() {
            "--cui" => options.cui = true,
            "--json" => options.json = true,
            _ => {}
        }
    }
    Ok(options)
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_cli_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("argument error: {err:#}");
            std::process::exit(2);
        }
    };
    if options.cui {
        if let Err(err) = oddsboard_cui::run(options.launch) {
            eprintln!("cui launch error: {err:#}");
            std::process::exit(1);
        }
        return;
    }
    init_stderr(Level::INFO);
    if let Err(err) = run_repl(&options) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run_repl(options: &CliOptions) -> Result<()> {
    let config = options.launch.resolve_config()?;
    let engine = HttpEngine::new(&config).context("build http engine")?;
    info!(endpoint = %config.endpoint, opponents = config.num_opponents, "repl ready");

    let mut session = Session::new(engine, config.num_opponents);
    session.json = options.json;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_help(&mut out)?;
    session.print_board(&mut out)?;
    write!(out, "> ")?;
    out.flush()?;
    for line in stdin.lock().lines() {
        let line = line.context("read command")?;
        let flow = match parse_command(&line) {
            Ok(Some(command)) => session.execute(command, &mut out)?,
            Ok(None) => Flow::Continue,
            Err(err) => {
                writeln!(out, "{err}")?;
                Flow::Continue
            }
        };
        if flow == Flow::Quit {
            break;
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Help,
    Quit,
    Show,
    Grid,
    Json,
    Edit(SlotRef),
    Cancel,
    Pick(Card),
    Set(SlotRef, Card),
    Calculate,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Parses one REPL line. Blank lines yield `Ok(None)`.
fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = parts.collect();
    let command = match cmd.to_ascii_lowercase().as_str() {
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "show" | "board" | "s" => Command::Show,
        "grid" | "cards" | "g" => Command::Grid,
        "json" => Command::Json,
        "edit" | "e" => Command::Edit(parse_slot(&args)?),
        "cancel" => Command::Cancel,
        "pick" | "p" => {
            let text = args.first().ok_or("usage: pick <card>")?;
            Command::Pick(parse_card(text)?)
        }
        "set" => {
            let slot = parse_slot(&args)?;
            let text = args.get(2).ok_or("usage: set <hand|table> <index> <card>")?;
            Command::Set(slot, parse_card(text)?)
        }
        "calc" | "calculate" | "c" => Command::Calculate,
        "reset" | "r" => Command::Reset,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

fn parse_slot(args: &[&str]) -> Result<SlotRef, String> {
    let group = args.first().ok_or("missing slot group (hand or table)")?;
    let group =
        SlotGroup::from_label(group).ok_or_else(|| format!("unknown slot group '{group}'"))?;
    let index = args
        .get(1)
        .ok_or("missing slot index")?
        .parse::<usize>()
        .map_err(|_| "invalid slot index".to_string())?;
    Ok(SlotRef { group, index })
}

fn parse_card(text: &str) -> Result<Card, String> {
    text.parse::<Card>()
        .map_err(|err| format!("invalid card '{text}': {err}"))
}

struct Session<E> {
    selection: Selection,
    engine: E,
    num_opponents: u32,
    json: bool,
}

impl<E: ProbabilityEngine> Session<E> {
    fn new(engine: E, num_opponents: u32) -> Self {
        Self {
            selection: Selection::new(),
            engine,
            num_opponents,
            json: false,
        }
    }

    fn execute(&mut self, command: Command, out: &mut impl Write) -> io::Result<Flow> {
        match command {
            Command::Help => print_help(out)?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Show => self.print_board(out)?,
            Command::Grid => self.print_grid(out)?,
            Command::Json => self.print_json(out)?,
            Command::Edit(slot) => match self.selection.begin_edit(slot) {
                Ok(()) => writeln!(out, "editing {slot}; pick a card")?,
                Err(err) => writeln!(out, "{err}")?,
            },
            Command::Cancel => {
                self.selection.cancel_edit();
                writeln!(out, "edit cancelled")?;
            }
            Command::Pick(card) => {
                self.pick(card, out)?;
            }
            Command::Set(slot, card) => match self.selection.begin_edit(slot) {
                Ok(()) => {
                    if !self.pick(card, out)? {
                        self.selection.cancel_edit();
                    }
                }
                Err(err) => writeln!(out, "{err}")?,
            },
            Command::Calculate => {
                if !self.selection.hand_complete() {
                    writeln!(out, "pick both hand cards first")?;
                } else {
                    calculate_now(&mut self.selection, &self.engine, self.num_opponents);
                    self.print_result(out)?;
                }
            }
            Command::Reset => {
                self.selection.reset();
                writeln!(out, "board reset")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn pick(&mut self, card: Card, out: &mut impl Write) -> io::Result<bool> {
        match self.selection.pick(card) {
            PickOutcome::Placed { slot, replaced } => {
                match replaced {
                    Some(old) => writeln!(out, "{slot}: {old} -> {card}")?,
                    None => writeln!(out, "{slot}: {card}")?,
                }
                if self.json {
                    self.print_json(out)?;
                }
                Ok(true)
            }
            PickOutcome::IgnoredDuplicate => {
                writeln!(out, "{card} is already on the board")?;
                Ok(false)
            }
            PickOutcome::IgnoredNoCursor => {
                writeln!(out, "choose a slot first (edit <hand|table> <index>)")?;
                Ok(false)
            }
        }
    }

    fn print_board(&self, out: &mut impl Write) -> io::Result<()> {
        let row = |cards: &[Option<Card>]| -> String {
            cards
                .iter()
                .map(|card| match card {
                    Some(card) => format!("{card:>3}"),
                    None => " --".to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ")
        };
        writeln!(out, "hand :{}", row(self.selection.hand()))?;
        writeln!(out, "table:{}", row(self.selection.table()))?;
        if let Some(slot) = self.selection.cursor() {
            writeln!(out, "editing {slot}")?;
        }
        self.print_result(out)
    }

    fn print_grid(&self, out: &mut impl Write) -> io::Result<()> {
        for suit in Suit::ALL {
            let cells: Vec<String> = Rank::ALL
                .iter()
                .map(|rank| {
                    let card = Card::new(*rank, suit);
                    if self.selection.is_selectable(card) {
                        format!("{:>3}", card.to_string())
                    } else {
                        "  x".to_string()
                    }
                })
                .collect();
            writeln!(out, "{:<9}{}", suit.name(), cells.join(" "))?;
        }
        Ok(())
    }

    fn print_json(&self, out: &mut impl Write) -> io::Result<()> {
        let body = serde_json::to_string_pretty(&self.selection.view()).map_err(io::Error::other)?;
        writeln!(out, "{body}")
    }

    fn print_result(&self, out: &mut impl Write) -> io::Result<()> {
        let label = self.selection.result();
        let stale = if self.selection.result_is_stale() {
            " (stale)"
        } else {
            ""
        };
        writeln!(out, "Winning Probability: {label}{stale}")
    }
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "commands:")?;
    writeln!(out, "  edit <hand|table> <index>      target a slot (indices start at 0)")?;
    writeln!(out, "  pick <card>                    place a card, e.g. Ah, 10d, Ts")?;
    writeln!(out, "  set <hand|table> <index> <card>")?;
    writeln!(out, "  cancel | show | grid | json")?;
    writeln!(out, "  calc                           ask the engine (needs both hand cards)")?;
    writeln!(out, "  reset | help | quit")
}

#[cfg(test)]
mod tests {
    use super::*;
    use oddsboard_client::EngineError;
    use oddsboard_core::ProbabilityRequest;
    use std::cell::RefCell;

    fn card(text: &str) -> Card {
        text.parse().expect("card")
    }

    fn run_lines<E: ProbabilityEngine>(session: &mut Session<E>, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            match parse_command(line) {
                Ok(Some(command)) => {
                    session.execute(command, &mut out).expect("write");
                }
                Ok(None) => {}
                Err(err) => out.extend_from_slice(format!("{err}\n").as_bytes()),
            }
        }
        String::from_utf8(out).expect("utf8")
    }

    fn fixed(value: f64) -> impl Fn(&ProbabilityRequest) -> Result<f64, EngineError> {
        move |_| Ok(value)
    }

    #[test]
    fn parses_slot_commands() {
        assert_eq!(
            parse_command("edit hand 1"),
            Ok(Some(Command::Edit(SlotRef::hand(1))))
        );
        assert_eq!(
            parse_command("  set table 4 10h "),
            Ok(Some(Command::Set(SlotRef::table(4), card("10h"))))
        );
        assert_eq!(parse_command("PICK ts"), Ok(Some(Command::Pick(card("Ts")))));
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("calc"), Ok(Some(Command::Calculate)));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_command("pick").is_err());
        assert!(parse_command("pick 1x").is_err());
        assert!(parse_command("edit river 0").is_err());
        assert!(parse_command("edit hand two").is_err());
        assert!(parse_command("fold").is_err());
    }

    #[test]
    fn edit_then_pick_fills_slot() {
        let mut session = Session::new(fixed(0.5), 2);
        let output = run_lines(&mut session, &["edit hand 0", "pick Ah"]);
        assert!(output.contains("hand 0: Ah"));
        assert_eq!(session.selection.hand()[0], Some(card("Ah")));
        assert_eq!(session.selection.cursor(), None);
    }

    #[test]
    fn out_of_range_slot_is_reported() {
        let mut session = Session::new(fixed(0.5), 2);
        let output = run_lines(&mut session, &["edit hand 2"]);
        assert!(output.contains("out of range"));
        assert_eq!(session.selection.cursor(), None);
    }

    #[test]
    fn duplicate_set_leaves_board_and_cursor_clear() {
        let mut session = Session::new(fixed(0.5), 2);
        let output = run_lines(&mut session, &["set hand 0 Ah", "set table 2 Ah"]);
        assert!(output.contains("Ah is already on the board"));
        assert_eq!(session.selection.table()[2], None);
        assert_eq!(session.selection.cursor(), None);
    }

    #[test]
    fn calculate_requires_full_hand() {
        let calls = RefCell::new(0);
        let engine = |_: &ProbabilityRequest| -> Result<f64, EngineError> {
            *calls.borrow_mut() += 1;
            Ok(0.5)
        };
        let mut session = Session::new(engine, 2);
        let output = run_lines(&mut session, &["set hand 0 Ah", "calc"]);
        assert!(output.contains("pick both hand cards first"));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn calculate_prints_two_decimals_and_goes_stale() {
        let mut session = Session::new(fixed(0.4567), 2);
        let output = run_lines(
            &mut session,
            &["set hand 0 Ah", "set hand 1 Kd", "calc", "set table 0 2c", "show"],
        );
        assert!(output.contains("Winning Probability: 0.46\n"));
        assert!(output.contains("Winning Probability: 0.46 (stale)"));
    }

    #[test]
    fn engine_failure_prints_error() {
        let engine = |_: &ProbabilityRequest| -> Result<f64, EngineError> {
            Err(EngineError::Transport("connection refused".to_string()))
        };
        let mut session = Session::new(engine, 2);
        let output = run_lines(&mut session, &["set hand 0 Ah", "set hand 1 Kd", "calc"]);
        assert!(output.contains("Winning Probability: Error"));
    }

    #[test]
    fn grid_marks_used_cards() {
        let mut session = Session::new(fixed(0.5), 2);
        let output = run_lines(&mut session, &["set hand 0 Ah", "grid"]);
        let hearts = output
            .lines()
            .find(|line| line.starts_with("Hearts"))
            .expect("hearts row");
        assert!(hearts.ends_with("  x"));
        assert!(hearts.contains(" Kh"));
    }

    #[test]
    fn reset_and_quit() {
        let mut session = Session::new(fixed(0.5), 2);
        run_lines(&mut session, &["set hand 0 Ah", "reset"]);
        assert_eq!(session.selection.filled_count(), 0);
        let mut out = Vec::new();
        assert_eq!(
            session.execute(Command::Quit, &mut out).expect("write"),
            Flow::Quit
        );
    }

    #[test]
    fn cli_flags_combine_with_launch_options() {
        let args: Vec<String> = ["--cui", "--opponents", "4"]
            .iter()
            .map(|value| value.to_string())
            .collect();
        let options = parse_cli_options(&args).expect("options");
        assert!(options.cui);
        assert_eq!(options.launch.opponents, Some(4));
    }
}
