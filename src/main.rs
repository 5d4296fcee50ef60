//! Terminal front-end: pick a group, enter its password if it has one, and
//! watch who is busy. The board refreshes on a fixed interval.

use chrono::NaiveDateTime;
use clap::Parser;
use log::debug;
use roster_board::board::{render_board, render_group_list};
use roster_board::clock::{Clock, SystemClock};
use roster_board::config::Config;
use roster_board::{Dataset, Group, Resolution, Selection, Session, SessionError};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON data document, overrides `data_path`
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Open this group instead of asking
    #[arg(short, long, value_name = "ID")]
    group: Option<String>,

    /// Seconds between refreshes, overrides `refresh_interval_secs`
    #[arg(short, long, value_name = "SECS")]
    interval: Option<u64>,

    /// Print the board once and exit
    #[arg(long)]
    once: bool,

    /// trace|debug|info|warn|error, overrides `log_level`
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if let Some(interval) = cli.interval {
        config.refresh_interval_secs = interval;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.validate()?;

    init_logging(config.level_filter())?;
    debug!("{:?}", config);

    let dataset = Dataset::load(&config.data_path, config.overlap_policy)?;
    let clock = SystemClock;
    let mut session = Session::new(dataset, clock.now());
    let mut input = StdinLines::spawn();

    if !enter_group(&mut session, cli.group.as_deref(), &mut input)? {
        return Ok(());
    }
    refresh(&mut session, clock.now(), Session::manual_refresh);
    if cli.once {
        return Ok(());
    }

    loop {
        println!("[r] refresh  [g] change group  [q] quit");
        let line = match input.next_timeout(config.refresh_interval()) {
            Ok(line) => line?,
            Err(RecvTimeoutError::Timeout) => {
                refresh(&mut session, clock.now(), Session::tick);
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        };

        match Command::parse(&line) {
            Some(Command::Refresh) => refresh(&mut session, clock.now(), Session::manual_refresh),
            Some(Command::ChangeGroup) => {
                session.deselect();
                if !enter_group(&mut session, None, &mut input)? {
                    return Ok(());
                }
                refresh(&mut session, clock.now(), Session::manual_refresh);
            }
            Some(Command::Quit) => return Ok(()),
            None if line.trim().is_empty() => {}
            None => println!("Unknown command `{}`", line.trim()),
        }
    }
}

fn init_logging(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Command {
    Refresh,
    ChangeGroup,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Command> {
        match line.trim() {
            "r" => Some(Command::Refresh),
            "g" => Some(Command::ChangeGroup),
            "q" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Lines typed by the user, without the trailing newline. `None` at end of
/// input.
trait LineSource {
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

impl<R: BufRead> LineSource for R {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Stdin read on its own thread, so the main thread can wait for a command
/// and still refresh on time. Only the main thread touches the session.
struct StdinLines {
    rx: Receiver<io::Result<String>>,
}

impl StdinLines {
    fn spawn() -> StdinLines {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        StdinLines { rx }
    }

    fn next_timeout(&mut self, timeout: Duration) -> Result<io::Result<String>, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

impl LineSource for StdinLines {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        match self.rx.recv() {
            Ok(line) => line.map(Some),
            Err(_) => Ok(None),
        }
    }
}

/// Runs selection and the password prompt until a group is active.
/// Returns `false` when the user gives up.
fn enter_group(
    session: &mut Session,
    preselected: Option<&str>,
    input: &mut impl LineSource,
) -> Result<bool, Box<dyn Error>> {
    loop {
        let group_id = match preselected {
            Some(id) => id.to_string(),
            None => {
                print!("{}", render_group_list(&session.group_cards()));
                let choice = match prompt(input, "Group (number or id, empty to quit): ")? {
                    Some(choice) if !choice.is_empty() => choice,
                    _ => return Ok(false),
                };
                resolve_choice(session, &choice)
            }
        };

        let selection = match session.select_group(&group_id) {
            Ok(selection) => selection,
            Err(e @ SessionError::UnknownGroup { .. }) if preselected.is_none() => {
                println!("{}", e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if selection == Selection::Entered || ask_secret(session, input)? {
            return Ok(true);
        }
        if preselected.is_some() {
            return Ok(false);
        }
    }
}

/// Prompts until the password matches (`true`) or the user cancels (`false`).
fn ask_secret(session: &mut Session, input: &mut impl LineSource) -> Result<bool, Box<dyn Error>> {
    loop {
        let label = session
            .pending_group()
            .map(|g| g.name.clone())
            .unwrap_or_default();
        let candidate = match prompt(input, &format!("Password for {} (empty to cancel): ", label))? {
            Some(candidate) if !candidate.is_empty() => candidate,
            _ => {
                session.cancel_prompt();
                return Ok(false);
            }
        };

        match session.submit_secret(&candidate) {
            Ok(_) => return Ok(true),
            Err(SessionError::WrongSecret(_)) => println!("Wrong password, try again."),
            Err(e) => return Err(e.into()),
        }
    }
}

/// A group id, or else a 1-based position in the group list.
fn resolve_choice(session: &Session, choice: &str) -> String {
    if session.dataset().group(choice).is_some() {
        return choice.to_string();
    }
    choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| session.dataset().groups.get(i))
        .map(|g| g.id.clone())
        .unwrap_or_else(|| choice.to_string())
}

fn prompt(input: &mut impl LineSource, message: &str) -> io::Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;
    input.next_line()
}

/// Refreshes the session at `now` and prints the board from that single
/// resolution.
fn refresh(
    session: &mut Session,
    now: NaiveDateTime,
    step: for<'s> fn(&'s mut Session, NaiveDateTime) -> Option<Resolution<'s>>,
) {
    let group: Option<Group> = session.active_group().cloned();
    if let (Some(group), Some(resolution)) = (group, step(session, now)) {
        println!("\n{}", render_board(&group, &resolution, &now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_board::{Person, SessionState};
    use std::io::Cursor;

    fn session() -> Session {
        let dataset = Dataset::new(
            vec![
                Group::new("g1", "Open", ""),
                Group::new("g2", "Gated", "").with_secret("xyz"),
                Group::new("1", "Numbered", ""),
            ],
            vec![Person::new("1", "Alice", vec![]).in_groups(["g1", "g2"])],
        );
        let now = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        Session::new(dataset, now)
    }

    fn active(session: &Session) -> Option<&str> {
        session.active_group().map(|g| g.id.as_str())
    }

    #[test]
    fn commands() {
        assert_eq!(Command::parse("r"), Some(Command::Refresh));
        assert_eq!(Command::parse(" g \n"), Some(Command::ChangeGroup));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("x"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn choice_prefers_group_id_over_position() {
        let session = session();

        assert_eq!(resolve_choice(&session, "g2"), "g2");
        assert_eq!(resolve_choice(&session, "2"), "g2");
        assert_eq!(resolve_choice(&session, "1"), "1");
        assert_eq!(resolve_choice(&session, "3"), "1");
        assert_eq!(resolve_choice(&session, "0"), "0");
        assert_eq!(resolve_choice(&session, "9"), "9");
    }

    #[test]
    fn enters_open_group_by_position() {
        let mut session = session();
        let mut input = Cursor::new("3\n");

        assert!(enter_group(&mut session, None, &mut input).unwrap());
        assert_eq!(active(&session), Some("1"));
    }

    #[test]
    fn retries_password_until_it_matches() {
        let mut session = session();
        let mut input = Cursor::new("g2\nabc\nXYZ\nxyz\n");

        assert!(enter_group(&mut session, None, &mut input).unwrap());
        assert_eq!(active(&session), Some("g2"));
        assert!(input.next_line().unwrap().is_none());
    }

    #[test]
    fn cancelled_password_returns_to_list() {
        let mut session = session();
        let mut input = Cursor::new("2\n\ng1\n");

        assert!(enter_group(&mut session, None, &mut input).unwrap());
        assert_eq!(active(&session), Some("g1"));
        assert!(!session.access().is_unlocked(session.dataset().group("g2").unwrap()));
    }

    #[test]
    fn unknown_choice_asks_again() {
        let mut session = session();
        let mut input = Cursor::new("g9\n1\n");

        assert!(enter_group(&mut session, None, &mut input).unwrap());
        assert_eq!(active(&session), Some("1"));
    }

    #[test]
    fn empty_choice_or_end_of_input_gives_up() {
        let mut session = session();

        assert!(!enter_group(&mut session, None, &mut Cursor::new("\n")).unwrap());
        assert!(!enter_group(&mut session, None, &mut Cursor::new("")).unwrap());
        assert_eq!(session.state(), &SessionState::NoGroupSelected);
    }

    #[test]
    fn preselected_group() {
        let mut session = session();
        assert!(enter_group(&mut session, Some("g1"), &mut Cursor::new("")).unwrap());
        assert_eq!(active(&session), Some("g1"));

        let mut session = self::session();
        assert!(!enter_group(&mut session, Some("g2"), &mut Cursor::new("\n")).unwrap());
        assert_eq!(session.state(), &SessionState::NoGroupSelected);

        let mut session = self::session();
        assert!(enter_group(&mut session, Some("g9"), &mut Cursor::new("")).is_err());
    }

    #[test]
    fn ask_secret_stops_at_end_of_input() {
        let mut session = session();
        session.select_group("g2").unwrap();

        assert!(!ask_secret(&mut session, &mut Cursor::new("abc\n")).unwrap());
        assert_eq!(session.state(), &SessionState::NoGroupSelected);
    }

    #[test]
    fn change_group_after_refresh() {
        let mut session = session();
        let mut input = Cursor::new("g1\ng2\nxyz\n");

        assert!(enter_group(&mut session, None, &mut input).unwrap());
        let now = session.observed_time();
        refresh(&mut session, now, Session::manual_refresh);

        session.deselect();
        assert!(enter_group(&mut session, None, &mut input).unwrap());
        assert_eq!(active(&session), Some("g2"));
    }
}
