//! Logging for the binaries. Everything goes to stderr so stdout carries only
//! the menu or the benchmark's own report.
//!
//! Records carrying an `action` key print that action in the left column
//! instead of their level:
//!
//! ```
//! log::info!(action = "Saved"; "document 7");
//! ```

use std::io::Write;

use anstyle::{AnsiColor, Color, Style};
use env_logger::Target;
use log::{Level, Record};

/// Width of the left-hand level/action column.
const COLUMN: usize = 8;

/// What the program's stdout is being used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// A menu the user is typing into. Routine messages are dimmed so the
    /// prompts and answers stand out; warnings and errors are not.
    Interactive,
    /// Nothing the user reads line by line. Messages print at full strength.
    Batch,
}

/// Installs the global logger. `RUST_LOG` is read first, then overridden by
/// the level that `verbosity` (the number of `-v` flags) maps to. A second
/// call keeps the first logger.
pub fn init(verbosity: u8, mode: Mode) {
    let level = verbosity_level(verbosity);

    env_logger::Builder::from_default_env()
        .target(Target::Stderr)
        .format_indent(Some(COLUMN + 1))
        .filter(None, level.to_level_filter())
        .format(move |f, record| {
            let label = label_style(record);
            match record.key_values().get("action".into()) {
                Some(action) => write!(f, "{label}{action:>width$}{label:#} ", width = COLUMN)?,
                None => write!(
                    f,
                    "{label}{:>width$}{label:#} ",
                    prettyprint_level(record.level()),
                    width = COLUMN
                )?,
            }

            // Module paths only help when chasing something down.
            if level >= Level::Debug {
                let dim = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack)));
                write!(f, "{dim}[{}]{dim:#} ", record.target())?;
            }

            let body = body_style(mode, record.level());
            writeln!(f, "{body}{}{body:#}", record.args())
        })
        .try_init()
        .ok();
}

fn label_style(record: &Record<'_>) -> Style {
    let color = match record.level() {
        Level::Error => AnsiColor::Red,
        Level::Warn => AnsiColor::Yellow,
        _ if record.key_values().get("action".into()).is_some() => AnsiColor::Green,
        Level::Info => AnsiColor::Cyan,
        Level::Debug | Level::Trace => AnsiColor::BrightBlack,
    };
    Style::new().bold().fg_color(Some(Color::Ansi(color)))
}

fn body_style(mode: Mode, level: Level) -> Style {
    match mode {
        Mode::Interactive if level >= Level::Info => Style::new().dimmed(),
        _ => Style::new(),
    }
}

/// Maps the number of `-v` flags to a level.
fn verbosity_level(num: u8) -> Level {
    match num {
        0 => Level::Info,
        1 => Level::Debug,
        2.. => Level::Trace,
    }
}

/// `Level`'s own `Display` is upper case, which clashes with the actions.
fn prettyprint_level(lvl: Level) -> &'static str {
    match lvl {
        Level::Error => "Error",
        Level::Warn => "Warn",
        Level::Info => "Info",
        Level::Debug => "Debug",
        Level::Trace => "Trace",
    }
}
