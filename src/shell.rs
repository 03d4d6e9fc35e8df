//! Line commands for the interactive shell.
//!
//! Parsing is kept free of I/O so it can be tested; the binary performs the
//! file reads and writes each command asks for.

use std::path::PathBuf;

use crate::model::Rectangle;
use crate::session::Action;

/// Commands accepted at the prompt, with their one-line help.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/upload", "/upload <path>          load a PNG or JPEG image"),
    ("/select", "/select [x1 y1 x2 y2]   select a region (default: center)"),
    ("/zoom", "/zoom in|out|reset      change the display zoom"),
    ("/clear", "/clear                  clear the chat"),
    ("/selections", "/selections             list previous selections"),
    ("/save", "/save <path>            write the displayed image"),
    ("/chart", "/chart <path>           render the chart to a PNG"),
    ("/export", "/export <path>          write a JSON session summary"),
    ("/help", "/help                   show this help"),
    ("/quit", "/quit                   leave"),
];

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Upload(PathBuf),
    Select(Rectangle),
    /// `/select` without coordinates
    SelectDefault,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    Clear,
    Selections,
    Save(PathBuf),
    Chart(PathBuf),
    Export(PathBuf),
    Help,
    Quit,
    /// Anything that is not a command
    Ask(String),
}

/// Problems parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShellError {
    #[error("Unknown command '{0}'. Type /help for a list.")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

impl ShellCommand {
    /// Parse a trimmed input line.
    pub fn parse(line: &str) -> Result<Self, ShellError> {
        let line = line.trim();
        if !line.starts_with('/') {
            return Ok(ShellCommand::Ask(line.to_string()));
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "/upload" => path_arg(rest, usage("/upload")).map(ShellCommand::Upload),
            "/select" if rest.is_empty() => Ok(ShellCommand::SelectDefault),
            "/select" => parse_rect(rest).map(ShellCommand::Select),
            "/zoom" => match rest {
                "in" | "+" => Ok(ShellCommand::ZoomIn),
                "out" | "-" => Ok(ShellCommand::ZoomOut),
                "reset" | "" => Ok(ShellCommand::ZoomReset),
                _ => Err(ShellError::Usage(usage("/zoom"))),
            },
            "/clear" => Ok(ShellCommand::Clear),
            "/selections" => Ok(ShellCommand::Selections),
            "/save" => path_arg(rest, usage("/save")).map(ShellCommand::Save),
            "/chart" => path_arg(rest, usage("/chart")).map(ShellCommand::Chart),
            "/export" => path_arg(rest, usage("/export")).map(ShellCommand::Export),
            "/help" | "/?" => Ok(ShellCommand::Help),
            "/quit" | "/exit" => Ok(ShellCommand::Quit),
            other => Err(ShellError::UnknownCommand(other.to_string())),
        }
    }

    /// The session action this command maps to directly, if any.
    ///
    /// `/upload` is not included; the file has to be read first.
    pub fn action(&self) -> Option<Action> {
        match self {
            ShellCommand::Select(rect) => Some(Action::CreateSelection(*rect)),
            ShellCommand::SelectDefault => Some(Action::SelectDefault),
            ShellCommand::ZoomIn => Some(Action::ZoomIn),
            ShellCommand::ZoomOut => Some(Action::ZoomOut),
            ShellCommand::ZoomReset => Some(Action::ZoomReset),
            ShellCommand::Clear => Some(Action::ClearChat),
            ShellCommand::Ask(question) => Some(Action::Ask(question.clone())),
            _ => None,
        }
    }
}

/// Selection history rendered as "Selection N: (x1,y1) to (x2,y2)" lines.
pub fn selection_lines(history: &[Rectangle]) -> Vec<String> {
    history
        .iter()
        .enumerate()
        .map(|(i, rect)| format!("Selection {}: {}", i + 1, rect))
        .collect()
}

fn usage(command: &str) -> &'static str {
    COMMANDS
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, help)| *help)
        .unwrap_or("/help")
}

fn path_arg(rest: &str, usage: &'static str) -> Result<PathBuf, ShellError> {
    if rest.is_empty() {
        Err(ShellError::Usage(usage))
    } else {
        Ok(PathBuf::from(rest))
    }
}

fn parse_rect(rest: &str) -> Result<Rectangle, ShellError> {
    let coords: Vec<u32> = rest
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| ShellError::Usage(usage("/select")))?;

    match coords.as_slice() {
        &[x1, y1, x2, y2] => Ok(Rectangle::new(x1, y1, x2, y2)),
        _ => Err(ShellError::Usage(usage("/select"))),
    }
}
