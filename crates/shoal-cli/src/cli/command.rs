//! Console command grammar.
//!
//! One command per line. Surrounding whitespace is ignored and blank lines
//! carry no command. `add`, `remove <id>` and `quit` are keywords; any other
//! line, verbatim after trimming, is a job payload.

use shoal::WorkerId;

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddWorker,
    RemoveWorker(WorkerId),
    Quit,
    Job(String),
}

/// A `remove` line that could not be turned into a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("usage: remove <worker id>")]
    RemoveUsage,
    #[error("invalid id or worker not found: {0}")]
    InvalidId(String),
}

/// Parses one line of input. Returns `Ok(None)` for a blank line.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };

    let command = match keyword {
        "add" => Command::AddWorker,
        "quit" => Command::Quit,
        "remove" => {
            let (Some(arg), None) = (words.next(), words.next()) else {
                return Err(ParseError::RemoveUsage);
            };
            let id = arg
                .parse()
                .map_err(|_| ParseError::InvalidId(arg.to_owned()))?;
            Command::RemoveWorker(id)
        }
        _ => Command::Job(line.to_owned()),
    };
    Ok(Some(command))
}
