//! Input line commands.

const DEFAULT_SCROLL_LINES: i64 = 5;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit the text as a message (including unrecognized `/words`)
    Message(String),
    Theme,
    Nick(String),
    Up(i64),
    Down(i64),
    Bottom,
    Refresh,
    Help,
    Quit,
    /// Blank line
    Ignored,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Ignored;
        }
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Message(trimmed.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        let lines = || arg.parse::<i64>().unwrap_or(DEFAULT_SCROLL_LINES).max(0);

        match name {
            "theme" => Command::Theme,
            "nick" => Command::Nick(arg.to_string()),
            "up" => Command::Up(lines()),
            "down" => Command::Down(lines()),
            "bottom" => Command::Bottom,
            "refresh" => Command::Refresh,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Message(trimmed.to_string()),
        }
    }
}
