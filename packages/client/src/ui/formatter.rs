//! Output formatting for the terminal client.

use crate::domain::{SubmissionStatus, Theme};

const RULE_WIDTH: usize = 60;

/// Formatter for terminal output
pub struct ViewFormatter;

impl ViewFormatter {
    /// Format the visible part of the feed
    ///
    /// # Arguments
    ///
    /// * `lines` - The lines inside the viewport
    /// * `first_line` - Zero-based index of the first visible line
    /// * `total_lines` - Number of lines in the whole snapshot
    pub fn format_viewport(lines: &[String], first_line: usize, total_lines: usize) -> String {
        let header = if total_lines == 0 {
            " feed (empty) ".to_string()
        } else {
            format!(
                " feed {}-{} of {} ",
                first_line + 1,
                first_line + lines.len(),
                total_lines
            )
        };

        let mut output = String::new();
        output.push_str(&format!("\n{:=^width$}\n", header, width = RULE_WIDTH));
        for line in lines {
            output.push_str(line);
            output.push('\n');
        }
        output.push_str(&"=".repeat(RULE_WIDTH));
        output.push('\n');
        output
    }

    pub fn format_status(status: SubmissionStatus) -> String {
        format!("[status] {}\n", status)
    }

    pub fn format_theme(theme: Theme) -> String {
        format!("[theme] {} (/theme: {})\n", theme, theme.toggle_label())
    }

    pub fn help() -> &'static str {
        "\nCommands:\n  /theme         toggle day/night mode\n  /nick <name>   set your nickname\n  /up [n]        scroll up n lines\n  /down [n]      scroll down n lines\n  /bottom        jump to the newest messages\n  /refresh       fetch the feed now\n  /quit          exit\nAnything else is posted. Shift+Enter or Alt+Enter inserts a line break.\n"
    }
}
