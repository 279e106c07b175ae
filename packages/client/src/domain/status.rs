//! Submission status shown next to the compose box.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Posting,
    Posted,
    Failed,
}

impl SubmissionStatus {
    pub fn message(self) -> &'static str {
        match self {
            SubmissionStatus::Posting => "Posting...",
            SubmissionStatus::Posted => "Posted.",
            SubmissionStatus::Failed => "Post failed. Try again.",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
