//! Compose box and its keyboard contract.
//!
//! Enter submits; Shift+Enter inserts a literal line break instead.

use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeKey {
    Enter { shift: bool },
    Char(char),
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Run the submission flow
    Submit,
    /// The draft text changed (or a no-op edit)
    Edited,
}

/// Message input holding the unsent draft
#[derive(Debug, Default)]
pub struct ComposeBox {
    text: Mutex<String>,
}

impl ComposeBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.lock().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.lock() = text.into();
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn handle_key(&self, key: ComposeKey) -> KeyAction {
        match key {
            ComposeKey::Enter { shift: false } => KeyAction::Submit,
            ComposeKey::Enter { shift: true } => {
                self.lock().push('\n');
                KeyAction::Edited
            }
            ComposeKey::Char(c) => {
                self.lock().push(c);
                KeyAction::Edited
            }
            ComposeKey::Backspace => {
                self.lock().pop();
                KeyAction::Edited
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.text.lock().unwrap_or_else(|e| e.into_inner())
    }
}
