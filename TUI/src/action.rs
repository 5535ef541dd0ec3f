use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// User actions that can be triggered by key presses or paste events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Append a character to the search text
    Input(char),
    /// Append pasted text to the search text
    Paste(String),
    /// Delete the last character of the search text
    Backspace,
    /// Submit the search form in the current mode
    Submit,
    /// Flip between keyword and description mode
    ToggleMode,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    /// Clear the query, or quit when it is already empty
    Escape,
    /// Paste from the system clipboard
    ClipboardPaste,
    /// Quit application
    Quit,
}

impl Action {
    pub fn from_key(key: KeyEvent) -> Option<Action> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        let action = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char('v') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Action::ClipboardPaste
            }
            // Other Ctrl/Alt chords are shortcuts, not text
            KeyCode::Char(_)
                if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                return None
            }
            KeyCode::Char(c) => Action::Input(c),
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Enter => Action::Submit,
            KeyCode::Tab | KeyCode::BackTab => Action::ToggleMode,
            KeyCode::Up => Action::ScrollUp,
            KeyCode::Down => Action::ScrollDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::Esc => Action::Escape,
            _ => return None,
        };
        Some(action)
    }

    /// Flatten pasted text onto a single input line.
    pub fn paste(text: &str) -> Action {
        let filtered: String = text
            .chars()
            .filter(|c| *c != '\r')
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        Action::Paste(filtered)
    }
}
