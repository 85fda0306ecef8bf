//! Keyboard handling and key bindings.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashMap;
use std::io;
use std::time::Duration;

/// Intent decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Quit the application
    Quit,
    /// Toggle the help overlay
    Help,
    /// Move down
    Down,
    /// Move up
    Up,
    /// Focus the next form field
    NextField,
    /// Focus the previous form field
    PrevField,
    /// Select a tool, start editing, or commit an edit
    Select,
    /// Run the selected tool
    Submit,
    /// Flip a toggle or cycle a choice
    Toggle,
    /// Leave the current view or cancel an edit
    Back,
    /// Hide or show the body
    Minimize,
    /// Accept a confirmation prompt
    Accept,
    /// Decline a confirmation prompt
    Decline,
    /// Typed character while editing
    Char(char),
    /// Delete the last typed character
    Backspace,
    /// Unbound key
    Unknown,
}

/// How keys are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Keys are commands
    #[default]
    Navigate,
    /// Keys are text for a field or a prompt
    Edit,
    /// A yes/no prompt is open
    Confirm,
}

/// Key combination (key + modifiers)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    /// The key code
    pub code: KeyCode,
    /// Modifiers (ctrl, alt, shift)
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    /// Create a new key combination
    #[must_use]
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a plain key without modifiers
    #[must_use]
    pub fn key(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::empty(),
        }
    }

    /// Create a Ctrl+key combination
    #[must_use]
    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }
}

/// Navigation-mode key bindings
#[derive(Debug, Clone)]
pub struct KeyBinding {
    bindings: HashMap<KeyCombo, InputEvent>,
}

impl KeyBinding {
    /// Bind `combo` to `event`, replacing any existing binding
    pub fn bind(&mut self, combo: KeyCombo, event: InputEvent) {
        self.bindings.insert(combo, event);
    }

    /// Event bound to `combo`
    #[must_use]
    pub fn get(&self, combo: &KeyCombo) -> Option<InputEvent> {
        self.bindings.get(combo).copied()
    }
}

impl Default for KeyBinding {
    fn default() -> Self {
        let mut bindings = HashMap::new();

        // Navigation
        bindings.insert(KeyCombo::key(KeyCode::Down), InputEvent::Down);
        bindings.insert(KeyCombo::key(KeyCode::Char('j')), InputEvent::Down);
        bindings.insert(KeyCombo::key(KeyCode::Up), InputEvent::Up);
        bindings.insert(KeyCombo::key(KeyCode::Char('k')), InputEvent::Up);
        bindings.insert(KeyCombo::key(KeyCode::Tab), InputEvent::NextField);
        bindings.insert(KeyCombo::new(KeyCode::BackTab, KeyModifiers::SHIFT), InputEvent::PrevField);
        bindings.insert(KeyCombo::key(KeyCode::BackTab), InputEvent::PrevField);

        // Actions
        bindings.insert(KeyCombo::key(KeyCode::Enter), InputEvent::Select);
        bindings.insert(KeyCombo::key(KeyCode::Char('s')), InputEvent::Submit);
        bindings.insert(KeyCombo::key(KeyCode::Char(' ')), InputEvent::Toggle);
        bindings.insert(KeyCombo::key(KeyCode::Esc), InputEvent::Back);
        bindings.insert(KeyCombo::key(KeyCode::Backspace), InputEvent::Back);
        bindings.insert(KeyCombo::key(KeyCode::Char('m')), InputEvent::Minimize);
        bindings.insert(KeyCombo::key(KeyCode::Char('?')), InputEvent::Help);

        // Quit
        bindings.insert(KeyCombo::key(KeyCode::Char('q')), InputEvent::Quit);
        bindings.insert(KeyCombo::ctrl(KeyCode::Char('c')), InputEvent::Quit);

        Self { bindings }
    }
}

/// Input handler for terminal events
#[derive(Debug, Clone)]
pub struct InputHandler {
    bindings: KeyBinding,
    timeout: Duration,
}

impl InputHandler {
    /// Create a new input handler
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: KeyBinding::default(),
            timeout: Duration::from_millis(100),
        }
    }

    /// Create with custom key bindings
    #[must_use]
    pub fn with_bindings(bindings: KeyBinding) -> Self {
        Self {
            bindings,
            ..Self::new()
        }
    }

    /// Set poll timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Wait up to the poll timeout for a key press.
    ///
    /// Blocks the calling thread. Releases and non-key events are skipped.
    ///
    /// # Errors
    ///
    /// Returns error if reading from terminal fails
    pub fn read_key(&self) -> Result<Option<KeyEvent>, InputError> {
        if crossterm::event::poll(self.timeout)? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }

    /// Decode a key press for the current mode
    #[must_use]
    pub fn map_key(&self, key: KeyEvent, mode: InputMode) -> InputEvent {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return InputEvent::Quit;
        }
        match mode {
            InputMode::Navigate => {
                let combo = KeyCombo::new(key.code, key.modifiers);
                self.bindings
                    .get(&combo)
                    .or_else(|| {
                        // Shifted characters like '?' arrive with SHIFT set.
                        let plain = KeyCombo::key(key.code);
                        matches!(key.code, KeyCode::Char(_))
                            .then(|| self.bindings.get(&plain))
                            .flatten()
                    })
                    .unwrap_or(InputEvent::Unknown)
            }
            InputMode::Edit => match key.code {
                KeyCode::Enter => InputEvent::Select,
                KeyCode::Esc => InputEvent::Back,
                KeyCode::Backspace => InputEvent::Backspace,
                KeyCode::Tab => InputEvent::NextField,
                KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                    InputEvent::Char(c)
                }
                _ => InputEvent::Unknown,
            },
            InputMode::Confirm => match key.code {
                KeyCode::Enter | KeyCode::Char('y' | 'Y') => InputEvent::Accept,
                KeyCode::Esc | KeyCode::Char('n' | 'N') => InputEvent::Decline,
                _ => InputEvent::Unknown,
            },
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Input-related errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl From<io::Error> for InputError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_key_combo_hashable() {
        let mut map = HashMap::new();
        map.insert(KeyCombo::key(KeyCode::Char('j')), "down");
        assert_eq!(map.get(&KeyCombo::key(KeyCode::Char('j'))), Some(&"down"));
        assert_ne!(KeyCombo::ctrl(KeyCode::Char('j')), KeyCombo::key(KeyCode::Char('j')));
    }

    #[test]
    fn test_navigation_bindings() {
        let handler = InputHandler::new();
        let nav = InputMode::Navigate;
        assert_eq!(handler.map_key(press(KeyCode::Char('j')), nav), InputEvent::Down);
        assert_eq!(handler.map_key(press(KeyCode::Down), nav), InputEvent::Down);
        assert_eq!(handler.map_key(press(KeyCode::Char('k')), nav), InputEvent::Up);
        assert_eq!(handler.map_key(press(KeyCode::Tab), nav), InputEvent::NextField);
        assert_eq!(handler.map_key(press(KeyCode::Char(' ')), nav), InputEvent::Toggle);
        assert_eq!(handler.map_key(press(KeyCode::Enter), nav), InputEvent::Select);
        assert_eq!(handler.map_key(press(KeyCode::Backspace), nav), InputEvent::Back);
        assert_eq!(handler.map_key(press(KeyCode::Esc), nav), InputEvent::Back);
        assert_eq!(handler.map_key(press(KeyCode::Char('m')), nav), InputEvent::Minimize);
        assert_eq!(handler.map_key(press(KeyCode::Char('q')), nav), InputEvent::Quit);
        assert_eq!(handler.map_key(press(KeyCode::Null), nav), InputEvent::Unknown);
    }

    #[test]
    fn test_shifted_help_key() {
        let handler = InputHandler::new();
        let key = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert_eq!(handler.map_key(key, InputMode::Navigate), InputEvent::Help);
    }

    #[test]
    fn test_edit_mode_captures_letters() {
        let handler = InputHandler::new();
        let edit = InputMode::Edit;
        assert_eq!(handler.map_key(press(KeyCode::Char('q')), edit), InputEvent::Char('q'));
        assert_eq!(handler.map_key(press(KeyCode::Char(' ')), edit), InputEvent::Char(' '));
        assert_eq!(handler.map_key(press(KeyCode::Backspace), edit), InputEvent::Backspace);
        assert_eq!(handler.map_key(press(KeyCode::Enter), edit), InputEvent::Select);
        assert_eq!(handler.map_key(press(KeyCode::Esc), edit), InputEvent::Back);
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let handler = InputHandler::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for mode in [InputMode::Navigate, InputMode::Edit, InputMode::Confirm] {
            assert_eq!(handler.map_key(ctrl_c, mode), InputEvent::Quit);
        }
    }

    #[test]
    fn test_confirm_mode() {
        let handler = InputHandler::new();
        let confirm = InputMode::Confirm;
        assert_eq!(handler.map_key(press(KeyCode::Char('y')), confirm), InputEvent::Accept);
        assert_eq!(handler.map_key(press(KeyCode::Enter), confirm), InputEvent::Accept);
        assert_eq!(handler.map_key(press(KeyCode::Char('n')), confirm), InputEvent::Decline);
        assert_eq!(handler.map_key(press(KeyCode::Esc), confirm), InputEvent::Decline);
        assert_eq!(handler.map_key(press(KeyCode::Char('x')), confirm), InputEvent::Unknown);
    }

    #[test]
    fn test_custom_binding() {
        let mut bindings = KeyBinding::default();
        bindings.bind(KeyCombo::key(KeyCode::F(5)), InputEvent::Submit);
        let handler = InputHandler::with_bindings(bindings).with_timeout(Duration::from_millis(250));
        assert_eq!(handler.timeout, Duration::from_millis(250));
        assert_eq!(
            handler.map_key(press(KeyCode::F(5)), InputMode::Navigate),
            InputEvent::Submit
        );
    }
}
