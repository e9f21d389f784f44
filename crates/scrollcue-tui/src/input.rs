use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleRecording,
    TogglePause,
    ToggleFocus,
    SpeedUp,
    SpeedDown,
    CycleMethod,
    ReloadScript,
    ResetContainer,
    None,
}

/// Amount one speed key press changes the scroll speed by
pub const SPEED_STEP: i32 = 2;

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Char(' '), _) => Action::ToggleRecording,
        (KeyCode::Char('p'), KeyModifiers::NONE) => Action::TogglePause,
        (KeyCode::Char('f'), KeyModifiers::NONE) => Action::ToggleFocus,

        // '+' needs shift on most layouts
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), KeyModifiers::NONE) => Action::SpeedUp,
        (KeyCode::Char('-'), KeyModifiers::NONE) => Action::SpeedDown,
        (KeyCode::Up, KeyModifiers::NONE) => Action::SpeedUp,
        (KeyCode::Down, KeyModifiers::NONE) => Action::SpeedDown,

        (KeyCode::Char('m'), KeyModifiers::NONE) => Action::CycleMethod,
        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::ReloadScript,
        (KeyCode::Char('0'), KeyModifiers::NONE) => Action::ResetContainer,

        _ => Action::None,
    }
}
