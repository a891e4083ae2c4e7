use crate::ui::sweep::controller::SweepEvent;
use crate::ui::sweep::types::SweepMode;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Maps raw key presses onto controller events for the current mode.
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent, mode: SweepMode) -> Option<SweepEvent> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(SweepEvent::Quit);
        }

        match mode {
            SweepMode::Selecting => self.handle_selecting_key(key),
            SweepMode::Confirming => self.handle_confirm_key(key),
            SweepMode::Executing => self.handle_executing_key(key),
            SweepMode::Reporting => Some(SweepEvent::Dismiss),
        }
    }

    fn handle_selecting_key(&self, key: KeyEvent) -> Option<SweepEvent> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(SweepEvent::Quit),
            KeyCode::Up | KeyCode::Char('k') => Some(SweepEvent::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(SweepEvent::Down),
            KeyCode::Char(' ') => Some(SweepEvent::ToggleLocal),
            KeyCode::Char('r') => Some(SweepEvent::ToggleRemote),
            KeyCode::Enter => Some(SweepEvent::Confirm),
            _ => None,
        }
    }

    fn handle_confirm_key(&self, key: KeyEvent) -> Option<SweepEvent> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(SweepEvent::Accept),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(SweepEvent::Reject),
            KeyCode::Char('q') => Some(SweepEvent::Quit),
            _ => None,
        }
    }

    fn handle_executing_key(&self, key: KeyEvent) -> Option<SweepEvent> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(SweepEvent::Quit),
            _ => None,
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
