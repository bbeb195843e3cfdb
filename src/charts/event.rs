use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Close,
    Redraw, // Resize or any key that doesn't close
}

/// Block until the next terminal event.
pub fn next() -> std::io::Result<Event> {
    match event::read()? {
        // Filter for Press only (Windows compatibility)
        event::Event::Key(key) if key.kind == KeyEventKind::Press && is_close_key(&key) => {
            Ok(Event::Close)
        }
        _ => Ok(Event::Redraw),
    }
}

pub fn is_close_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
