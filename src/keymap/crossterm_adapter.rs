//! Adapter to convert crossterm key events to our Keystroke type

use crossterm::event::{KeyCode as CtKeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::types::{KeyCode, Keystroke, Modifiers};

/// Convert a crossterm key event to a Keystroke
///
/// Returns None for releases and keys we don't map. Shift is folded into the
/// character for printable keys, so `Shift+h` arrives as `Char('H')`.
pub fn keystroke_from_crossterm(event: &KeyEvent) -> Option<Keystroke> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);
    let shift = event.modifiers.contains(KeyModifiers::SHIFT);

    let key = match event.code {
        CtKeyCode::Char(' ') => KeyCode::Space,
        CtKeyCode::Char(c) => {
            // Ctrl+letter is reported lowercase; keep bindings case-stable
            let c = if ctrl { c.to_ascii_lowercase() } else { c };
            return Some(Keystroke::new(KeyCode::Char(c), Modifiers::new(ctrl, false, alt)));
        }
        CtKeyCode::Enter => KeyCode::Enter,
        CtKeyCode::Esc => KeyCode::Escape,
        CtKeyCode::Tab => KeyCode::Tab,
        CtKeyCode::BackTab => {
            return Some(Keystroke::new(KeyCode::Tab, Modifiers::SHIFT));
        }
        CtKeyCode::Backspace => KeyCode::Backspace,
        CtKeyCode::Delete => KeyCode::Delete,
        CtKeyCode::Up => KeyCode::Up,
        CtKeyCode::Down => KeyCode::Down,
        CtKeyCode::Left => KeyCode::Left,
        CtKeyCode::Right => KeyCode::Right,
        CtKeyCode::Home => KeyCode::Home,
        CtKeyCode::End => KeyCode::End,
        CtKeyCode::PageUp => KeyCode::PageUp,
        CtKeyCode::PageDown => KeyCode::PageDown,
        CtKeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };

    Some(Keystroke::new(key, Modifiers::new(ctrl, shift, alt)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(code: CtKeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_shifted_char_keeps_case_without_shift_flag() {
        let stroke =
            keystroke_from_crossterm(&event(CtKeyCode::Char('H'), KeyModifiers::SHIFT)).unwrap();
        assert_eq!(stroke, Keystroke::char('H'));
    }

    #[test]
    fn test_ctrl_char() {
        let stroke =
            keystroke_from_crossterm(&event(CtKeyCode::Char('p'), KeyModifiers::CONTROL)).unwrap();
        assert_eq!(stroke, Keystroke::ctrl('p'));
    }

    #[test]
    fn test_space_and_named_keys() {
        assert_eq!(
            keystroke_from_crossterm(&event(CtKeyCode::Char(' '), KeyModifiers::NONE)),
            Some(Keystroke::key(KeyCode::Space))
        );
        assert_eq!(
            keystroke_from_crossterm(&event(CtKeyCode::Esc, KeyModifiers::NONE)),
            Some(Keystroke::key(KeyCode::Escape))
        );
    }

    #[test]
    fn test_release_is_ignored() {
        let mut ev = event(CtKeyCode::Char('a'), KeyModifiers::NONE);
        ev.kind = KeyEventKind::Release;
        assert_eq!(keystroke_from_crossterm(&ev), None);
    }
}
