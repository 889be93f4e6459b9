use gyre_core::input::KeyCode;
use winit::event::MouseButton;
use winit::keyboard::KeyCode as WinitKey;

//
// ──────────────────────────────────────────────────────────────
//   winit physical key → HID usage code
// ──────────────────────────────────────────────────────────────
//

const LETTERS: [(WinitKey, char); 26] = [
  (WinitKey::KeyA, 'a'),
  (WinitKey::KeyB, 'b'),
  (WinitKey::KeyC, 'c'),
  (WinitKey::KeyD, 'd'),
  (WinitKey::KeyE, 'e'),
  (WinitKey::KeyF, 'f'),
  (WinitKey::KeyG, 'g'),
  (WinitKey::KeyH, 'h'),
  (WinitKey::KeyI, 'i'),
  (WinitKey::KeyJ, 'j'),
  (WinitKey::KeyK, 'k'),
  (WinitKey::KeyL, 'l'),
  (WinitKey::KeyM, 'm'),
  (WinitKey::KeyN, 'n'),
  (WinitKey::KeyO, 'o'),
  (WinitKey::KeyP, 'p'),
  (WinitKey::KeyQ, 'q'),
  (WinitKey::KeyR, 'r'),
  (WinitKey::KeyS, 's'),
  (WinitKey::KeyT, 't'),
  (WinitKey::KeyU, 'u'),
  (WinitKey::KeyV, 'v'),
  (WinitKey::KeyW, 'w'),
  (WinitKey::KeyX, 'x'),
  (WinitKey::KeyY, 'y'),
  (WinitKey::KeyZ, 'z'),
];

const DIGITS: [(WinitKey, u8); 10] = [
  (WinitKey::Digit0, 0),
  (WinitKey::Digit1, 1),
  (WinitKey::Digit2, 2),
  (WinitKey::Digit3, 3),
  (WinitKey::Digit4, 4),
  (WinitKey::Digit5, 5),
  (WinitKey::Digit6, 6),
  (WinitKey::Digit7, 7),
  (WinitKey::Digit8, 8),
  (WinitKey::Digit9, 9),
];

/// HID code for a winit physical key, if the key buffer tracks it.
pub fn hid_code(key: WinitKey) -> Option<KeyCode>
{
  if let Some(&(_, c)) = LETTERS.iter().find(|(k, _)| *k == key)
  {
    return KeyCode::letter(c);
  }

  if let Some(&(_, d)) = DIGITS.iter().find(|(k, _)| *k == key)
  {
    return KeyCode::digit(d);
  }

  let code = match key
  {
    WinitKey::Enter => KeyCode::ENTER,
    WinitKey::Escape => KeyCode::ESCAPE,
    WinitKey::Tab => KeyCode::TAB,
    WinitKey::Space => KeyCode::SPACE,
    WinitKey::Minus => KeyCode::MINUS,
    WinitKey::Equal => KeyCode::EQUAL,

    WinitKey::ArrowRight => KeyCode::RIGHT_ARROW,
    WinitKey::ArrowLeft => KeyCode::LEFT_ARROW,
    WinitKey::ArrowDown => KeyCode::DOWN_ARROW,
    WinitKey::ArrowUp => KeyCode::UP_ARROW,

    WinitKey::NumpadSubtract => KeyCode::KEYPAD_MINUS,
    WinitKey::NumpadAdd => KeyCode::KEYPAD_PLUS,

    WinitKey::ControlLeft => KeyCode::LEFT_CONTROL,
    WinitKey::ShiftLeft => KeyCode::LEFT_SHIFT,
    WinitKey::AltLeft => KeyCode::LEFT_ALT,
    WinitKey::ControlRight => KeyCode::RIGHT_CONTROL,
    WinitKey::ShiftRight => KeyCode::RIGHT_SHIFT,
    WinitKey::AltRight => KeyCode::RIGHT_ALT,

    _ => return None,
  };

  Some(code)
}

/// Index into the mouse button buffer.
pub fn mouse_button_index(button: MouseButton) -> usize
{
  match button
  {
    MouseButton::Left => gyre_core::input::MOUSE_LEFT,
    MouseButton::Right => gyre_core::input::MOUSE_RIGHT,
    MouseButton::Middle => gyre_core::input::MOUSE_MIDDLE,
    MouseButton::Back => 3,
    MouseButton::Forward => 4,
    MouseButton::Other(n) => n as usize,
  }
}
