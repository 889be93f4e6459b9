//
// ──────────────────────────────────────────────────────────────
//   Key codes
//
//   Keys are indexed by their USB HID usage id (page 0x07), the
//   same stable hardware codes most platform keyboard APIs report.
//   A byte covers the whole keyboard page, so the key buffer is a
//   fixed 256-entry table.
// ──────────────────────────────────────────────────────────────
//

pub const KEY_COUNT: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u8);

impl KeyCode
{
  pub const A: Self = Self(0x04);
  pub const D: Self = Self(0x07);
  pub const E: Self = Self(0x08);
  pub const P: Self = Self(0x13);
  pub const Q: Self = Self(0x14);
  pub const R: Self = Self(0x15);
  pub const S: Self = Self(0x16);
  pub const W: Self = Self(0x1A);

  pub const ENTER: Self = Self(0x28);
  pub const ESCAPE: Self = Self(0x29);
  pub const TAB: Self = Self(0x2B);
  pub const SPACE: Self = Self(0x2C);
  pub const MINUS: Self = Self(0x2D);
  pub const EQUAL: Self = Self(0x2E);

  pub const RIGHT_ARROW: Self = Self(0x4F);
  pub const LEFT_ARROW: Self = Self(0x50);
  pub const DOWN_ARROW: Self = Self(0x51);
  pub const UP_ARROW: Self = Self(0x52);

  pub const KEYPAD_MINUS: Self = Self(0x56);
  pub const KEYPAD_PLUS: Self = Self(0x57);

  pub const LEFT_CONTROL: Self = Self(0xE0);
  pub const LEFT_SHIFT: Self = Self(0xE1);
  pub const LEFT_ALT: Self = Self(0xE2);
  pub const RIGHT_CONTROL: Self = Self(0xE4);
  pub const RIGHT_SHIFT: Self = Self(0xE5);
  pub const RIGHT_ALT: Self = Self(0xE6);

  /// HID code for an ASCII letter, either case.
  pub fn letter(c: char) -> Option<Self>
  {
    let upper = c.to_ascii_uppercase();
    if upper.is_ascii_uppercase()
    {
      Some(Self(Self::A.0 + (upper as u8 - b'A')))
    }
    else
    {
      None
    }
  }

  /// HID code for a top-row digit.
  pub fn digit(d: u8) -> Option<Self>
  {
    match d
    {
      0 => Some(Self(0x27)),
      1..=9 => Some(Self(0x1E + d - 1)),
      _ => None,
    }
  }

  pub fn index(self) -> usize
  {
    self.0 as usize
  }
}
