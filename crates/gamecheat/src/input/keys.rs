//! Windows virtual-key codes and their display names.

pub const BACK: u16 = 0x08;
pub const TAB: u16 = 0x09;
pub const RETURN: u16 = 0x0D;
pub const SHIFT: u16 = 0x10;
pub const CONTROL: u16 = 0x11;
pub const MENU: u16 = 0x12;
pub const PAUSE: u16 = 0x13;
pub const CAPITAL: u16 = 0x14;
pub const ESCAPE: u16 = 0x1B;
pub const SPACE: u16 = 0x20;
pub const PRIOR: u16 = 0x21;
pub const NEXT: u16 = 0x22;
pub const END: u16 = 0x23;
pub const HOME: u16 = 0x24;
pub const LEFT: u16 = 0x25;
pub const UP: u16 = 0x26;
pub const RIGHT: u16 = 0x27;
pub const DOWN: u16 = 0x28;
pub const INSERT: u16 = 0x2D;
pub const DELETE: u16 = 0x2E;
pub const KEY_0: u16 = 0x30;
pub const KEY_A: u16 = 0x41;
pub const LWIN: u16 = 0x5B;
pub const RWIN: u16 = 0x5C;
pub const NUMPAD0: u16 = 0x60;
pub const MULTIPLY: u16 = 0x6A;
pub const ADD: u16 = 0x6B;
pub const SUBTRACT: u16 = 0x6D;
pub const DECIMAL: u16 = 0x6E;
pub const DIVIDE: u16 = 0x6F;
pub const F1: u16 = 0x70;
pub const F24: u16 = 0x87;
pub const OEM_3: u16 = 0xC0;

/// Named keys other than letters, digits, numpad digits and F-keys
const NAMED: &[(u16, &str)] = &[
    (BACK, "Backspace"),
    (TAB, "Tab"),
    (RETURN, "Enter"),
    (PAUSE, "Pause"),
    (CAPITAL, "CapsLock"),
    (ESCAPE, "Escape"),
    (SPACE, "Space"),
    (PRIOR, "PageUp"),
    (NEXT, "PageDown"),
    (END, "End"),
    (HOME, "Home"),
    (LEFT, "Left"),
    (UP, "Up"),
    (RIGHT, "Right"),
    (DOWN, "Down"),
    (INSERT, "Insert"),
    (DELETE, "Delete"),
    (MULTIPLY, "NumpadMultiply"),
    (ADD, "NumpadAdd"),
    (SUBTRACT, "NumpadSubtract"),
    (DECIMAL, "NumpadDecimal"),
    (DIVIDE, "NumpadDivide"),
    (OEM_3, "Tilde"),
];

/// Extra spellings accepted when parsing
const ALIASES: &[(&str, u16)] = &[
    ("return", RETURN),
    ("esc", ESCAPE),
    ("back", BACK),
    ("pgup", PRIOR),
    ("pgdn", NEXT),
    ("del", DELETE),
    ("ins", INSERT),
    ("`", OEM_3),
];

/// Display name of a virtual key, `None` for codes without one
pub fn key_name(vk: u16) -> Option<String> {
    match vk {
        0x30..=0x39 | 0x41..=0x5A => char::from_u32(u32::from(vk)).map(String::from),
        NUMPAD0..=0x69 => Some(format!("Numpad{}", vk - NUMPAD0)),
        F1..=F24 => Some(format!("F{}", vk - F1 + 1)),
        _ => NAMED
            .iter()
            .find(|(code, _)| *code == vk)
            .map(|(_, name)| (*name).to_string()),
    }
}

/// Parse a key name (case-insensitive) into a virtual-key code
pub fn parse_key(name: &str) -> Option<u16> {
    let lower = name.trim().to_ascii_lowercase();

    if let [c] = lower.as_bytes() {
        if c.is_ascii_digit() || c.is_ascii_lowercase() {
            return Some(u16::from(c.to_ascii_uppercase()));
        }
    }
    if let Some(n) = lower.strip_prefix("numpad").and_then(|n| n.parse::<u16>().ok()) {
        return (n <= 9).then_some(NUMPAD0 + n);
    }
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u16>().ok()) {
        return (1..=24).contains(&n).then_some(F1 + n - 1);
    }

    NAMED
        .iter()
        .find(|(_, n)| n.eq_ignore_ascii_case(&lower))
        .map(|(code, _)| *code)
        .or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| *alias == lower)
                .map(|(_, code)| *code)
        })
}
