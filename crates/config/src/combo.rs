//! Key-combination parsing.
//!
//! Responsibilities:
//! - Parse combination strings such as `"s s"`, `"r 3"` or `"ctrl+shift+k"`
//!   into structured keystroke sequences.
//! - Render parsed combinations back into a canonical string for logs.
//!
//! Does NOT handle:
//! - Integration with crossterm (that's in the TUI crate).
//! - Runtime key event matching or sequence timing.
//! - Identity of bindings: the hotkey registry keys its table by the literal
//!   string, never by the parsed form.

use std::fmt;

use thiserror::Error;

/// Maximum number of strokes in one combination.
pub const MAX_SEQUENCE_LENGTH: usize = 4;

/// Errors that can occur when parsing a combination string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComboError {
    /// Invalid combination syntax
    #[error("Invalid key syntax: '{combo}'. Expected format like 'e', 's s', 'ctrl+s', 'shift+tab'")]
    InvalidSyntax {
        /// The invalid combination string
        combo: String,
    },

    /// Unknown key name
    #[error("Unknown key name: '{name}'")]
    UnknownKey {
        /// The unknown key name
        name: String,
    },

    /// Sequence with too many strokes
    #[error("Key sequence '{combo}' has more than {max} strokes")]
    TooLong {
        /// The offending combination string
        combo: String,
        /// The maximum supported number of strokes
        max: usize,
    },
}

/// Key code names that can be parsed from combination strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCodeName {
    /// A character key (e.g., 'a', '1', '?')
    Char(char),
    /// Function key F1-F20
    F(u8),
    /// Escape key
    Esc,
    /// Enter/Return key
    Enter,
    /// Space key
    Space,
    /// Tab key
    Tab,
    /// BackTab (Shift+Tab) key
    BackTab,
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Insert key
    Insert,
    /// Home key
    Home,
    /// End key
    End,
    /// Page Up key
    PageUp,
    /// Page Down key
    PageDown,
    /// Up arrow key
    Up,
    /// Down arrow key
    Down,
    /// Left arrow key
    Left,
    /// Right arrow key
    Right,
}

impl fmt::Display for KeyCodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char('+') => write!(f, "plus"),
            Self::Char(c) => write!(f, "{}", c),
            Self::F(n) => write!(f, "f{}", n),
            Self::Esc => write!(f, "esc"),
            Self::Enter => write!(f, "enter"),
            Self::Space => write!(f, "space"),
            Self::Tab => write!(f, "tab"),
            Self::BackTab => write!(f, "backtab"),
            Self::Backspace => write!(f, "backspace"),
            Self::Delete => write!(f, "del"),
            Self::Insert => write!(f, "ins"),
            Self::Home => write!(f, "home"),
            Self::End => write!(f, "end"),
            Self::PageUp => write!(f, "pageup"),
            Self::PageDown => write!(f, "pagedown"),
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Modifier flags for a single stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ModifierFlags {
    /// Control key pressed
    pub ctrl: bool,
    /// Shift key pressed
    pub shift: bool,
    /// Alt/Option key pressed
    pub alt: bool,
    /// Meta/Command/Super key pressed
    pub meta: bool,
}

impl ModifierFlags {
    /// Returns true if no modifier is set.
    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.shift || self.alt || self.meta)
    }
}

impl fmt::Display for ModifierFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("ctrl");
        }
        if self.alt {
            parts.push("alt");
        }
        if self.shift {
            parts.push("shift");
        }
        if self.meta {
            parts.push("meta");
        }
        if parts.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", parts.join("+"))
        }
    }
}

/// One key press: a key plus the modifiers held with it.
///
/// Character strokes never carry `shift`; `shift+a` is folded into `'A'`.
/// BackTab strokes always carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyStroke {
    /// The key code
    pub code: KeyCodeName,
    /// Modifier flags
    pub modifiers: ModifierFlags,
}

impl fmt::Display for KeyStroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}+{}", self.modifiers, self.code)
        }
    }
}

/// A parsed combination: one to [`MAX_SEQUENCE_LENGTH`] strokes pressed in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combination {
    strokes: Vec<KeyStroke>,
}

impl Combination {
    /// The strokes of this combination, in press order.
    pub fn strokes(&self) -> &[KeyStroke] {
        &self.strokes
    }

    /// Number of strokes.
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Always false for a parsed combination; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Returns true if `prefix` is a proper prefix of this combination.
    pub fn continues(&self, prefix: &[KeyStroke]) -> bool {
        prefix.len() < self.strokes.len() && self.strokes.starts_with(prefix)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.strokes.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(" "))
    }
}

impl std::str::FromStr for Combination {
    type Err = ComboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_combination(s)
    }
}

/// Parse a combination string like `"s s"`, `"r 3"` or `"ctrl+k ctrl+c"`.
///
/// # Examples
///
/// ```
/// use stash_config::combo::{parse_combination, KeyCodeName};
///
/// let combo = parse_combination("r 3").unwrap();
/// assert_eq!(combo.len(), 2);
/// assert_eq!(combo.strokes()[1].code, KeyCodeName::Char('3'));
/// ```
pub fn parse_combination(combo_str: &str) -> Result<Combination, ComboError> {
    let strokes = combo_str
        .split_whitespace()
        .map(parse_stroke)
        .collect::<Result<Vec<_>, _>>()?;

    if strokes.is_empty() {
        return Err(ComboError::InvalidSyntax {
            combo: combo_str.to_string(),
        });
    }
    if strokes.len() > MAX_SEQUENCE_LENGTH {
        return Err(ComboError::TooLong {
            combo: combo_str.to_string(),
            max: MAX_SEQUENCE_LENGTH,
        });
    }

    Ok(Combination { strokes })
}

/// Parse a single stroke like `"e"`, `"ctrl+s"` or `"shift+tab"`.
///
/// # Examples
///
/// ```
/// use stash_config::combo::{parse_stroke, KeyCodeName};
///
/// let stroke = parse_stroke("ctrl+x").unwrap();
/// assert_eq!(stroke.code, KeyCodeName::Char('x'));
/// assert!(stroke.modifiers.ctrl);
///
/// let stroke = parse_stroke("F1").unwrap();
/// assert_eq!(stroke.code, KeyCodeName::F(1));
/// ```
pub fn parse_stroke(stroke_str: &str) -> Result<KeyStroke, ComboError> {
    let stroke_str = stroke_str.trim();

    if stroke_str.is_empty() {
        return Err(ComboError::InvalidSyntax {
            combo: stroke_str.to_string(),
        });
    }

    // A bare '+' is the plus key, not an empty modifier list
    if stroke_str == "+" {
        return Ok(KeyStroke {
            code: KeyCodeName::Char('+'),
            modifiers: ModifierFlags::default(),
        });
    }

    let mut modifiers = ModifierFlags::default();
    let mut key_name = "";

    for part in stroke_str.split('+').map(str::trim) {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" | "mod" => modifiers.ctrl = true,
            "shift" => modifiers.shift = true,
            "alt" | "option" => modifiers.alt = true,
            "meta" | "cmd" | "command" | "super" => modifiers.meta = true,
            _ => {
                if !key_name.is_empty() || part.is_empty() {
                    return Err(ComboError::InvalidSyntax {
                        combo: stroke_str.to_string(),
                    });
                }
                key_name = part;
            }
        }
    }

    if key_name.is_empty() {
        return Err(ComboError::InvalidSyntax {
            combo: stroke_str.to_string(),
        });
    }

    let code = parse_key_code(key_name)?;

    let code = match code {
        KeyCodeName::Tab if modifiers.shift => KeyCodeName::BackTab,
        KeyCodeName::Char(c) if modifiers.shift => KeyCodeName::Char(c.to_ascii_uppercase()),
        other => other,
    };
    match code {
        KeyCodeName::Char(_) => modifiers.shift = false,
        KeyCodeName::BackTab => modifiers.shift = true,
        _ => {}
    }

    Ok(KeyStroke { code, modifiers })
}

/// Parse a key code name (without modifiers).
fn parse_key_code(name: &str) -> Result<KeyCodeName, ComboError> {
    let name_lower = name.to_ascii_lowercase();

    match name_lower.as_str() {
        "esc" | "escape" => return Ok(KeyCodeName::Esc),
        "enter" | "return" => return Ok(KeyCodeName::Enter),
        "space" => return Ok(KeyCodeName::Space),
        "tab" => return Ok(KeyCodeName::Tab),
        "backtab" => return Ok(KeyCodeName::BackTab),
        "backspace" => return Ok(KeyCodeName::Backspace),
        "delete" | "del" => return Ok(KeyCodeName::Delete),
        "insert" | "ins" => return Ok(KeyCodeName::Insert),
        "home" => return Ok(KeyCodeName::Home),
        "end" => return Ok(KeyCodeName::End),
        "pageup" | "page_up" | "pgup" => return Ok(KeyCodeName::PageUp),
        "pagedown" | "page_down" | "pgdn" => return Ok(KeyCodeName::PageDown),
        "up" => return Ok(KeyCodeName::Up),
        "down" => return Ok(KeyCodeName::Down),
        "left" => return Ok(KeyCodeName::Left),
        "right" => return Ok(KeyCodeName::Right),
        "plus" => return Ok(KeyCodeName::Char('+')),
        _ => {}
    }

    if let Some(num_str) = name_lower.strip_prefix('f')
        && let Ok(num) = num_str.parse::<u8>()
        && (1..=20).contains(&num)
    {
        return Ok(KeyCodeName::F(num));
    }

    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCodeName::Char(c));
    }

    Err(ComboError::UnknownKey {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_char() {
        let stroke = parse_stroke("e").unwrap();
        assert_eq!(stroke.code, KeyCodeName::Char('e'));
        assert!(stroke.modifiers.is_empty());
    }

    #[test]
    fn test_parse_two_stroke_sequence() {
        let combo = parse_combination("s s").unwrap();
        assert_eq!(combo.len(), 2);
        assert_eq!(combo.strokes()[0], combo.strokes()[1]);
    }

    #[test]
    fn test_parse_rating_sequence() {
        let combo = parse_combination("r 3").unwrap();
        assert_eq!(combo.strokes()[0].code, KeyCodeName::Char('r'));
        assert_eq!(combo.strokes()[1].code, KeyCodeName::Char('3'));
    }

    #[test]
    fn test_extra_whitespace_between_strokes() {
        let a = parse_combination("  d   d ").unwrap();
        let b = parse_combination("d d").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_ctrl_combo() {
        let stroke = parse_stroke("ctrl+x").unwrap();
        assert_eq!(stroke.code, KeyCodeName::Char('x'));
        assert!(stroke.modifiers.ctrl);
        assert!(!stroke.modifiers.alt);
    }

    #[test]
    fn test_mod_is_ctrl() {
        assert_eq!(parse_stroke("mod+s").unwrap(), parse_stroke("ctrl+s").unwrap());
    }

    #[test]
    fn test_meta_aliases() {
        for alias in ["meta+k", "cmd+k", "command+k", "super+k"] {
            assert!(parse_stroke(alias).unwrap().modifiers.meta, "{alias}");
        }
    }

    #[test]
    fn test_shift_letter_folds_to_uppercase() {
        let stroke = parse_stroke("shift+a").unwrap();
        assert_eq!(stroke.code, KeyCodeName::Char('A'));
        assert!(!stroke.modifiers.shift);
        assert_eq!(stroke, parse_stroke("A").unwrap());
    }

    #[test]
    fn test_parse_shift_tab() {
        let stroke = parse_stroke("shift+tab").unwrap();
        assert_eq!(stroke.code, KeyCodeName::BackTab);
        assert!(stroke.modifiers.shift);
    }

    #[test]
    fn test_parse_plus_key() {
        assert_eq!(parse_stroke("+").unwrap().code, KeyCodeName::Char('+'));
        let stroke = parse_stroke("ctrl+plus").unwrap();
        assert_eq!(stroke.code, KeyCodeName::Char('+'));
        assert!(stroke.modifiers.ctrl);
    }

    #[test]
    fn test_parse_function_key() {
        assert_eq!(parse_stroke("F1").unwrap().code, KeyCodeName::F(1));
        assert_eq!(parse_stroke("f12").unwrap().code, KeyCodeName::F(12));
        assert!(parse_stroke("F0").is_err());
        assert!(parse_stroke("F21").is_err());
    }

    #[test]
    fn test_parse_special_keys() {
        assert_eq!(parse_stroke("esc").unwrap().code, KeyCodeName::Esc);
        assert_eq!(parse_stroke("Escape").unwrap().code, KeyCodeName::Esc);
        assert_eq!(parse_stroke("enter").unwrap().code, KeyCodeName::Enter);
        assert_eq!(parse_stroke("space").unwrap().code, KeyCodeName::Space);
        assert_eq!(parse_stroke("del").unwrap().code, KeyCodeName::Delete);
        assert_eq!(parse_stroke("pgdn").unwrap().code, KeyCodeName::PageDown);
        assert_eq!(parse_stroke("left").unwrap().code, KeyCodeName::Left);
    }

    #[test]
    fn test_case_sensitive_char_keys() {
        let lower = parse_stroke("x").unwrap();
        let upper = parse_stroke("X").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_invalid_syntax_empty() {
        assert!(matches!(
            parse_combination("   "),
            Err(ComboError::InvalidSyntax { .. })
        ));
    }

    #[test]
    fn test_invalid_syntax_only_modifiers() {
        assert!(matches!(
            parse_stroke("ctrl+shift"),
            Err(ComboError::InvalidSyntax { .. })
        ));
    }

    #[test]
    fn test_invalid_syntax_two_keys() {
        assert!(matches!(
            parse_stroke("a+b"),
            Err(ComboError::InvalidSyntax { .. })
        ));
    }

    #[test]
    fn test_unknown_key() {
        assert!(matches!(
            parse_stroke("ctrl+bogus"),
            Err(ComboError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_too_long() {
        assert!(matches!(
            parse_combination("a b c d e"),
            Err(ComboError::TooLong { max: 4, .. })
        ));
        assert!(parse_combination("a b c d").is_ok());
    }

    #[test]
    fn test_continues() {
        let combo = parse_combination("d d").unwrap();
        let first = parse_combination("d").unwrap();
        assert!(combo.continues(first.strokes()));
        assert!(!combo.continues(combo.strokes()));
        assert!(!first.continues(first.strokes()));
    }

    #[test]
    fn test_display_round_trips() {
        for s in ["s s", "r 3", "ctrl+alt+x", "shift+tab", "plus", "f5 esc"] {
            let combo = parse_combination(s).unwrap();
            let reparsed = parse_combination(&combo.to_string()).unwrap();
            assert_eq!(combo, reparsed, "{s}");
        }
    }

    #[test]
    fn test_display_modifier_flags() {
        assert_eq!(ModifierFlags::default().to_string(), "none");
        let flags = ModifierFlags {
            ctrl: true,
            alt: true,
            ..Default::default()
        };
        assert_eq!(flags.to_string(), "ctrl+alt");
    }
}
