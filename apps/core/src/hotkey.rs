use std::fmt::{Display, Formatter};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Apple,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(any(target_os = "macos", target_os = "ios")) {
            Self::Apple
        } else {
            Self::Other
        }
    }

    fn meta_name(self) -> &'static str {
        match self {
            Self::Apple => "Command",
            Self::Other => "Meta",
        }
    }
}

/// Raw key event as delivered by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyEvent {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    fn has_modifier(&self) -> bool {
        self.ctrl || self.shift || self.alt || self.meta
    }
}

const MODIFIER_KEYS: [&str; 4] = ["Control", "Shift", "Alt", "Meta"];

/// Normalized chord for a key event, e.g. `Ctrl+Shift+K`.
///
/// Returns `None` for presses of a bare modifier and for an unmodified `Tab`,
/// which must keep moving focus.
pub fn chord_from_event(event: &KeyEvent, platform: Platform) -> Option<String> {
    if !event.has_modifier() && event.key == "Tab" {
        return None;
    }
    if MODIFIER_KEYS.contains(&event.key.as_str()) {
        return None;
    }

    let key = normalize_event_key(&event.key);
    let mut parts: Vec<&str> = Vec::with_capacity(5);
    if event.ctrl {
        parts.push("Ctrl");
    }
    if event.shift {
        parts.push("Shift");
    }
    if event.alt {
        parts.push("Alt");
    }
    if event.meta {
        parts.push(platform.meta_name());
    }

    parts.push(&key);
    Some(parts.join("+"))
}

fn normalize_event_key(key: &str) -> String {
    match key {
        " " => "Space".to_string(),
        "ArrowUp" => "Up".to_string(),
        "ArrowDown" => "Down".to_string(),
        "ArrowLeft" => "Left".to_string(),
        "ArrowRight" => "Right".to_string(),
        _ if key.chars().count() == 1 => key.to_uppercase(),
        _ => key.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    Meta,
    Command,
}

impl Modifier {
    fn parse(input: &str) -> Option<Self> {
        match input.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Self::Ctrl),
            "shift" => Some(Self::Shift),
            "alt" | "option" => Some(Self::Alt),
            "meta" | "win" | "super" => Some(Self::Meta),
            "command" | "cmd" => Some(Self::Command),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Ctrl => "Ctrl",
            Self::Shift => "Shift",
            Self::Alt => "Alt",
            Self::Meta => "Meta",
            Self::Command => "Command",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChordError {
    #[error("shortcut is empty")]
    Empty,
    #[error("shortcut is missing a key")]
    MissingKey,
    #[error("unsupported modifier '{0}'")]
    UnknownModifier(String),
}

/// Parsed chord with modifiers held in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    pub modifiers: Vec<Modifier>,
    pub key: String,
}

impl Chord {
    pub fn parse(input: &str) -> Result<Self, ChordError> {
        let parts: Vec<&str> = input
            .split('+')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        // "Ctrl++" names the plus key.
        let trailing_plus = input.trim_end().ends_with("++");

        let Some((last, leading)) = parts.split_last() else {
            return Err(if trailing_plus {
                ChordError::MissingKey
            } else {
                ChordError::Empty
            });
        };

        let (key, modifier_parts) = if trailing_plus {
            ("+".to_string(), parts.as_slice())
        } else {
            if Modifier::parse(last).is_some() {
                return Err(ChordError::MissingKey);
            }
            (normalize_event_key(last), leading)
        };

        let mut modifiers = Vec::with_capacity(modifier_parts.len());
        for part in modifier_parts {
            let modifier =
                Modifier::parse(part).ok_or_else(|| ChordError::UnknownModifier(part.to_string()))?;
            if !modifiers.contains(&modifier) {
                modifiers.push(modifier);
            }
        }
        modifiers.sort();

        Ok(Self { modifiers, key: canonical_key(&key) })
    }

    pub fn has_modifier(&self) -> bool {
        !self.modifiers.is_empty()
    }
}

fn canonical_key(key: &str) -> String {
    match key.to_ascii_lowercase().as_str() {
        "space" => "Space".to_string(),
        "up" => "Up".to_string(),
        "down" => "Down".to_string(),
        "left" => "Left".to_string(),
        "right" => "Right".to_string(),
        _ if key.chars().count() == 1 => key.to_uppercase(),
        _ => key.to_string(),
    }
}

impl Display for Chord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.as_str())?;
        }
        f.write_str(&self.key)
    }
}

/// Compares two chord strings after canonicalization.
pub fn chords_match(left: &str, right: &str) -> bool {
    match (Chord::parse(left), Chord::parse(right)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_follow_fixed_order() {
        let event = KeyEvent::new("k").alt().shift().ctrl();
        assert_eq!(
            chord_from_event(&event, Platform::Other).as_deref(),
            Some("Ctrl+Shift+Alt+K")
        );
    }

    #[test]
    fn meta_is_named_per_platform() {
        let event = KeyEvent::new("k").meta().shift();
        assert_eq!(
            chord_from_event(&event, Platform::Apple).as_deref(),
            Some("Shift+Command+K")
        );
        assert_eq!(
            chord_from_event(&event, Platform::Other).as_deref(),
            Some("Shift+Meta+K")
        );
    }

    #[test]
    fn special_keys_use_fixed_names() {
        let cases = [
            (" ", "Ctrl+Space"),
            ("ArrowUp", "Ctrl+Up"),
            ("ArrowDown", "Ctrl+Down"),
            ("ArrowLeft", "Ctrl+Left"),
            ("ArrowRight", "Ctrl+Right"),
            ("F5", "Ctrl+F5"),
        ];
        for (key, expected) in cases {
            let event = KeyEvent::new(key).ctrl();
            assert_eq!(
                chord_from_event(&event, Platform::Other).as_deref(),
                Some(expected)
            );
        }
    }

    #[test]
    fn bare_modifier_and_tab_yield_nothing() {
        assert_eq!(chord_from_event(&KeyEvent::new("Shift").shift(), Platform::Other), None);
        assert_eq!(chord_from_event(&KeyEvent::new("Tab"), Platform::Other), None);
        assert_eq!(
            chord_from_event(&KeyEvent::new("Tab").ctrl(), Platform::Other).as_deref(),
            Some("Ctrl+Tab")
        );
    }

    #[test]
    fn parse_canonicalizes_order_and_case() {
        let chord = Chord::parse(" shift + ctrl + k ").unwrap();
        assert_eq!(chord.to_string(), "Ctrl+Shift+K");
    }

    #[test]
    fn parse_rejects_missing_key() {
        assert_eq!(Chord::parse("Ctrl+Shift"), Err(ChordError::MissingKey));
        assert_eq!(Chord::parse("  "), Err(ChordError::Empty));
    }

    #[test]
    fn parse_rejects_unknown_modifier() {
        assert_eq!(
            Chord::parse("Hyper+K"),
            Err(ChordError::UnknownModifier("Hyper".into()))
        );
    }

    #[test]
    fn chords_match_ignores_spelling() {
        assert!(chords_match("Ctrl+Shift+K", "shift+control+k"));
        assert!(chords_match("Cmd+Shift+K", "Command+Shift+K"));
        assert!(!chords_match("Ctrl+Shift+K", "Ctrl+K"));
        assert!(!chords_match("Ctrl+Shift+K", ""));
    }
}
