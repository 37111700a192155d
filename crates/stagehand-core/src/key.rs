//! Symbolic key tokens
//!
//! A `KeyToken` names a logical key the way the VM understands it, not a
//! physical scan code. The only rewrite applied is the space key: the VM
//! represents it as the literal `" "` character, so any case of `"space"`
//! collapses to that.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical key identifier
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyToken(String);

impl KeyToken {
    /// The literal the VM uses for the space bar
    pub const SPACE: &'static str = " ";
    /// Project-level wildcard key option
    pub const ANY: &'static str = "any";

    /// Normalize a raw key identifier into a token
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.eq_ignore_ascii_case("space") {
            KeyToken(Self::SPACE.to_string())
        } else {
            KeyToken(raw)
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_space(&self) -> bool {
        self.0 == Self::SPACE
    }

    #[inline]
    pub fn is_any(&self) -> bool {
        self.0.eq_ignore_ascii_case(Self::ANY)
    }

    /// Human-readable label; the space token reads back as `space`
    pub fn label(&self) -> &str {
        if self.is_space() {
            "space"
        } else {
            &self.0
        }
    }

    /// Arrow direction named by this token, if any
    pub fn arrow(&self) -> Option<ArrowDirection> {
        ArrowDirection::from_option(&self.0)
    }
}

impl fmt::Debug for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({:?})", self.0)
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyToken {
    fn from(raw: &str) -> Self {
        KeyToken::new(raw)
    }
}

/// One of the four arrow keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArrowDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ArrowDirection {
    pub const ALL: [ArrowDirection; 4] = [
        ArrowDirection::Up,
        ArrowDirection::Down,
        ArrowDirection::Left,
        ArrowDirection::Right,
    ];

    /// Parse a project key option such as `"up arrow"` (case-insensitive)
    pub fn from_option(option: &str) -> Option<Self> {
        let lower = option.to_ascii_lowercase();
        match lower.as_str() {
            "up arrow" => Some(ArrowDirection::Up),
            "down arrow" => Some(ArrowDirection::Down),
            "left arrow" => Some(ArrowDirection::Left),
            "right arrow" => Some(ArrowDirection::Right),
            _ => None,
        }
    }

    /// Lower-case direction word
    pub fn name(self) -> &'static str {
        match self {
            ArrowDirection::Up => "up",
            ArrowDirection::Down => "down",
            ArrowDirection::Left => "left",
            ArrowDirection::Right => "right",
        }
    }

    /// Capitalized direction id (`Up`, `Down`, ...)
    pub fn id(self) -> &'static str {
        match self {
            ArrowDirection::Up => "Up",
            ArrowDirection::Down => "Down",
            ArrowDirection::Left => "Left",
            ArrowDirection::Right => "Right",
        }
    }

    /// Host key code posted for this arrow (`ArrowUp`, ...)
    pub fn key_code(self) -> KeyToken {
        KeyToken::new(format!("Arrow{}", self.id()))
    }

    /// Selector of the synthesized control
    pub fn selector(self) -> String {
        format!(".{}-arrow", self.name())
    }
}

/// Ordered, deduplicated set of key tokens.
///
/// Iteration follows first-insertion order, which is what makes control
/// layouts reproducible from the same scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: Vec<KeyToken>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token; returns false if it was already present
    pub fn insert(&mut self, key: KeyToken) -> bool {
        if self.keys.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    pub fn contains(&self, key: &KeyToken) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyToken> {
        self.keys.iter()
    }
}

impl FromIterator<KeyToken> for KeySet {
    fn from_iter<I: IntoIterator<Item = KeyToken>>(iter: I) -> Self {
        let mut set = KeySet::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

impl<'a> IntoIterator for &'a KeySet {
    type Item = &'a KeyToken;
    type IntoIter = std::slice::Iter<'a, KeyToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
