use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Largest number of options a single question can label (`A` through `Z`).
pub const MAX_OPTIONS: usize = 26;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("option label must be a single letter A-Z, got {0:?}")]
    Invalid(String),

    #[error("option index {0} has no label")]
    IndexOutOfRange(usize),
}

/// Positional identifier of an answer option: `A` is index 0, `B` is index 1, and so on.
///
/// Labels compare by position, so `A < B`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionLabel(u8);

impl OptionLabel {
    /// Label for the option at `index`.
    ///
    /// # Errors
    ///
    /// Returns `LabelError::IndexOutOfRange` when `index` is 26 or more.
    pub fn from_index(index: usize) -> Result<Self, LabelError> {
        u8::try_from(index)
            .ok()
            .filter(|value| usize::from(*value) < MAX_OPTIONS)
            .map(Self)
            .ok_or(LabelError::IndexOutOfRange(index))
    }

    /// Zero-based option position this label points at.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    #[must_use]
    pub fn as_char(self) -> char {
        char::from(b'A' + self.0)
    }
}

impl TryFrom<char> for OptionLabel {
    type Error = LabelError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        if value.is_ascii_uppercase() {
            // ASCII uppercase is always within one byte.
            Ok(Self(value as u8 - b'A'))
        } else {
            Err(LabelError::Invalid(value.to_string()))
        }
    }
}

impl FromStr for OptionLabel {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Self::try_from(ch),
            _ => Err(LabelError::Invalid(s.to_string())),
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl fmt::Debug for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionLabel({})", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_and_label_map_positionally() {
        let b = OptionLabel::from_index(1).unwrap();
        assert_eq!(b.as_char(), 'B');
        assert_eq!(b.index(), 1);
        assert_eq!(b.to_string(), "B");
        assert_eq!("Z".parse::<OptionLabel>().unwrap().index(), 25);
    }

    #[test]
    fn rejects_out_of_alphabet_values() {
        assert_eq!(
            OptionLabel::from_index(26).unwrap_err(),
            LabelError::IndexOutOfRange(26)
        );
        assert!("b".parse::<OptionLabel>().is_err());
        assert!("AB".parse::<OptionLabel>().is_err());
        assert!("".parse::<OptionLabel>().is_err());
    }

    #[test]
    fn labels_order_by_position() {
        let a: OptionLabel = "A".parse().unwrap();
        let c: OptionLabel = "C".parse().unwrap();
        assert!(a < c);
    }
}
