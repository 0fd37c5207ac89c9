/// Tri-state optional text cell.
///
/// A column missing from the payload is `Absent`; a column that exists but
/// holds only whitespace is `Empty`; anything else is `Value` with the
/// surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldCell {
    #[default]
    Absent,
    Empty,
    Value(String),
}

impl FieldCell {
    /// Decode a raw cell; `None` means the column was not supplied at all
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => FieldCell::Absent,
            Some(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    FieldCell::Empty
                } else {
                    FieldCell::Value(trimmed.to_string())
                }
            }
        }
    }

    pub fn value(text: impl Into<String>) -> Self {
        FieldCell::from_raw(Some(&text.into()))
    }

    pub fn is_present(&self) -> bool {
        matches!(self, FieldCell::Value(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldCell::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldCell::Value(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            FieldCell::Value(text) => Some(text),
            _ => None,
        }
    }

    /// Split a present cell on `separator`, trimming every part.
    ///
    /// Returns an empty list for `Absent` and `Empty`.
    pub fn split(&self, separator: char) -> Vec<String> {
        match self {
            FieldCell::Value(text) => text.split(separator).map(|p| p.trim().to_string()).collect(),
            _ => Vec::new(),
        }
    }
}
