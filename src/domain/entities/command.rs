/// Predicate half of a command rule
///
/// Text triggers are evaluated against the trimmed message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Whole text equals the value
    Exact(&'static str),
    /// Whole text equals any of the values
    AnyOf(&'static [&'static str]),
    /// Text starts with the value
    Prefix(&'static str),
    /// First whitespace-delimited token is one of the values
    FirstToken(&'static [&'static str]),
    /// Sender is currently marked AFK; resolved against router state
    Away,
}

impl Trigger {
    /// Match a text trigger. `Away` never matches here.
    pub fn matches_text(&self, text: &str) -> bool {
        match self {
            Trigger::Exact(value) => text == *value,
            Trigger::AnyOf(values) => values.contains(&text),
            Trigger::Prefix(prefix) => text.starts_with(prefix),
            Trigger::FirstToken(values) => text
                .split_whitespace()
                .next()
                .map(|token| values.contains(&token))
                .unwrap_or(false),
            Trigger::Away => false,
        }
    }

    pub fn is_away(&self) -> bool {
        matches!(self, Trigger::Away)
    }
}
