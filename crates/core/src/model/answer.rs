use serde::{Deserialize, Serialize};
use std::fmt;

/// A learner's answer, or a task's correct answer.
///
/// `Text` covers fill-gap and multiple-choice tasks (the latter holds the
/// 1-based option index as text). `Sequence` is the ordered word list of a
/// word-order task. Deserializes from a plain JSON string or array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Sequence(Vec<String>),
}

impl AnswerValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub fn sequence<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Sequence(words.into_iter().map(Into::into).collect())
    }

    /// Blank text or an empty sequence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Text(text) => text.trim().is_empty(),
            AnswerValue::Sequence(words) => words.is_empty(),
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            AnswerValue::Sequence(_) => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&[String]> {
        match self {
            AnswerValue::Text(_) => None,
            AnswerValue::Sequence(words) => Some(words),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Text(text) => f.write_str(text),
            AnswerValue::Sequence(words) => f.write_str(&words.join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_and_empty_sequence_are_empty() {
        assert!(AnswerValue::text("   ").is_empty());
        assert!(AnswerValue::Sequence(Vec::new()).is_empty());
        assert!(!AnswerValue::text("am").is_empty());
        assert!(!AnswerValue::sequence(["a"]).is_empty());
    }

    #[test]
    fn deserializes_untagged_json() {
        let text: AnswerValue = serde_json::from_str("\"2\"").unwrap();
        assert_eq!(text, AnswerValue::text("2"));

        let seq: AnswerValue = serde_json::from_str(r#"["Do", "you"]"#).unwrap();
        assert_eq!(seq, AnswerValue::sequence(["Do", "you"]));
    }

    #[test]
    fn display_joins_sequence_with_spaces() {
        let seq = AnswerValue::sequence(["She", "plays", "the", "piano"]);
        assert_eq!(seq.to_string(), "She plays the piano");
    }
}
