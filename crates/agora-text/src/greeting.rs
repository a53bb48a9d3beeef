//! Small-talk detection that short-circuits the resolution pipeline.

/// Phrases treated as greetings when present anywhere in the query.
const GREETINGS: &[&str] = &[
  "hi",
  "hello",
  "hey",
  "greetings",
  "good morning",
  "good evening",
];

/// True iff the query contains any greeting phrase as a substring,
/// case-insensitively. Substring semantics are deliberate: "hey there"
/// greets, and so does "well hello!".
pub fn is_greeting(query: &str) -> bool {
  let lowered = query.to_lowercase();
  GREETINGS.iter().any(|greeting| lowered.contains(greeting))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bare_greetings_match() {
    for query in ["hi", "Hello", "HEY", "greetings", "Good morning", "good evening"] {
      assert!(is_greeting(query), "{query:?} should greet");
    }
  }

  #[test]
  fn greeting_inside_a_sentence_matches() {
    assert!(is_greeting("hey there"));
    assert!(is_greeting("well hello, bot"));
  }

  #[test]
  fn substring_semantics_are_aggressive() {
    // "machine" contains "hi"; the detector is substring-based on purpose.
    assert!(is_greeting("machine"));
  }

  #[test]
  fn plain_questions_do_not_match() {
    assert!(!is_greeting("tell me about case 3"));
    assert!(!is_greeting("what about collaborative governance?"));
  }
}
