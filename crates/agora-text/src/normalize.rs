//! Query normalization: lowercase, tokenize, lemmatize, drop punctuation.

/// Irregular forms the suffix rules below cannot reach.
const IRREGULAR: &[(&str, &str)] = &[
  ("am", "be"),
  ("is", "be"),
  ("are", "be"),
  ("was", "be"),
  ("were", "be"),
  ("been", "be"),
  ("being", "be"),
  ("has", "have"),
  ("had", "have"),
  ("having", "have"),
  ("does", "do"),
  ("did", "do"),
  ("done", "do"),
  ("went", "go"),
  ("gone", "go"),
  ("children", "child"),
  ("people", "person"),
];

/// Consonants that get undoubled after stripping "ing"/"ed"
/// ("stopped" becomes "stop"). 'l' and 's' stay doubled ("telling" keeps
/// "tell").
const UNDOUBLE: &[char] = &['b', 'd', 'g', 'm', 'n', 'p', 'r', 't'];

fn is_vowel(c: char) -> bool { matches!(c, 'a' | 'e' | 'i' | 'o' | 'u') }

/// Reduce one lowercase token to a base form with a small rule table.
///
/// Deterministic and intentionally approximate: the output feeds substring
/// patterns and an embedding model, neither of which needs a perfect lemma.
fn lemmatize(token: &str) -> String {
  if let Some((_, lemma)) = IRREGULAR.iter().find(|(word, _)| *word == token) {
    return (*lemma).to_string();
  }

  // Plural nouns and third-person verb forms.
  if let Some(stem) = token.strip_suffix("ies") {
    if stem.len() >= 2 {
      return format!("{stem}y");
    }
  }
  if ["sses", "shes", "ches", "xes", "zes"]
    .iter()
    .any(|suffix| token.ends_with(suffix))
  {
    return token[..token.len() - 2].to_string();
  }
  if let Some(stem) = token.strip_suffix('s') {
    if stem.len() >= 3
      && !stem.ends_with('s')
      && !stem.ends_with('u')
      && !stem.ends_with('i')
    {
      return stem.to_string();
    }
  }

  // Progressive and simple-past forms, only when a real stem remains.
  for suffix in ["ing", "ed"] {
    if let Some(stem) = token.strip_suffix(suffix) {
      if stem.len() >= 3 && stem.chars().any(is_vowel) {
        return undouble(stem);
      }
    }
  }

  token.to_string()
}

fn undouble(stem: &str) -> String {
  let chars: Vec<char> = stem.chars().collect();
  if chars.len() >= 2 {
    let last = chars[chars.len() - 1];
    if last == chars[chars.len() - 2] && UNDOUBLE.contains(&last) {
      return chars[..chars.len() - 1].iter().collect();
    }
  }
  stem.to_string()
}

/// Normalize a raw query for the downstream resolution stages.
///
/// Lowercases, splits on whitespace, strips punctuation from token edges,
/// drops tokens that were punctuation-only, lemmatizes what remains, and
/// rejoins with single spaces. Empty input yields empty output.
pub fn normalize_query(query: &str) -> String {
  query
    .to_lowercase()
    .split_whitespace()
    .filter_map(|raw| {
      let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
      if token.is_empty() {
        None
      } else {
        Some(lemmatize(token))
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}
