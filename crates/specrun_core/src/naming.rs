//! Split method names into words and derive human-readable labels from them.
//!
//! Both helpers are pure and deterministic. Labels are for reporting only; nothing in resolution or execution
//! depends on them.

use crate::roles::is_role_keyword;

/// Split a method name into its words.
///
/// Words are separated by `_` (or any other non-alphanumeric character) and by lower→upper camel-case
/// boundaries. Empty words are dropped.
///
/// ## Examples
/// ```rust
/// use specrun_core::naming::split_words;
///
/// assert_eq!(split_words("it_should_work"), vec!["it", "should", "work"]);
/// assert_eq!(split_words("itShouldWork"), vec!["it", "Should", "Work"]);
/// ```
pub fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for ch in name.chars() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        let boundary = ch.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
        prev = Some(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Lowercase a word and drop trailing ASCII digits (`Cleanup2` → `cleanup`).
pub fn normalize_word(word: &str) -> String {
    word.trim_end_matches(|c: char| c.is_ascii_digit()).to_lowercase()
}

fn is_acronym(word: &str) -> bool {
    word.chars().count() > 1 && word.chars().all(|c| !c.is_lowercase())
}

/// Build the human-readable label for a method name.
///
/// Separators become spaces, words are lowercased (acronyms keep their case), and leading role-indicating
/// words (`it`, `should`, `when`, ...) are stripped. A name made only of role words keeps all of them.
///
/// ## Examples
/// ```rust
/// use specrun_core::naming::readable_label;
///
/// assert_eq!(readable_label("it_should_return_five"), "return five");
/// assert_eq!(readable_label("shouldParseJSON"), "parse JSON");
/// assert_eq!(readable_label("it"), "it");
/// ```
pub fn readable_label(name: &str) -> String {
    let words: Vec<String> = split_words(name)
        .into_iter()
        .map(|w| if is_acronym(&w) { w } else { w.to_lowercase() })
        .collect();

    let first_plain = words.iter().position(|w| !is_role_keyword(w));
    let kept = match first_plain {
        Some(index) => &words[index..],
        None => &words[..],
    };
    kept.join(" ")
}
