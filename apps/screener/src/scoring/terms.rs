//! Bounded term matching over normalized text.
//!
//! A term matches only where the characters on both sides are not ASCII
//! alphanumeric. Punctuation inside a term ("node.js", "m.s.") is matched
//! literally, which plain `\b` regexes get wrong.

/// Returns true if `term` occurs in `text` as a bounded term.
pub fn contains_term(text: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    text.match_indices(term).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !is_word_char(before) && !is_word_char(after)
    })
}

/// Returns the first term of `terms` present in `text`, in list order.
pub fn first_present<'a>(text: &str, terms: &'a [String]) -> Option<&'a str> {
    terms
        .iter()
        .map(String::as_str)
        .find(|term| contains_term(text, term))
}

/// Returns every term of `terms` present in `text`, in list order, each once.
pub fn all_present(text: &str, terms: &[String]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for term in terms {
        if !found.contains(term) && contains_term(text, term) {
            found.push(term.clone());
        }
    }
    found
}

fn is_word_char(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_ascii_alphanumeric())
}
