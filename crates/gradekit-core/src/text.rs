//! Text normalization pipeline.
//!
//! Turns raw (possibly HTML-bearing) answer text into a canonical form:
//! markup stripped, ASCII letters only, lowercased, stopwords removed, and
//! each remaining token reduced to a lemma. Every downstream component —
//! the vectorizer, the keyword matcher, both engines — consumes this form.
//!
//! The pipeline never fails: empty or missing text normalizes to an empty
//! string, and `normalize(normalize(x)) == normalize(x)` holds for all `x`.

use std::collections::HashSet;
use std::sync::LazyLock;

/// English stopword set. Apostrophe forms ("don't", "isn't") are omitted
/// because tokens never contain punctuation by the time they are checked.
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "ain", "all", "am", "an", "and",
        "any", "are", "aren", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "couldn", "d", "did", "didn", "do", "does",
        "doesn", "doing", "don", "down", "during", "each", "few", "for", "from", "further",
        "had", "hadn", "has", "hasn", "have", "haven", "having", "he", "her", "here", "hers",
        "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "isn", "it",
        "its", "itself", "just", "ll", "m", "ma", "me", "mightn", "more", "most", "mustn", "my",
        "myself", "needn", "no", "nor", "not", "now", "o", "of", "off", "on", "once", "only",
        "or", "other", "our", "ours", "ourselves", "out", "over", "own", "re", "s", "same",
        "shan", "she", "should", "shouldn", "so", "some", "such", "t", "than", "that", "the",
        "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
        "those", "through", "to", "too", "under", "until", "up", "ve", "very", "was", "wasn",
        "we", "were", "weren", "what", "when", "where", "which", "while", "who", "whom", "why",
        "will", "with", "won", "wouldn", "y", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Remove markup tags (`<...>` spans). An unmatched `<` or an empty `<>`
/// is kept literally, matching the tag pattern `<[^>]+>`.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('>') {
            Some(end) if end > 0 => rest = &after[end + 1..],
            _ => {
                out.push('<');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Normalize raw text into the canonical comparison form.
///
/// Steps, in order: strip markup, drop every character that is not an
/// ASCII letter or whitespace, lowercase, split on whitespace, drop
/// stopwords, lemmatize, and rejoin with single spaces. Stopwords are
/// filtered again after lemmatization so that repeated normalization is
/// stable (a lemma can land on a stopword, e.g. "theses" -> "these").
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let stripped = strip_markup(text);
    let filtered: String = stripped
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let lemmas: Vec<String> = filtered
        .split_whitespace()
        .filter(|token| !STOP_WORDS.contains(*token))
        .map(lemmatize)
        .filter(|lemma| !STOP_WORDS.contains(lemma.as_str()))
        .collect();

    lemmas.join(" ")
}

/// Count the words of a text with markup stripped but nothing else removed.
/// This is the count the word-limit penalty is judged against.
pub fn word_count(text: &str) -> usize {
    strip_markup(text).split_whitespace().count()
}

/// Reduce a token to its lemma with ordered suffix rules, applied to a
/// fixed point so that repeated normalization is stable.
fn lemmatize(token: &str) -> String {
    let mut current = token.to_string();
    loop {
        let next = lemmatize_step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn lemmatize_step(token: &str) -> String {
    let n = token.len();
    if n <= 3 {
        return token.to_string();
    }
    if let Some(stem) = token.strip_suffix("sses") {
        return format!("{stem}ss");
    }
    if let Some(stem) = token.strip_suffix("ches") {
        return format!("{stem}ch");
    }
    if let Some(stem) = token.strip_suffix("shes") {
        return format!("{stem}sh");
    }
    if let Some(stem) = token.strip_suffix("xes") {
        return format!("{stem}x");
    }
    if let Some(stem) = token.strip_suffix("zes") {
        return format!("{stem}z");
    }
    if n > 4 {
        if let Some(stem) = token.strip_suffix("ies") {
            return format!("{stem}y");
        }
        if let Some(stem) = token.strip_suffix("ves") {
            return format!("{stem}f");
        }
    }
    if let Some(stem) = token.strip_suffix("men") {
        return format!("{stem}man");
    }
    if token.ends_with('s')
        && !token.ends_with("ss")
        && !token.ends_with("us")
        && !token.ends_with("is")
    {
        return token[..n - 1].to_string();
    }
    token.to_string()
}

/// Remove double-quoted passages, leaving a single space in their place.
/// An unmatched opening quote is kept, since it does not delimit a quote.
pub fn strip_quoted(text: &str) -> String {
    const OPENERS: [char; 2] = ['"', '\u{201c}'];
    const CLOSERS: [char; 2] = ['"', '\u{201d}'];

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(OPENERS) {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        let opener_len = after.chars().next().map(char::len_utf8).unwrap_or(1);
        let body = &after[opener_len..];
        match body.find(CLOSERS) {
            Some(end) => {
                let closer_len = body[end..].chars().next().map(char::len_utf8).unwrap_or(1);
                out.push(' ');
                rest = &body[end + closer_len..];
            }
            None => {
                out.push_str(after);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Truncate everything from a references/bibliography heading onward.
/// The heading must stand on its own line, optionally with a trailing colon.
pub fn strip_references(text: &str) -> String {
    const HEADINGS: [&str; 3] = ["references", "bibliography", "works cited"];

    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let heading = strip_markup(line);
        let heading = heading.trim().trim_end_matches(':').to_lowercase();
        if HEADINGS.contains(&heading.as_str()) {
            return text[..offset].to_string();
        }
        offset += line.len();
    }
    text.to_string()
}

/// Flesch reading ease over the markup-stripped text, clamped to [0, 100].
/// Empty text scores 0.
pub fn readability_score(text: &str) -> f64 {
    let plain = strip_markup(text);
    let words: Vec<&str> = plain.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }

    let sentences = plain
        .split(['.', '!', '?'])
        .filter(|part| part.split_whitespace().next().is_some())
        .count()
        .max(1);
    let syllables: usize = words.iter().map(|word| count_syllables(word)).sum();

    let words_per_sentence = words.len() as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;

    (206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word).clamp(0.0, 100.0)
}

/// Count syllables as vowel groups, with a silent final 'e' discounted.
/// Every word with at least one letter counts at least one syllable.
fn count_syllables(word: &str) -> usize {
    let letters: String = word
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if letters.is_empty() {
        return 0;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut count = 0;
    let mut prev_vowel = false;
    for c in letters.chars() {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }

    if count > 1 && letters.ends_with('e') && !letters.ends_with("le") {
        count -= 1;
    }
    count.max(1)
}
