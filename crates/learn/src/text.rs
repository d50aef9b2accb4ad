//! Text normalization
//!
//! The same function runs at training time (Transformation stage) and at
//! inference time, so the two can never drift apart.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("valid URL pattern"));

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digit pattern"));

/// English stop words
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
        "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
        "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
        "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
        "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
        "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
        "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
        "with", "about", "against", "between", "into", "through", "during", "before", "after",
        "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
        "again", "further", "then", "once", "here", "there", "when", "where", "why", "how",
        "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
        "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can",
        "will", "just", "don", "don't", "should", "should've", "now", "d", "ll", "m", "o", "re",
        "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn",
        "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma",
        "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
        "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
        "wouldn't",
    ]
    .into_iter()
    .collect()
});

/// Irregular plurals and `-ies` words whose singular keeps the `ie`
const PLURAL_EXCEPTIONS: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("zombies", "zombie"),
    ("rookies", "rookie"),
    ("series", "series"),
    ("species", "species"),
];

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Reduce a plural noun to its singular form.
///
/// Light rule set: irregular exceptions, `-sses`, `-ies`, sibilant `-es`, and
/// a trailing `-s` not preceded by `s`, `u` or `i`.
pub fn lemmatize(word: &str) -> String {
    if let Some((_, singular)) = PLURAL_EXCEPTIONS.iter().find(|(plural, _)| *plural == word) {
        return (*singular).to_string();
    }
    if word.chars().count() <= 3 {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("sses") {
        return format!("{stem}ss");
    }
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in ["xes", "ches", "shes", "zzes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with('s') && !["ss", "us", "is"].iter().any(|end| word.ends_with(end)) {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Normalize one raw text.
///
/// Steps, in order: strip URLs, strip digits, lowercase, ASCII punctuation to
/// space, strip the Arabic semicolon, collapse whitespace, drop stop words,
/// lemmatize. May return an empty string.
pub fn normalize(text: &str) -> String {
    let text = URL_RE.replace_all(text, "");
    let text = DIGITS_RE.replace_all(&text, "");
    let text: String = text
        .to_lowercase()
        .chars()
        .filter(|c| *c != '\u{061B}')
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();

    text.split_whitespace()
        .filter(|w| !is_stopword(w))
        .map(lemmatize)
        .collect::<Vec<_>>()
        .join(" ")
}
