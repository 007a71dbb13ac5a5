//! Content blob construction.
//!
//! Categorical values become single tokens ("Christopher Nolan" turns into
//! "christopher_nolan") so a director's full name never matches another
//! person sharing a first name. The synopsis is appended as ordinary text.

use data_loader::Item;

/// Normalize one categorical value: trimmed, lower-cased, inner whitespace runs
/// replaced by `joiner`.
pub fn categorical_token(value: &str, joiner: char) -> String {
    let mut token = String::with_capacity(value.len());
    for word in value.split_whitespace() {
        if !token.is_empty() {
            token.push(joiner);
        }
        token.push_str(&word.to_lowercase());
    }
    token
}

/// Build the text representation of an item used for vectorization.
pub fn content_blob(item: &Item, joiner: char) -> String {
    let categorical = item
        .genres
        .iter()
        .chain(std::iter::once(&item.director))
        .chain(item.cast.iter())
        .map(|value| categorical_token(value, joiner))
        .filter(|token| !token.is_empty());

    let mut blob = String::new();
    for token in categorical {
        blob.push_str(&token);
        blob.push(' ');
    }
    blob.push_str(item.synopsis.trim());
    blob.trim_end().to_string()
}
