//! Comment moderation
//!
//! A comment is rejected when its text contains any configured banned
//! word anywhere, regardless of case. Matching is plain substring
//! search, so "badword" also catches "badwords".

/// Find the first banned word occurring in `text`.
///
/// Returns the matched word, or `None` when the text is clean.
pub fn find_banned_word<'a>(text: &str, banned_words: &'a [String]) -> Option<&'a str> {
    let lowered = text.to_lowercase();
    banned_words
        .iter()
        .find(|word| !word.is_empty() && lowered.contains(&word.to_lowercase()))
        .map(|word| word.as_str())
}
