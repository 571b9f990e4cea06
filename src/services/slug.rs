//! Slug derivation
//!
//! Derives URL-safe slugs from note titles. Cyrillic characters are
//! transliterated to Latin, everything else is lowercased, and runs of
//! non-alphanumeric characters collapse into single hyphens. The result
//! is truncated to the database column limit.

/// Maximum slug length, matching the `notes.slug` column
pub const SLUG_MAX_LEN: usize = 100;

/// Derive a slug from a title.
///
/// The derivation is deterministic: the same title always yields the
/// same slug. Characters with no transliteration are dropped.
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    let mut prev_hyphen = false;

    for c in title.chars().flat_map(|c| c.to_lowercase()) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            prev_hyphen = false;
        } else if let Some(tr) = transliterate(c) {
            slug.push_str(tr);
            prev_hyphen = false;
        } else if !prev_hyphen && !slug.is_empty() {
            // Separator or unknown character: at most one hyphen in a row
            slug.push('-');
            prev_hyphen = true;
        }
    }

    // Trim a trailing hyphen left by separators at the end
    while slug.ends_with('-') {
        slug.pop();
    }

    truncate_slug(slug)
}

/// Truncate a slug to `SLUG_MAX_LEN`, dropping any hyphen the cut
/// leaves dangling.
fn truncate_slug(mut slug: String) -> String {
    if slug.len() > SLUG_MAX_LEN {
        slug.truncate(SLUG_MAX_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

/// Transliterate a lowercase Cyrillic character to Latin.
///
/// Returns `None` for characters outside the table.
fn transliterate(c: char) -> Option<&'static str> {
    let tr = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "c",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' => "",
        'ы' => "y",
        'ь' => "",
        'э' => "e",
        'ю' => "ju",
        'я' => "ja",
        _ => return None,
    };
    Some(tr)
}
