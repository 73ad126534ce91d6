//! Hashtag extraction from message text.
//!
//! Pure text parsing; no store access. A hashtag is a `#` followed by a
//! maximal run of tag characters (letters including extended Latin, digits,
//! underscore, hyphen), where the `#` is not glued to the end of a word -
//! so `a#notatag` yields nothing.

use regex::Regex;

/// Characters allowed inside a hashtag token.
fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c == '-'
        || ('\u{C0}'..='\u{D6}').contains(&c)
        || ('\u{D8}'..='\u{F6}').contains(&c)
        || ('\u{F8}'..='\u{FF}').contains(&c)
}

/// Extracts hashtag tokens from raw message text, `#` prefix stripped,
/// in order of appearance.
///
/// Tokens are returned exactly as written; duplicates are kept and case is
/// preserved. Deduplication happens when tokens are resolved against the
/// store, which treats names case-insensitively.
///
/// # Examples
///
/// ```
/// use tweeteur::hashtags::extract_hashtags;
///
/// assert_eq!(extract_hashtags("hi #Foo-bar and #a1"), vec!["Foo-bar", "a1"]);
/// assert!(extract_hashtags("a#notatag").is_empty());
/// ```
pub fn extract_hashtags(text: &str) -> Vec<String> {
    // The trailing boundary is enforced by the greedy run itself; the leading
    // boundary is checked against the preceding character since the regex
    // engine has no lookbehind.
    let Ok(re) = Regex::new(r"#([0-9A-Za-zÀ-ÖØ-öø-ÿ_-]+)") else {
        return Vec::new();
    };

    let mut hashtags = Vec::new();
    for captures in re.captures_iter(text) {
        let full = captures.get(0).expect("match always has group 0");

        let preceded_by_word = text[..full.start()]
            .chars()
            .next_back()
            .map(is_tag_char)
            .unwrap_or(false);
        if preceded_by_word {
            continue;
        }

        if let Some(token) = captures.get(1) {
            hashtags.push(token.as_str().to_string());
        }
    }

    hashtags
}
