//! Minimal, deterministic text normalization helpers.
//!
//! `match_key` is the word-equality key used by the snippet matcher; `cleanup` repairs the
//! punctuation spacing that scraped article text tends to come with.

use once_cell::sync::Lazy;
use regex::Regex;

/// Punctuation `cleanup` knows how to re-space.
const SUPPORTED_PUNCTUATION: [char; 4] = ['.', ',', '!', '?'];

static MISSING_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.,!?])([A-Z])").expect("static cleanup regex"));

/// Matching key for one word: lowercase, with every ASCII punctuation character removed.
///
/// Lossy on purpose: it decides equality only, never what gets displayed. Non-ASCII
/// punctuation (curly quotes, dashes) is kept.
pub fn match_key(display: &str) -> String {
    display
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect()
}

/// Repair punctuation spacing in scraped text.
///
/// - `"word . Next"` becomes `"word. Next"` (for `.`, `,`, `!`, `?`)
/// - `"word.Next"` becomes `"word. Next"` when an uppercase ASCII letter follows
pub fn cleanup(txt: &str) -> String {
    let mut out = txt.to_string();
    for c in SUPPORTED_PUNCTUATION {
        out = out.replace(&format!(" {c} "), &format!("{c} "));
    }
    MISSING_SPACE.replace_all(&out, "$1 $2").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice_text() -> String {
        r#"
“Perhaps it doesn’t understand English,” thought Alice; “I daresay it’s
a French mouse, come over with William the Conqueror.” (For, with all
her knowledge of history, Alice had no very clear notion how long ago
anything had happened.) So she began again: “Où est ma chatte?” which
was the first sentence in her French lesson-book. The Mouse gave a
sudden leap out of the water, and seemed to quiver all over with
fright. “Oh, I beg your pardon!” cried Alice hastily, afraid that she
had hurt the poor animal’s feelings. “I quite forgot you didn’t like
cats.”
"#
        .replace('\n', " ")
    }

    #[test]
    fn match_key_lowercases_and_strips_ascii_punctuation() {
        assert_eq!(match_key("Dog."), "dog");
        assert_eq!(match_key("(tubular)."), "tubular");
        assert_eq!(match_key("lesson-book"), "lessonbook");
        assert_eq!(match_key("..."), "");
        assert_eq!(match_key("“Oh,"), "“oh");
    }

    #[test]
    fn cleanup_leaves_normal_text_unchanged() {
        let t = alice_text();
        assert_eq!(cleanup(&t), t);
    }

    #[test]
    fn cleanup_fixes_missing_space_after_period() {
        let raw = alice_text().replace(
            "French lesson-book. The Mouse",
            "French lesson-book.The Mouse",
        );
        assert_eq!(cleanup(&raw), alice_text());
    }

    #[test]
    fn cleanup_fixes_missing_space_after_exclamation() {
        let exclaimative =
            alice_text().replace("anything had happened.)", "anything had happened!");
        let raw = exclaimative.replace(
            "anything had happened! So she",
            "anything had happened!So she",
        );
        assert_eq!(cleanup(&raw), exclaimative);
    }

    #[test]
    fn cleanup_removes_space_before_period() {
        let raw = alice_text().replace(
            "French lesson-book. The Mouse",
            "French lesson-book . The Mouse",
        );
        assert_eq!(cleanup(&raw), alice_text());
    }

    #[test]
    fn cleanup_does_not_split_lowercase_continuations() {
        assert_eq!(cleanup("v1.2 and e.g.this"), "v1.2 and e.g.this");
    }
}
