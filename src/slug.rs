//! Title to filename/URL slug.

use regex::Regex;
use std::sync::OnceLock;

struct SlugRules {
    ampersand: Regex,
    separators: Regex,
    non_word: Regex,
    dash_runs: Regex,
    leading: Regex,
    trailing: Regex,
}

fn rules() -> &'static SlugRules {
    static RULES: OnceLock<SlugRules> = OnceLock::new();
    RULES.get_or_init(|| SlugRules {
        ampersand: Regex::new(r"&(amp;)?").unwrap(),
        // ASCII whitespace only; other spaces fall to `non_word`.
        separators: Regex::new(r"[ \t\n\x0B\x0C\r./\\]+").unwrap(),
        // ASCII word characters only; anything else is dropped.
        non_word: Regex::new(r"[^A-Za-z0-9_-]").unwrap(),
        dash_runs: Regex::new(r"[-_]{2,}").unwrap(),
        leading: Regex::new(r"^[-_]").unwrap(),
        trailing: Regex::new(r"[-_]$").unwrap(),
    })
}

fn is_strip_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r' | '\0')
}

/// Lowercase, hyphen-separated slug of `title`. Titles made only of
/// punctuation produce an empty slug.
pub fn slugify(title: &str) -> String {
    let r = rules();
    let s = title.trim_matches(is_strip_space).to_lowercase();
    let s = r.ampersand.replace_all(&s, " and ");
    let s = r.separators.replace_all(&s, "-");
    let s = r.non_word.replace_all(&s, "");
    let s = r.dash_runs.replace_all(&s, "-");
    let s = r.leading.replace(&s, "");
    let s = r.trailing.replace(&s, "");
    s.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_title() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust 2024 Edition  "), "rust-2024-edition");
    }

    #[test]
    fn ampersand_and_entity_become_and() {
        assert_eq!(slugify("Salt & Pepper"), "salt-and-pepper");
        assert_eq!(slugify("Salt &amp; Pepper"), "salt-and-pepper");
        assert_eq!(slugify("R&D"), "r-and-d");
    }

    #[test]
    fn path_like_separators() {
        assert_eq!(slugify("v1.2/notes\\draft"), "v1-2-notes-draft");
    }

    #[test]
    fn runs_collapse_and_edges_strip_once() {
        assert_eq!(slugify("a -- b __ c"), "a-b-c");
        assert_eq!(slugify("_private_"), "private");
        assert_eq!(slugify("--- dashes ---"), "dashes");
    }

    #[test]
    fn underscores_survive_alone() {
        assert_eq!(slugify("snake_case title"), "snake_case-title");
    }

    #[test]
    fn non_ascii_letters_are_dropped() {
        assert_eq!(slugify("Café Crème"), "caf-crme");
    }

    #[test]
    fn only_ascii_whitespace_separates() {
        assert_eq!(slugify("a\u{a0}b"), "ab");
        assert_eq!(slugify("\u{a0}Title\u{2003}"), "title");
        assert_eq!(slugify("\tTabbed\x0Bvertical\x0Cfeed\r\n"), "tabbed-vertical-feed");
    }

    #[test]
    fn degenerate_titles_give_empty_slug() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("?!*"), "");
        assert_eq!(slugify("-"), "");
    }

    #[test]
    fn alphanumeric_titles_are_url_safe() {
        for title in ["Hello World", "ABC 123 xyz", "  Mixed   Case  Words ", "x"] {
            let slug = slugify(title);
            assert!(!slug.is_empty(), "{title:?}");
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "{title:?} -> {slug:?}"
            );
        }
    }

    #[test]
    fn slugify_is_idempotent() {
        for title in [
            "Hello, World!",
            "Salt &amp; Pepper",
            "_private_",
            "a -- b __ c",
            "snake_case title",
            "v1.2/notes\\draft",
            "?!*",
        ] {
            let once = slugify(title);
            assert_eq!(slugify(&once), once, "{title:?}");
        }
    }
}
