// Nickname sanitization - turns arbitrary text into something safe to set as a
// Discord nickname.
//
// The output never contains markup characters, mention triggers, control or
// combining characters, and never exceeds the requested length. An empty
// result means "no usable name".

use fancy_regex::Regex;
use std::sync::OnceLock;
use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_normalization::UnicodeNormalization;

fn broadcast_mention() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)@(?:here|everyone)").expect("valid pattern"))
}

/// `<@123>` / `<@!123>`. The brackets are optional because markup stripping
/// runs first and leaves `@123456789012345678` behind; only snowflake-length
/// ids are removed so short names like `@42` survive.
fn user_mention() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<?@!?\d{15,21}>?").expect("valid pattern"))
}

fn is_invisible_joiner(ch: char) -> bool {
    matches!(
        ch,
        '\u{FE00}'..='\u{FE0F}'          // variation selectors
            | '\u{E0100}'..='\u{E01EF}'  // variation selectors supplement
            | '\u{200B}'                 // zero width space
            | '\u{200D}'                 // zero width joiner
    )
}

fn is_other_category(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
    )
}

/// Remove every occurrence of `pattern`, repeating until nothing matches so
/// that nested tokens like `@he@herere` cannot reassemble.
fn remove_all(pattern: &Regex, input: String) -> String {
    let mut current = input;
    loop {
        let next = pattern.replace_all(&current, "").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_pass(input: &str, max_length: usize) -> String {
    // 1. markup characters
    let s: String = input
        .chars()
        .filter(|c| !matches!(c, '`' | '<' | '>'))
        .collect();

    // 2-3. mentions
    let s = remove_all(broadcast_mention(), s);
    let s = remove_all(user_mention(), s);

    // 4-5. decompose, then drop control/format and combining characters
    let s: String = s
        .nfkd()
        .filter(|&c| !is_other_category(c))
        .filter(|&c| get_general_category(c) != GeneralCategory::NonspacingMark)
        .filter(|&c| !is_invisible_joiner(c))
        .collect();

    // 6. whitespace
    let s = s.split_whitespace().collect::<Vec<_>>().join(" ");

    // 7. length
    if s.chars().count() > max_length {
        s.chars()
            .take(max_length)
            .collect::<String>()
            .trim_end()
            .to_string()
    } else {
        s
    }
}

/// Sanitize `raw` into a nickname of at most `max_length` characters.
///
/// Passes are repeated until the output is stable. Decomposition can turn a
/// fullwidth `＜` into `<`, and dropping a zero-width character can glue an
/// `@here` back together, so one pass alone is not idempotent.
pub fn sanitize(raw: &str, max_length: usize) -> String {
    let mut current = sanitize_pass(raw, max_length);
    loop {
        let next = sanitize_pass(&current, max_length);
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ign::MAX_NICKNAME_LENGTH;

    fn clean(raw: &str) -> String {
        sanitize(raw, MAX_NICKNAME_LENGTH)
    }

    #[test]
    fn test_plain_name_is_unchanged() {
        assert_eq!(clean("Shadow99"), "Shadow99");
    }

    #[test]
    fn test_markup_characters_removed() {
        assert_eq!(clean("`<Rhino>`"), "Rhino");
    }

    #[test]
    fn test_broadcast_mentions_removed() {
        assert_eq!(clean("Loki @EVERYONE prime @here"), "Loki prime");
    }

    #[test]
    fn test_user_mentions_removed() {
        assert_eq!(clean("Nova <@!123456789012345678>"), "Nova");
        assert_eq!(clean("<@123456789012345678> Nova"), "Nova");
    }

    #[test]
    fn test_short_at_numbers_survive() {
        assert_eq!(clean("Player@42"), "Player@42");
    }

    #[test]
    fn test_combining_marks_and_controls_dropped() {
        assert_eq!(clean("Ze\u{301}phyr\u{0007}"), "Zephyr");
        assert_eq!(clean("Éclair"), "Eclair");
    }

    #[test]
    fn test_invisible_characters_dropped() {
        assert_eq!(clean("Ga\u{200B}ra\u{200D}\u{FE0F}"), "Gara");
    }

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        assert_eq!(clean("  Ivara   \t  Prime  "), "Ivara Prime");
    }

    #[test]
    fn test_truncated_to_max_length() {
        let long = "Octavia ".repeat(10);
        let out = clean(&long);
        assert!(out.chars().count() <= MAX_NICKNAME_LENGTH);
        assert!(!out.ends_with(' '));
        assert!(out.starts_with("Octavia Octavia"));
    }

    #[test]
    fn test_custom_max_length() {
        assert_eq!(sanitize("Valkyr", 3), "Val");
    }

    #[test]
    fn test_only_junk_becomes_empty() {
        assert_eq!(clean("@here <> `` \u{200B}"), "");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn test_reassembled_tokens_removed() {
        assert_eq!(clean("@he@herere"), "");
        assert_eq!(clean("@h\u{200B}ere Oberon"), "Oberon");
        assert_eq!(clean("\u{FF1C}Wisp\u{FF1E}"), "Wisp");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Shadow99",
            "  Ze\u{301}phyr  <@!123456789012345678> ",
            "@h\u{200B}ere Oberon",
            "\u{FF1C}Wisp\u{FF1E}",
            "ﬃ ligature name that is rather long indeed",
            "`Nekros` @everyone\n\tPrime",
            "Équinox   ",
        ];

        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_never_contains_markup() {
        let samples = ["<<a>>", "``b``", "\u{FF1C}c\u{FF1E}", "<@!1>"];
        for sample in samples {
            let out = clean(sample);
            assert!(!out.contains('<') && !out.contains('>') && !out.contains('`'));
        }
    }
}
