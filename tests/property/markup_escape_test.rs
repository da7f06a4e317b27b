//! Property-based tests for HTML escaping and the character counter.

use goodnews::ui::markup::{char_counter, escape_html, escape_url};
use proptest::prelude::*;

/// Undoes `escape_html`; used only to check nothing is lost.
fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

proptest! {
    /// Escaped text contains no raw markup characters.
    #[test]
    fn escaped_has_no_markup(s in any::<String>()) {
        let out = escape_html(&s);
        prop_assert!(!out.contains('<'));
        prop_assert!(!out.contains('>'));
        prop_assert!(!out.contains('"'));
        prop_assert!(!out.contains('\''));
    }

    /// Escaping is lossless.
    #[test]
    fn escaping_is_reversible(s in any::<String>()) {
        prop_assert_eq!(unescape(&escape_html(&s)), s);
    }

    /// Script URLs never reach an attribute, in any letter case.
    #[test]
    fn script_urls_are_dropped(body in "[a-z0-9()]{0,20}", upper in any::<bool>()) {
        let scheme = if upper { "JavaScript:" } else { "javascript:" };
        prop_assert_eq!(escape_url(&format!("{}{}", scheme, body)), "#");
    }

    /// The counter counts characters, not bytes.
    #[test]
    fn counter_counts_chars(s in "\\PC{0,60}", max in 1usize..2000) {
        prop_assert_eq!(char_counter(&s, max), format!("{}/{}", s.chars().count(), max));
    }
}
