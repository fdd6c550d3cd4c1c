//! Property-based tests for message formatting

use super::*;
use proptest::prelude::*;

fn arb_word() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,12}"
}

/// Arbitrary text without markdown delimiters or newlines
fn arb_plain() -> impl Strategy<Value = String> {
    "[^*\n]{0,60}"
}

proptest! {
    #[test]
    fn output_never_contains_raw_angle_brackets_from_input(s in arb_plain()) {
        let out = format_message(&s);
        prop_assert!(!out.contains('<'));
        prop_assert!(!out.contains('>'));
    }

    #[test]
    fn plain_text_is_only_escaped(s in arb_plain()) {
        prop_assert_eq!(format_message(&s), escape_html(&s));
    }

    #[test]
    fn disjoint_spans_compose_in_any_order(a in arb_word(), b in arb_word()) {
        let strong = format!("<strong>{a}</strong>");
        let em = format!("<em>{b}</em>");

        prop_assert_eq!(
            format_message(&format!("**{a}** *{b}*")),
            format!("{strong} {em}")
        );
        prop_assert_eq!(
            format_message(&format!("*{b}* **{a}**")),
            format!("{em} {strong}")
        );
    }

    #[test]
    fn each_newline_becomes_one_break(lines in prop::collection::vec(arb_word(), 1..6)) {
        let out = format_message(&lines.join("\n"));
        prop_assert_eq!(out.matches("<br>").count(), lines.len() - 1);
        prop_assert!(!out.contains('\n'));
    }

    #[test]
    fn formatting_is_deterministic(s in "\\PC{0,80}") {
        prop_assert_eq!(format_message(&s), format_message(&s));
    }
}
