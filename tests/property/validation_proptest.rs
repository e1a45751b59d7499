//! Property-based tests for input validation
//!
//! Uses proptest to generate random usernames, message bodies and emoji

use proptest::prelude::*;
use chatline::shared::messaging::message::{validate_content, validate_emoji, MAX_EMOJI_LEN, MAX_MESSAGE_LEN};
use chatline::shared::messaging::user::validate_username;

proptest! {
    #[test]
    fn test_well_formed_usernames_accepted(name in "[a-zA-Z][a-zA-Z0-9_]{2,29}") {
        prop_assert!(validate_username(&name).is_ok());
    }

    #[test]
    fn test_usernames_starting_with_non_letter_rejected(name in "[0-9_][a-zA-Z0-9_]{2,29}") {
        prop_assert!(validate_username(&name).is_err());
    }

    #[test]
    fn test_usernames_with_other_characters_rejected(
        head in "[a-z]{2,10}",
        bad in "[ .@!#-]",
        tail in "[a-z]{0,10}",
    ) {
        let name = format!("{}{}{}", head, bad, tail);
        prop_assert!(validate_username(&name).is_err());
    }

    #[test]
    fn test_content_is_trimmed(body in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,200}", pad in " {0,5}") {
        let input = format!("{}{}{}", pad, body, pad);
        let content = validate_content(&input).unwrap();
        prop_assert_eq!(content, body.trim());
    }

    #[test]
    fn test_blank_content_rejected(blank in "[ \t\n]{0,20}") {
        prop_assert!(validate_content(&blank).is_err());
    }

    #[test]
    fn test_content_length_limit_counts_characters(extra in 1usize..50) {
        let at_limit = "é".repeat(MAX_MESSAGE_LEN);
        prop_assert!(validate_content(&at_limit).is_ok());
        let over = "é".repeat(MAX_MESSAGE_LEN + extra);
        prop_assert!(validate_content(&over).is_err());
    }

    #[test]
    fn test_emoji_length(emoji in "\\PC{1,40}") {
        let trimmed = emoji.trim();
        let ok = !trimmed.is_empty() && trimmed.chars().count() <= MAX_EMOJI_LEN;
        prop_assert_eq!(validate_emoji(&emoji).is_ok(), ok);
    }
}
