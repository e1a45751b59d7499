//! Property-based tests for message previews, paging and reactions

use chrono::Utc;
use proptest::prelude::*;
use uuid::Uuid;

use chatline::shared::messaging::message::{clamp_page_size, summarize_reactions, MAX_PAGE_SIZE};
use chatline::shared::messaging::{ChatMessage, Reaction, ReactionChange};

proptest! {
    #[test]
    fn test_preview_never_exceeds_limit(content in "\\PC{0,300}", max_len in 3usize..120) {
        let message = ChatMessage::new_text(Uuid::new_v4(), Uuid::new_v4(), content.clone());
        let preview = message.preview(max_len);
        prop_assert!(preview.chars().count() <= max_len);
        if content.chars().count() <= max_len {
            prop_assert_eq!(preview, content);
        } else {
            prop_assert!(preview.ends_with("..."));
        }
    }

    #[test]
    fn test_deleted_preview(content in ".*") {
        let mut message = ChatMessage::new_text(Uuid::new_v4(), Uuid::new_v4(), content);
        message.deleted = true;
        prop_assert_eq!(message.preview(40), "Message deleted");
    }

    #[test]
    fn test_page_size_in_bounds(limit in proptest::option::of(any::<u32>())) {
        let size = clamp_page_size(limit);
        prop_assert!((1..=MAX_PAGE_SIZE).contains(&size));
        if let Some(l) = limit {
            if (1..=MAX_PAGE_SIZE).contains(&l) {
                prop_assert_eq!(size, l);
            }
        }
    }

    #[test]
    fn test_summary_counts_every_reaction(emojis in prop::collection::vec("[👍🎉🔥❤]", 0..30)) {
        let reactions: Vec<Reaction> = emojis
            .iter()
            .map(|e| Reaction { user_id: Uuid::new_v4(), emoji: e.clone(), created_at: Utc::now() })
            .collect();
        let summary = summarize_reactions(&reactions);

        let total: usize = summary.iter().map(|c| c.count).sum();
        prop_assert_eq!(total, reactions.len());
        for pair in summary.windows(2) {
            prop_assert!(pair[0].count >= pair[1].count);
        }
        for entry in &summary {
            prop_assert_eq!(entry.count, entry.user_ids.len());
        }
    }

    #[test]
    fn test_reaction_change(existing in proptest::option::of("[ab]"), requested in "[ab]") {
        let change = ReactionChange::decide(existing.as_deref(), &requested);
        let expected = match existing {
            None => ReactionChange::Added,
            Some(ref e) if *e == requested => ReactionChange::Removed,
            Some(_) => ReactionChange::Replaced,
        };
        prop_assert_eq!(change, expected);
    }
}
