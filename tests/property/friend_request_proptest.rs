//! Property-based tests for friend request state transitions

use chrono::Utc;
use proptest::prelude::*;
use uuid::Uuid;

use chatline::shared::messaging::{FriendRequest, FriendRequestStatus};

fn status() -> impl Strategy<Value = FriendRequestStatus> {
    prop_oneof![
        Just(FriendRequestStatus::Pending),
        Just(FriendRequestStatus::Accepted),
        Just(FriendRequestStatus::Rejected),
        Just(FriendRequestStatus::Cancelled),
    ]
}

fn request() -> FriendRequest {
    FriendRequest::new(Uuid::new_v4(), Uuid::new_v4(), "alice".into(), "bob".into())
}

proptest! {
    #[test]
    fn test_only_pending_leaves_its_state(steps in prop::collection::vec(status(), 1..8)) {
        let mut req = request();
        let mut accepted = 0;
        for next in steps {
            let was_pending = req.is_pending();
            let result = req.transition(next, Utc::now());
            let allowed = was_pending && next != FriendRequestStatus::Pending;
            prop_assert_eq!(result.is_ok(), allowed);
            if allowed {
                accepted += 1;
                prop_assert_eq!(req.status, next);
                prop_assert!(req.responded_at.is_some());
            }
        }
        // At most one transition ever succeeds
        prop_assert!(accepted <= 1);
    }

    #[test]
    fn test_status_string_round_trip(s in status()) {
        prop_assert_eq!(FriendRequestStatus::from_str(s.as_str()), Some(s));
    }

    #[test]
    fn test_counterpart_is_the_other_side(flip in any::<bool>()) {
        let req = request();
        let (me, other) = if flip {
            (req.from_user_id, req.to_user_id)
        } else {
            (req.to_user_id, req.from_user_id)
        };
        prop_assert_eq!(req.counterpart(me), other);
    }
}
