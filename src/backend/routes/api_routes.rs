/**
 * API Routes
 *
 * ## Public
 * - `POST /api/auth/signup`, `POST /api/auth/login`
 *
 * ## Authenticated
 * - Auth: logout, me
 * - Users and profile: search, public profile, profile edit, mode, notifications
 * - Friends: list, remove, requests (list, send, accept, reject, cancel)
 * - Chats: list, create, get, messages, read receipts, typing
 * - Messages: reactions, forward, delete
 */

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::backend::auth::{get_me, login, logout, signup};
use crate::backend::messaging::handlers::{
    accept_friend_request, cancel_friend_request, create_chat, delete_message, forward_message, get_chat,
    list_chats, list_friend_requests, list_friends, list_messages, mark_read, react_to_message,
    reject_friend_request, remove_friend, send_friend_request, send_message, send_typing,
};
use crate::backend::server::state::AppState;
use crate::backend::users::{get_user, search_users, set_notification_mode, set_notifications, update_profile};

/// Routes reachable without a token
pub fn configure_public_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
}

/// Routes that require an authenticated user
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Session
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(get_me))
        // Users and profile
        .route("/api/users/search", get(search_users))
        .route("/api/users/{user_id}", get(get_user))
        .route("/api/profile", patch(update_profile))
        .route("/api/profile/mode", put(set_notification_mode))
        .route("/api/profile/notifications", put(set_notifications))
        // Friends
        .route("/api/friends", get(list_friends))
        .route("/api/friends/{user_id}", delete(remove_friend))
        .route(
            "/api/friends/requests",
            get(list_friend_requests).post(send_friend_request),
        )
        .route("/api/friends/requests/{id}/accept", post(accept_friend_request))
        .route("/api/friends/requests/{id}/reject", post(reject_friend_request))
        .route("/api/friends/requests/{id}", delete(cancel_friend_request))
        // Chats
        .route("/api/chats", get(list_chats).post(create_chat))
        .route("/api/chats/{chat_id}", get(get_chat))
        .route(
            "/api/chats/{chat_id}/messages",
            get(list_messages).post(send_message),
        )
        .route("/api/chats/{chat_id}/read", post(mark_read))
        .route("/api/chats/{chat_id}/typing", post(send_typing))
        // Messages
        .route("/api/messages/{message_id}/reactions", post(react_to_message))
        .route("/api/messages/{message_id}/forward", post(forward_message))
        .route("/api/messages/{message_id}", delete(delete_message))
}
