mod auth_test;
mod chats_test;
mod friends_test;
