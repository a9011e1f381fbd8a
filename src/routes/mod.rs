pub mod auth;
pub mod groups;
pub mod linkedin;
pub mod messages;
pub mod users;
