pub mod conversations;
pub mod delete;
pub mod health;
pub mod messages;
pub mod models;
pub mod title;
pub mod versions;
