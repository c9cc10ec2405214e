mod conversation;
mod message;
mod role;
mod version;

pub use conversation::{Conversation, DEFAULT_TITLE, MAX_TITLE_LEN};
pub use message::{Message, NewMessage};
pub use role::Role;
pub use version::Version;
