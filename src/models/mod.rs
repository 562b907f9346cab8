pub mod emoji;
pub mod event;
pub mod file;
pub mod moderation;
pub mod user;

pub use emoji::*;
pub use event::*;
pub use file::*;
pub use moderation::*;
pub use user::*;
