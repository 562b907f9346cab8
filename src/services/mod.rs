pub mod auth;
pub mod drive;
pub mod drive_file;
pub mod emoji;
pub mod events;
pub mod policy;
pub mod role;
#[cfg(test)]
pub mod testing;

pub use auth::AuthService;
pub use drive::{BulkDeletionReport, DriveService};
pub use drive_file::DriveFileService;
pub use emoji::{CustomEmojiService, ReferenceGuard};
pub use events::{BroadcastEventBus, EventBus};
pub use role::{RoleOracle, RoleService};
