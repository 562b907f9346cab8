use crate::error::{AppError, Result};
use crate::models::{Actor, DriveFile};

/// Owner-or-moderator rule for deleting a single file
pub fn can_delete(actor: &Actor, file: &DriveFile) -> bool {
    actor.is_moderator || file.user_id.as_deref() == Some(actor.id.as_str())
}

/// Administrative operations are moderator-only
pub fn require_moderator(actor: &Actor) -> Result<()> {
    if !actor.is_moderator {
        return Err(AppError::AccessDenied("Moderator access required".to_string()));
    }
    Ok(())
}
