use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;

/// True iff the caller owns the resource. The nil id never owns anything.
pub fn can_mutate(owner_id: Uuid, caller_id: Uuid) -> bool {
    !owner_id.is_nil() && owner_id == caller_id
}

pub fn ensure_owner(owner_id: Uuid, caller_id: Uuid) -> Result<(), AppError> {
    if can_mutate(owner_id, caller_id) {
        Ok(())
    } else {
        warn!(%owner_id, %caller_id, "ownership check failed");
        Err(AppError::NotOwner)
    }
}
