//! Group membership records.
//!
//! A participant is never deleted once they appear in a ledger entry:
//! removing a member archives the record so historical shares keep a
//! resolvable identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A member of a group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub display_name: String,
    /// Set when the member leaves the group. Archived participants are
    /// excluded from new entries but stay resolvable for historical ones.
    pub archived: bool,
}

impl Participant {
    pub(crate) fn new(display_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name,
            archived: false,
        }
    }
}
