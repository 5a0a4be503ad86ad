//! Audit stamping for ledger records
//!
//! Every write carries the acting user explicitly. A record's creator is
//! fixed on its first save; every later save only moves `updated_*`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The user performing a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(pub Uuid);

impl Actor {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Who wrote, and when
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditStamp {
    pub by: Actor,
    pub at: DateTime<Utc>,
}

impl AuditStamp {
    pub fn new(by: Actor, at: DateTime<Utc>) -> Self {
        Self { by, at }
    }

    pub fn now(by: Actor) -> Self {
        Self::new(by, Utc::now())
    }
}

/// Audit columns carried by products, counterparties, groups and operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AuditFields {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Null once the creating user has been deleted
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
}

impl AuditFields {
    /// Fields for a record saved for the first time
    pub fn created(stamp: AuditStamp) -> Self {
        Self {
            created_at: stamp.at,
            updated_at: stamp.at,
            created_by: Some(stamp.by.id()),
            updated_by: Some(stamp.by.id()),
        }
    }

    /// Apply a later save. `created_*` never changes.
    pub fn touch(&mut self, stamp: AuditStamp) {
        self.updated_at = stamp.at;
        self.updated_by = Some(stamp.by.id());
    }
}

/// Names of the audit columns, all read-only in the admin interface
pub const AUDIT_FIELD_NAMES: [&str; 4] = ["created_at", "updated_at", "created_by", "updated_by"];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_created_sets_both_actors() {
        let actor = Actor(Uuid::new_v4());
        let stamp = AuditStamp::now(actor);
        let fields = AuditFields::created(stamp);

        assert_eq!(fields.created_by, Some(actor.id()));
        assert_eq!(fields.updated_by, Some(actor.id()));
        assert_eq!(fields.created_at, fields.updated_at);
    }

    #[test]
    fn test_touch_keeps_creator() {
        let creator = Actor(Uuid::new_v4());
        let editor = Actor(Uuid::new_v4());
        let t0 = Utc::now();
        let mut fields = AuditFields::created(AuditStamp::new(creator, t0));

        fields.touch(AuditStamp::new(editor, t0 + Duration::minutes(5)));

        assert_eq!(fields.created_by, Some(creator.id()));
        assert_eq!(fields.created_at, t0);
        assert_eq!(fields.updated_by, Some(editor.id()));
        assert_eq!(fields.updated_at, t0 + Duration::minutes(5));
    }
}
