//! Domain models for the organisational roster.
//!
//! The roster is a set of positions, each holding an ordered list of members up to
//! its capacity. Member ids are short numeric strings unique across the whole roster.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::{
    error::store::StoreError,
    model::position::{PositionCatalog, PositionSpec},
};

/// Schema version written with every roster save.
pub const ROSTER_SCHEMA_VERSION: &str = "1.0.0";

/// A person holding a roster position.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// Short numeric id, unique across all positions.
    pub id: String,
    pub name: String,
    /// Linked Discord user, if any.
    pub user_id: Option<u64>,
    /// Discord user who added the member.
    pub added_by: Option<u64>,
    pub added_at: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
    pub moved_at: Option<DateTime<Utc>>,
}

impl Member {
    /// Converts an entity model to a member at the repository boundary.
    ///
    /// The position key and order are handled by the repository.
    pub fn from_entity(entity: entity::roster_member::Model) -> Result<Self, StoreError> {
        Ok(Self {
            user_id: parse_optional_id(entity.user_id.as_deref(), "user_id")?,
            added_by: parse_optional_id(entity.added_by.as_deref(), "added_by")?,
            id: entity.id,
            name: entity.name,
            added_at: entity.added_at,
            last_updated: entity.last_updated,
            moved_at: entity.moved_at,
        })
    }
}

fn parse_optional_id(value: Option<&str>, field: &str) -> Result<Option<u64>, StoreError> {
    value
        .map(|raw| {
            raw.parse::<u64>().map_err(|_| {
                StoreError::corrupt("roster", format!("invalid {} '{}'", field, raw))
            })
        })
        .transpose()
}

/// A roster position and its members.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub key: String,
    pub name: String,
    pub description: String,
    pub max_members: usize,
    /// Members in insertion order.
    pub members: Vec<Member>,
}

impl Position {
    pub fn from_spec(spec: &PositionSpec) -> Self {
        Self {
            key: spec.key.clone(),
            name: spec.name.clone(),
            description: spec.description.clone(),
            max_members: spec.max_members,
            members: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.max_members
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn member_index(&self, id: &str) -> Option<usize> {
        self.members.iter().position(|m| m.id == id)
    }
}

/// Roster bookkeeping, recomputed on every save and load.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterMetadata {
    pub total_members: usize,
    pub last_updated: DateTime<Utc>,
    pub version: String,
}

/// The whole roster in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterSnapshot {
    pub positions: Vec<Position>,
    pub metadata: RosterMetadata,
}

impl RosterSnapshot {
    /// Empty roster with one position per catalog entry.
    pub fn empty(catalog: &PositionCatalog, now: DateTime<Utc>) -> Self {
        Self {
            positions: catalog.positions().iter().map(Position::from_spec).collect(),
            metadata: RosterMetadata {
                total_members: 0,
                last_updated: now,
                version: ROSTER_SCHEMA_VERSION.to_string(),
            },
        }
    }

    pub fn position(&self, key: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.key == key)
    }

    pub fn position_mut(&mut self, key: &str) -> Option<&mut Position> {
        self.positions.iter_mut().find(|p| p.key == key)
    }

    pub fn total_members(&self) -> usize {
        self.positions.iter().map(|p| p.members.len()).sum()
    }

    /// Whether any position holds a member with this id.
    pub fn contains_member_id(&self, id: &str) -> bool {
        self.positions.iter().any(|p| p.member(id).is_some())
    }

    /// Key of the first position (in catalog order) holding the user.
    pub fn position_of_user(&self, user_id: u64) -> Option<&str> {
        self.positions
            .iter()
            .find(|p| p.members.iter().any(|m| m.user_id == Some(user_id)))
            .map(|p| p.key.as_str())
    }

    /// Position and member the user is linked to, if any.
    pub fn member_of_user(&self, user_id: u64) -> Option<(&Position, &Member)> {
        self.positions.iter().find_map(|p| {
            p.members
                .iter()
                .find(|m| m.user_id == Some(user_id))
                .map(|m| (p, m))
        })
    }

    /// Every linked user id on the roster.
    pub fn linked_user_ids(&self) -> BTreeSet<u64> {
        self.positions
            .iter()
            .flat_map(|p| p.members.iter().filter_map(|m| m.user_id))
            .collect()
    }

    /// Recomputes `total_members` and stamps `last_updated`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.metadata.total_members = self.total_members();
        self.metadata.last_updated = now;
        self.metadata.version = ROSTER_SCHEMA_VERSION.to_string();
    }
}

/// Parameters for adding a member.
#[derive(Debug, Clone, Default)]
pub struct NewMemberParam {
    /// Explicit id; a random one is allocated when absent.
    pub id: Option<String>,
    pub name: String,
    pub user_id: Option<u64>,
}

/// Partial update of a member; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateMemberParam {
    pub name: Option<String>,
    /// `Some(None)` unlinks the Discord user.
    pub user_id: Option<Option<u64>>,
}

impl UpdateMemberParam {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.user_id.is_none()
    }
}

/// A member matched by a search, annotated with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub member: Member,
    pub position_key: String,
    pub position_name: String,
}

/// Fill level of one position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionStats {
    pub key: String,
    pub name: String,
    pub current: usize,
    pub max: usize,
    /// Rounded fill percentage, 0 for a zero-capacity position.
    pub percentage: u32,
}

/// Fill levels of the whole roster.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterStats {
    pub positions: Vec<PositionStats>,
    pub total_members: usize,
    pub last_updated: DateTime<Utc>,
}

/// Autocomplete entry for a member id.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberChoice {
    /// `name | ID: id`
    pub label: String,
    pub value: String,
}
