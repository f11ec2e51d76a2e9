pub use super::roster_member::Entity as RosterMember;
pub use super::roster_metadata::Entity as RosterMetadata;
pub use super::sticky_message::Entity as StickyMessage;
