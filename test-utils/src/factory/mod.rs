//! Factory methods for inserting raw rows in tests.
//!
//! Factories write entity rows directly, bypassing the repositories. This lets repository
//! tests seed legacy or malformed data that the application itself would never produce.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let row = factory::sticky_message::StickyMessageFactory::new(&db)
//!     .kind("banner")
//!     .build()
//!     .await?;
//!
//! let member = factory::create_roster_member(&db, "soldier").await?;
//! ```
//!
//! # Available Factories
//!
//! - `sticky_message` - Create sticky message rows
//! - `roster_member` - Create roster member rows
//! - `helpers` - Shared id generation

pub mod helpers;
pub mod roster_member;
pub mod sticky_message;

pub use roster_member::create_roster_member;
pub use sticky_message::create_sticky_message;
