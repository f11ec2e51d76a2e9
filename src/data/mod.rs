//! Persistent stores for sticky configuration and the roster.
//!
//! Services depend on the `StickyStore` and `RosterStore` traits; the SQLite repositories
//! here are the production implementations.

pub mod roster;
pub mod sticky;
pub mod store;

#[cfg(test)]
pub mod memory;

#[cfg(test)]
mod test;
