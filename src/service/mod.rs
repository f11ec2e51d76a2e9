pub mod gateway;
pub mod role_sync;
pub mod roster;
pub mod sticky;

#[cfg(test)]
pub mod fake;
