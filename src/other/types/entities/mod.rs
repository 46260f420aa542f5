pub mod profile_update;
pub mod user;
