pub mod edit_buffer;
pub mod mutations;
pub mod notify;
pub mod relationship;
pub mod screen;
pub mod view;
