pub mod sqlite;
pub mod summary;
pub mod window;
