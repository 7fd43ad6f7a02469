pub mod datetime;
pub mod theme;
pub mod url;
