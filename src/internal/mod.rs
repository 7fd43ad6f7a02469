pub mod feed;
pub mod mapper;
pub mod models;
pub mod notification;
pub mod theme_store;
pub mod thread;
pub mod ui;
pub mod vote;
