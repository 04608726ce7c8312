//! Terminal front end: one module per command plus shared table helpers

pub mod list;
pub mod manage;
pub mod prices;
pub mod setup;
pub mod summary;
pub mod ui;
pub mod watch;
