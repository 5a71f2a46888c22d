//! Command implementations and terminal rendering

pub mod fetch;
pub mod pairs;
pub mod setup;
pub mod ui;
pub mod watch;
