pub mod app;
pub mod cli;
pub mod config;
pub mod highlight;
pub mod logging;
pub mod navigation;
pub mod prefs;
pub mod search;
