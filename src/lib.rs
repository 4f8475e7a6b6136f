pub mod acquisition;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod run;
pub mod screen;
pub mod terminal;
