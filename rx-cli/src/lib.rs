//! Patient-facing command line client for the rx backend
pub mod cli;
pub mod client;
pub mod flow;
pub mod paths;
pub mod render;
pub mod settings;
pub mod timer;
pub mod translations;

mod logging;
