pub mod cli;
pub mod error;
pub mod logging;
pub mod progress;
pub mod run;
pub mod sink;
pub mod summary;
