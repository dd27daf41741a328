pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod history;
pub mod locate;
pub mod pipeline;
pub mod process;
pub mod record;
pub mod report;
pub mod resolve;
pub mod results;
