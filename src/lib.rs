pub mod check;
pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod parser;
pub mod registry;
pub mod report;
pub mod retry;
pub mod scan;
