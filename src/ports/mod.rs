//! Port traits: the seams between evaluation logic and I/O.

pub mod config_port;
pub mod report_port;
pub mod submission_port;
