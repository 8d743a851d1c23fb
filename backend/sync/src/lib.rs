pub mod runner;

pub use runner::{parse_quantity, SyncReport, SyncRunner};
