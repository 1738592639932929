pub mod harden;
pub mod keys;
pub mod merge;
pub mod report_helpers;
pub mod run;
pub mod sources;
