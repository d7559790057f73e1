pub mod conflict_log;
pub mod interview;
