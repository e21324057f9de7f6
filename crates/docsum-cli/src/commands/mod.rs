pub mod config;
pub mod serve;
pub mod storage;
pub mod summarize;
