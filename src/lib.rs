pub mod config;
pub mod error;
pub mod pool;
pub mod sets;
pub mod statistics;
pub mod workload;
