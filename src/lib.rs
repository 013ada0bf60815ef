pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod indicator;
pub mod mock;
pub mod model;
pub mod prediction;
pub mod report;
pub mod signal;
pub mod trend;
