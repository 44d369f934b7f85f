pub mod logger;
pub mod task;
pub mod time;
