pub mod audio;
pub mod catalog;
pub mod fallback;
pub mod grading;
pub mod hints;
pub mod memory;
pub mod storage;
pub mod store;
pub mod transcriber;
