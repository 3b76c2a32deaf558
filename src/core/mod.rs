pub mod chance;
pub mod engine;
pub mod outline;
pub mod select;
