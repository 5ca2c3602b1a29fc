pub mod start;

pub use start::setup_start;
