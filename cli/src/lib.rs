pub mod random;

pub use launch::logger::init_logger;
