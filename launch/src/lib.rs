pub use rangeraptor;

pub mod config;
pub mod logger;
pub mod random_network;
pub mod solver;
pub mod timer;

pub use solver::Solver;
