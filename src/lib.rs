pub mod common;
pub mod config;
pub mod heuristic;
pub mod map;
pub mod output;
pub mod scenario;
pub mod solver;
pub mod stat;
