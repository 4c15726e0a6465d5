pub mod communication;
pub mod config;
pub mod generator;
pub mod target;
