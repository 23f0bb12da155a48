pub mod commands;
pub mod seed;
