pub mod commands;
pub mod config;
pub mod render;
pub mod session;
pub mod storage;
