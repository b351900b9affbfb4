pub mod commands;
pub mod models;
pub mod storage;
pub mod tree;
pub mod tui;
