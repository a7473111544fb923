pub mod config;
pub mod exercise;
pub mod pose;
pub mod render;
pub mod session;
pub mod source;
