pub mod config;
pub mod del;
pub mod edit;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod mark;
pub mod photo;
pub mod photos;
pub mod roster;
