pub mod board;
pub mod config;
pub mod ticket;
pub mod users;
