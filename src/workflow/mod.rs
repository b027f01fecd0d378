pub mod board;
pub mod submit;
