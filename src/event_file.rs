pub mod error;
pub mod game;
pub mod info;
pub mod misc;
pub mod parser;
pub mod play;
pub mod traits;
