pub mod email;
pub mod game;
pub mod list;
pub mod privacy;
pub mod profile;
pub mod user_name;
