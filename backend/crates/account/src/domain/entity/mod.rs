pub mod custom_lists;
pub mod game_list;
pub mod library;
pub mod user;
