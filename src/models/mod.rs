pub mod api;
pub mod auth;
pub mod ingredient;
pub mod menu;
pub mod recipe;
pub mod shopping_list;
pub mod user;
