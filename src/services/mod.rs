pub mod auth;
pub mod ingredients;
pub mod menu;
pub mod recipes;
pub mod shopping_lists;
pub mod users;
