use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    client::ApiClient,
    error::ApiResult,
    models::menu::{MealCategory, MenuContentEntry, MenuId, WeeklyMenu},
    services::menu::MenuService,
};

/// Where a [`MenuEditor`](super::MenuEditor) loads and stores menus.
#[async_trait]
pub trait MenuBackend: Send + Sync {
    async fn fetch_menu(&self, id: MenuId) -> ApiResult<WeeklyMenu>;

    /// Create an empty menu with these columns, returning its id.
    async fn create_menu_shell(&self, categories: &[MealCategory]) -> ApiResult<MenuId>;

    /// Replace the whole contents of an existing menu.
    async fn submit_menu_contents(&self, menu_id: MenuId, entries: &[MenuContentEntry]) -> ApiResult<()>;
}

#[async_trait]
impl MenuBackend for ApiClient {
    async fn fetch_menu(&self, id: MenuId) -> ApiResult<WeeklyMenu> {
        MenuService::fetch(self, id).await
    }

    async fn create_menu_shell(&self, categories: &[MealCategory]) -> ApiResult<MenuId> {
        MenuService::create_shell(self, categories).await
    }

    async fn submit_menu_contents(&self, menu_id: MenuId, entries: &[MenuContentEntry]) -> ApiResult<()> {
        MenuService::submit_contents(self, menu_id, entries).await
    }
}

#[async_trait]
impl<T: MenuBackend + ?Sized> MenuBackend for Arc<T> {
    async fn fetch_menu(&self, id: MenuId) -> ApiResult<WeeklyMenu> {
        (**self).fetch_menu(id).await
    }

    async fn create_menu_shell(&self, categories: &[MealCategory]) -> ApiResult<MenuId> {
        (**self).create_menu_shell(categories).await
    }

    async fn submit_menu_contents(&self, menu_id: MenuId, entries: &[MenuContentEntry]) -> ApiResult<()> {
        (**self).submit_menu_contents(menu_id, entries).await
    }
}
