use std::collections::BTreeSet;

use futures_util::future::try_join;
use validator::Validate;

use crate::{
    client::ApiClient,
    error::ApiResult,
    models::{
        menu::MenuId,
        shopping_list::{
            DeleteListRequest, GenerateListRequest, ItemChanges, ModifyItemsRequest, ShoppingList,
            ShoppingListId,
        },
    },
};

pub struct ShoppingListService;

impl ShoppingListService {
    /// Build a shopping list from the ingredients of a menu's recipes.
    pub async fn generate(client: &ApiClient, menu_id: MenuId) -> ApiResult<ShoppingList> {
        let list: ShoppingList = client
            .post_data(&["listacompra", "generar"], &GenerateListRequest { menu_id })
            .await?;
        tracing::info!("Generated shopping list {} from menu {}", list.id, menu_id);
        Ok(list)
    }

    pub async fn list_mine(client: &ApiClient) -> ApiResult<Vec<ShoppingList>> {
        client.get_data(&["listacompra", "mislistas"]).await
    }

    pub async fn add_items(
        client: &ApiClient,
        list_id: ShoppingListId,
        ingredient_ids: Vec<i64>,
    ) -> ApiResult<ShoppingList> {
        let req = ModifyItemsRequest {
            list_id,
            ingredient_ids,
        };
        req.validate()?;
        client.post_data(&["listacompra", "items", "anadir"], &req).await
    }

    pub async fn remove_items(
        client: &ApiClient,
        list_id: ShoppingListId,
        ingredient_ids: Vec<i64>,
    ) -> ApiResult<ShoppingList> {
        let req = ModifyItemsRequest {
            list_id,
            ingredient_ids,
        };
        req.validate()?;
        client.post_data(&["listacompra", "items", "quitar"], &req).await
    }

    pub async fn delete(client: &ApiClient, list_id: ShoppingListId) -> ApiResult<()> {
        client
            .post_unit(&["listacompra", "eliminar"], &DeleteListRequest { list_id })
            .await?;
        tracing::info!("Deleted shopping list {}", list_id);
        Ok(())
    }

    /// Bring `list` in line with the `wanted` ingredient ids, sending only
    /// the add/remove requests that are needed. Returns the applied changes.
    pub async fn sync_items(
        client: &ApiClient,
        list: &ShoppingList,
        wanted: &BTreeSet<i64>,
    ) -> ApiResult<ItemChanges> {
        let changes = ItemChanges::between(&list.item_ids(), wanted);
        if changes.is_empty() {
            return Ok(changes);
        }

        let add = async {
            if changes.added.is_empty() {
                return Ok(());
            }
            Self::add_items(client, list.id, changes.added.clone()).await.map(|_| ())
        };
        let remove = async {
            if changes.removed.is_empty() {
                return Ok(());
            }
            Self::remove_items(client, list.id, changes.removed.clone()).await.map(|_| ())
        };
        try_join(add, remove).await?;

        tracing::info!(
            "Shopping list {} updated: +{} -{}",
            list.id,
            changes.added.len(),
            changes.removed.len()
        );
        Ok(changes)
    }
}
