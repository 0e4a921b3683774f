use validator::Validate;

use crate::{
    client::ApiClient,
    error::{ApiError, ApiResult},
    models::menu::{
        AddRecipeToMenuRequest, CreateMenuRequest, DayMealPayload, MealCategory, MenuContentEntry,
        MenuId, UpdateMenuRecipesRequest, WeeklyMenu,
    },
};

pub struct MenuService;

impl MenuService {
    /// GET /menu/{id}
    pub async fn fetch(client: &ApiClient, id: MenuId) -> ApiResult<WeeklyMenu> {
        client.get_data(&["menu", &id.to_string()]).await
    }

    /// All menus owned by the signed-in user.
    pub async fn list_mine(client: &ApiClient) -> ApiResult<Vec<WeeklyMenu>> {
        client.get_data(&["menu", "mis-menus"]).await
    }

    /// Create an empty menu with the given columns and return its id.
    pub async fn create_shell(client: &ApiClient, categories: &[MealCategory]) -> ApiResult<MenuId> {
        let req = CreateMenuRequest {
            categories: categories.to_vec(),
        };
        req.validate()?;

        let menu: WeeklyMenu = client.post_data(&["menu", "nuevo"], &req).await?;
        tracing::info!("Created menu shell {} ({} categories)", menu.id, categories.len());
        Ok(menu.id)
    }

    /// Replace the full contents of a menu.
    pub async fn submit_contents(
        client: &ApiClient,
        menu_id: MenuId,
        entries: &[MenuContentEntry],
    ) -> ApiResult<()> {
        let req = UpdateMenuRecipesRequest {
            menu_id,
            entries: entries.iter().map(DayMealPayload::from).collect(),
        };
        client.put_unit(&["menu", "recetas"], &req).await?;
        tracing::info!("Submitted {} cells for menu {}", entries.len(), menu_id);
        Ok(())
    }

    /// Add a single recipe to one cell server-side.
    pub async fn add_recipe(client: &ApiClient, req: &AddRecipeToMenuRequest) -> ApiResult<()> {
        let added: bool = client.post_data(&["menu", "addreceta"], req).await?;
        if !added {
            return Err(ApiError::Rejected(format!(
                "No se pudo añadir la receta {} al menú {}",
                req.recipe_id, req.menu_id
            )));
        }
        Ok(())
    }

    pub async fn delete(client: &ApiClient, id: MenuId) -> ApiResult<()> {
        client.delete_unit(&["menu", &id.to_string()]).await?;
        tracing::info!("Deleted menu {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock_backend;
    use crate::models::menu::Weekday;
    use axum::{
        extract::Path,
        routing::{get, post, put},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn fetch_reads_menu_from_envelope() {
        let router = Router::new().route(
            "/menu/{id}",
            get(|Path(id): Path<i64>| async move {
                Json(json!({
                    "data": {"id": id, "diasComidas": [
                        {"dia": "MARTES", "categoria": "COMIDA", "recetas": [{"id": 1, "nombre": "Lentejas"}]}
                    ]},
                    "estado": "exito"
                }))
            }),
        );
        let client = mock_backend(router).await;

        let menu = MenuService::fetch(&client, 12).await.unwrap();
        assert_eq!(menu.id, 12);
        assert_eq!(menu.entries[0].weekday, Weekday::Tuesday);
    }

    #[tokio::test]
    async fn create_shell_posts_categories() {
        let seen = Arc::new(Mutex::new(Value::Null));
        let captured = seen.clone();
        let router = Router::new().route(
            "/menu/nuevo",
            post(move |Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = body;
                    Json(json!({"data": {"id": 42, "diasComidas": []}, "estado": "exito"}))
                }
            }),
        );
        let client = mock_backend(router).await;

        let id = MenuService::create_shell(&client, &[MealCategory::DESAYUNO, MealCategory::COMIDA])
            .await
            .unwrap();
        assert_eq!(id, 42);
        assert_eq!(*seen.lock().unwrap(), json!({"categorias": ["DESAYUNO", "COMIDA"]}));
    }

    #[tokio::test]
    async fn create_shell_without_categories_sends_nothing() {
        let client = mock_backend(Router::new()).await;
        let err = MenuService::create_shell(&client, &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Invalid(_)));
    }

    #[tokio::test]
    async fn submit_contents_puts_wire_payload() {
        let seen = Arc::new(Mutex::new(Value::Null));
        let captured = seen.clone();
        let router = Router::new().route(
            "/menu/recetas",
            put(move |Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = body;
                }
            }),
        );
        let client = mock_backend(router).await;

        let entries = vec![MenuContentEntry {
            weekday: Weekday::Friday,
            category: MealCategory::CENA,
            recipe_ids: vec![3],
        }];
        MenuService::submit_contents(&client, 7, &entries).await.unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            json!({"menuId": 7, "diasComidas": [
                {"dia": "VIERNES", "categoria": "CENA", "recetas": [{"id": 3}]}
            ]})
        );
    }

    #[tokio::test]
    async fn add_recipe_false_is_an_error() {
        let router = Router::new().route(
            "/menu/addreceta",
            post(|| async { Json(json!({"data": false, "estado": "exito"})) }),
        );
        let client = mock_backend(router).await;

        let req = AddRecipeToMenuRequest {
            menu_id: 1,
            weekday: Weekday::Monday,
            category: MealCategory::CENA,
            recipe_id: 9,
        };
        assert!(matches!(
            MenuService::add_recipe(&client, &req).await,
            Err(ApiError::Rejected(_))
        ));
    }
}
