use validator::Validate;

use crate::{
    client::ApiClient,
    error::{ApiError, ApiResult},
    models::recipe::{Recipe, RecipeForm},
};

pub struct RecipeService;

impl RecipeService {
    pub async fn list(client: &ApiClient) -> ApiResult<Vec<Recipe>> {
        client.get_data(&["receta"]).await
    }

    /// Recipes whose name matches `name` (server-side search).
    pub async fn search(client: &ApiClient, name: &str) -> ApiResult<Vec<Recipe>> {
        let name = name.trim();
        if name.is_empty() {
            return Self::list(client).await;
        }
        client.get_data(&["receta", name]).await
    }

    pub async fn create(client: &ApiClient, form: RecipeForm) -> ApiResult<()> {
        form.validate()?;
        let recipe = form.into_recipe();
        Self::expect_true(client.post_data(&["receta", "nuevo"], &recipe).await?, "crear", &recipe)?;
        tracing::info!("Created recipe {}", recipe.name);
        Ok(())
    }

    pub async fn update(client: &ApiClient, recipe: &Recipe) -> ApiResult<()> {
        Self::expect_true(client.post_data(&["receta", "actualizar"], recipe).await?, "actualizar", recipe)
    }

    pub async fn delete(client: &ApiClient, recipe: &Recipe) -> ApiResult<()> {
        Self::expect_true(client.post_data(&["receta", "eliminar"], recipe).await?, "eliminar", recipe)
    }

    /// Detach one ingredient from a recipe and persist the result.
    pub async fn remove_ingredient(
        client: &ApiClient,
        recipe: &Recipe,
        ingredient_id: i64,
    ) -> ApiResult<Recipe> {
        let updated = recipe.without_ingredient(ingredient_id);
        Self::update(client, &updated).await?;
        Ok(updated)
    }

    fn expect_true(ok: bool, action: &str, recipe: &Recipe) -> ApiResult<()> {
        if ok {
            Ok(())
        } else {
            Err(ApiError::Rejected(format!(
                "No se pudo {action} la receta {}",
                recipe.name
            )))
        }
    }
}
