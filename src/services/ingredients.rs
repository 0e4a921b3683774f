use validator::Validate;

use crate::{
    client::ApiClient,
    error::{ApiError, ApiResult},
    models::ingredient::{Ingredient, IngredientCategory, IngredientCategoryInfo, IngredientForm},
};

pub struct IngredientService;

impl IngredientService {
    pub async fn list(client: &ApiClient) -> ApiResult<Vec<Ingredient>> {
        client.get_data(&["ingrediente", "todos"]).await
    }

    pub async fn by_category(
        client: &ApiClient,
        category: IngredientCategory,
    ) -> ApiResult<Vec<Ingredient>> {
        client.get_data(&["ingrediente", category.key()]).await
    }

    pub async fn categories(client: &ApiClient) -> ApiResult<Vec<IngredientCategoryInfo>> {
        client.get_data(&["categorias-ingredientes"]).await
    }

    pub async fn create(client: &ApiClient, form: IngredientForm) -> ApiResult<()> {
        form.validate()?;
        let ingredient = form.into_ingredient();
        let ok: bool = client.post_data(&["ingrediente", "nuevo"], &ingredient).await?;
        if !ok {
            return Err(ApiError::Rejected("Error al crear el ingrediente".into()));
        }
        tracing::info!("Created ingredient {}", ingredient.name);
        Ok(())
    }

    pub async fn update(client: &ApiClient, ingredient: &Ingredient) -> ApiResult<()> {
        let ok: bool = client.post_data(&["ingrediente", "actualizar"], ingredient).await?;
        if !ok {
            return Err(ApiError::Rejected("Hubo un error actualizando el ingrediente".into()));
        }
        Ok(())
    }

    pub async fn delete(client: &ApiClient, ingredient: &Ingredient) -> ApiResult<()> {
        let ok: bool = client.post_data(&["ingrediente", "eliminar"], ingredient).await?;
        if !ok {
            return Err(ApiError::Rejected(format!(
                "No se pudo eliminar el ingrediente {}",
                ingredient.name
            )));
        }
        Ok(())
    }
}
