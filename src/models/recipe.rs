use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ingredient::IngredientCategory;
use super::menu::{RecipeId, RecipeRef};

/// Ingredient as embedded in a recipe (`IngredienteSimpleDto`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<IngredientCategory>,
}

/// Recipe as embedded in an ingredient (id + name only).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: RecipeId,
    #[serde(rename = "nombre", default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecipeId>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "ingredientes", default)]
    pub ingredients: Vec<IngredientSummary>,
}

impl Recipe {
    /// Reference usable in a menu cell. `None` for recipes not yet persisted.
    pub fn to_ref(&self) -> Option<RecipeRef> {
        Some(RecipeRef {
            id: self.id?,
            name: self.name.clone(),
            ingredients: self.ingredients.clone(),
        })
    }

    /// Copy of this recipe without the given ingredient.
    pub fn without_ingredient(&self, ingredient_id: i64) -> Recipe {
        Recipe {
            id: self.id,
            name: self.name.clone(),
            ingredients: self
                .ingredients
                .iter()
                .filter(|i| i.id != Some(ingredient_id))
                .cloned()
                .collect(),
        }
    }
}

/// Form behind "nueva receta".
#[derive(Debug, Clone, Validate)]
pub struct RecipeForm {
    #[validate(length(min = 1, max = 100, message = "El nombre de la receta es obligatorio"))]
    pub name: String,
    pub ingredients: Vec<IngredientSummary>,
}

impl RecipeForm {
    pub fn new(name: &str, ingredients: Vec<IngredientSummary>) -> Self {
        Self {
            name: name.trim().to_string(),
            ingredients,
        }
    }

    pub fn into_recipe(self) -> Recipe {
        Recipe {
            id: None,
            name: self.name,
            ingredients: self.ingredients,
        }
    }
}
