use serde::{Deserialize, Serialize};
use validator::Validate;

use super::recipe::RecipeSummary;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IngredientCategory {
    #[serde(rename = "VERDURAS")]
    Vegetables,
    #[serde(rename = "FRUTAS")]
    Fruits,
    #[serde(rename = "CARNE")]
    Meat,
    #[serde(rename = "PESCADO")]
    Fish,
    #[serde(rename = "LEGUMBRES")]
    Legumes,
    #[serde(rename = "LACTEOS")]
    Dairy,
    #[serde(rename = "CEREALES")]
    Cereals,
    #[serde(rename = "FRUTOS_SECOS")]
    Nuts,
    #[serde(rename = "GRASAS_ACEITES")]
    FatsAndOils,
    #[serde(rename = "ESPECIAS")]
    Spices,
    #[serde(rename = "CONSERVAS")]
    Preserves,
    #[serde(rename = "CONGELADOS")]
    Frozen,
    #[serde(rename = "OTROS")]
    Other,
}

impl IngredientCategory {
    pub const ALL: [IngredientCategory; 13] = [
        IngredientCategory::Vegetables,
        IngredientCategory::Fruits,
        IngredientCategory::Meat,
        IngredientCategory::Fish,
        IngredientCategory::Legumes,
        IngredientCategory::Dairy,
        IngredientCategory::Cereals,
        IngredientCategory::Nuts,
        IngredientCategory::FatsAndOils,
        IngredientCategory::Spices,
        IngredientCategory::Preserves,
        IngredientCategory::Frozen,
        IngredientCategory::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            IngredientCategory::Vegetables => "VERDURAS",
            IngredientCategory::Fruits => "FRUTAS",
            IngredientCategory::Meat => "CARNE",
            IngredientCategory::Fish => "PESCADO",
            IngredientCategory::Legumes => "LEGUMBRES",
            IngredientCategory::Dairy => "LACTEOS",
            IngredientCategory::Cereals => "CEREALES",
            IngredientCategory::Nuts => "FRUTOS_SECOS",
            IngredientCategory::FatsAndOils => "GRASAS_ACEITES",
            IngredientCategory::Spices => "ESPECIAS",
            IngredientCategory::Preserves => "CONSERVAS",
            IngredientCategory::Frozen => "CONGELADOS",
            IngredientCategory::Other => "OTROS",
        }
    }

    /// Long description used by the backend's category listing.
    pub fn description(self) -> &'static str {
        match self {
            IngredientCategory::Dairy => "LÁCTEOS",
            IngredientCategory::Nuts => "FRUTOS SECOS",
            IngredientCategory::FatsAndOils => "GRASAS Y/O ACEITES",
            IngredientCategory::Spices => "ESPECIAS Y CONDIMENTOS",
            IngredientCategory::Frozen => "PRODUCTOS CONGELADOS",
            other => other.key(),
        }
    }
}

impl std::fmt::Display for IngredientCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for IngredientCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        IngredientCategory::ALL
            .into_iter()
            .find(|c| c.key() == upper)
            .ok_or_else(|| anyhow::anyhow!("Categoría de ingrediente desconocida: {s}"))
    }
}

/// Entry of GET /categorias-ingredientes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientCategoryInfo {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<IngredientCategory>,
    #[serde(rename = "recetas", default)]
    pub recipes: Vec<RecipeSummary>,
}

/// Form behind "nuevo ingrediente": name and category are both required.
#[derive(Debug, Clone, Validate)]
pub struct IngredientForm {
    #[validate(length(min = 1, max = 100, message = "Debe indicar nombre y categoría"))]
    pub name: String,
    pub category: IngredientCategory,
    /// Recipes the new ingredient is attached to.
    pub recipes: Vec<RecipeSummary>,
}

impl IngredientForm {
    pub fn new(name: &str, category: IngredientCategory) -> Self {
        Self {
            name: name.trim().to_string(),
            category,
            recipes: Vec::new(),
        }
    }

    pub fn into_ingredient(self) -> Ingredient {
        Ingredient {
            id: None,
            name: self.name,
            category: Some(self.category),
            recipes: self.recipes,
        }
    }
}
