use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::recipe::IngredientSummary;

pub type MenuId = i64;
pub type RecipeId = i64;

/// Day of the week, in display order. Serialised with the backend's names.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    #[serde(rename = "LUNES")]
    Monday,
    #[serde(rename = "MARTES")]
    Tuesday,
    #[serde(rename = "MIERCOLES")]
    Wednesday,
    #[serde(rename = "JUEVES")]
    Thursday,
    #[serde(rename = "VIERNES")]
    Friday,
    #[serde(rename = "SABADO")]
    Saturday,
    #[serde(rename = "DOMINGO")]
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Backend key, e.g. `MIERCOLES`.
    pub fn key(self) -> &'static str {
        match self {
            Weekday::Monday => "LUNES",
            Weekday::Tuesday => "MARTES",
            Weekday::Wednesday => "MIERCOLES",
            Weekday::Thursday => "JUEVES",
            Weekday::Friday => "VIERNES",
            Weekday::Saturday => "SABADO",
            Weekday::Sunday => "DOMINGO",
        }
    }

    /// Label shown in tables, e.g. `Miércoles`.
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "Lunes",
            Weekday::Tuesday => "Martes",
            Weekday::Wednesday => "Miércoles",
            Weekday::Thursday => "Jueves",
            Weekday::Friday => "Viernes",
            Weekday::Saturday => "Sábado",
            Weekday::Sunday => "Domingo",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for Weekday {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Weekday::ALL
            .into_iter()
            .find(|d| d.key() == upper || d.label().to_uppercase() == upper)
            .ok_or_else(|| anyhow::anyhow!("Día de la semana desconocido: {s}"))
    }
}

/// Meal slot of a menu column (`DESAYUNO`, `CENA`, ...).
///
/// The set is data-driven: each menu carries its own categories, so this is
/// an upper-case name rather than a closed enum. Names read from the wire
/// go through [`MealCategory::new`] like any other.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct MealCategory(Cow<'static, str>);

impl<'de> Deserialize<'de> for MealCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(MealCategory::new(&raw))
    }
}

impl MealCategory {
    pub const DESAYUNO: MealCategory = MealCategory(Cow::Borrowed("DESAYUNO"));
    pub const ALMUERZO: MealCategory = MealCategory(Cow::Borrowed("ALMUERZO"));
    pub const COMIDA: MealCategory = MealCategory(Cow::Borrowed("COMIDA"));
    pub const MERIENDA: MealCategory = MealCategory(Cow::Borrowed("MERIENDA"));
    pub const CENA: MealCategory = MealCategory(Cow::Borrowed("CENA"));

    /// Default selection offered when starting a new menu.
    pub const DEFAULTS: [MealCategory; 5] = [
        MealCategory::DESAYUNO,
        MealCategory::ALMUERZO,
        MealCategory::COMIDA,
        MealCategory::MERIENDA,
        MealCategory::CENA,
    ];

    pub fn new(name: &str) -> Self {
        MealCategory(Cow::Owned(name.trim().to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a comma separated list (`DESAYUNO,COMIDA`), skipping blanks.
    pub fn parse_list(raw: &str) -> Vec<MealCategory> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(MealCategory::new)
            .collect()
    }
}

impl fmt::Display for MealCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MealCategory {
    fn from(name: &str) -> Self {
        MealCategory::new(name)
    }
}

/// Recipe as referenced from a menu cell. Owned by the recipe catalogue,
/// only referenced here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeRef {
    pub id: RecipeId,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "ingredientes", default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<IngredientSummary>,
}

impl RecipeRef {
    pub fn new(id: RecipeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ingredients: Vec::new(),
        }
    }
}

/// One persisted (day, category) record of a weekly menu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayMeal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "dia")]
    pub weekday: Weekday,
    #[serde(rename = "categoria")]
    pub category: MealCategory,
    #[serde(rename = "recetas", default)]
    pub recipes: Vec<RecipeRef>,
}

/// Weekly menu as returned by `GET /menu/{id}` and `GET /menu/mis-menus`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyMenu {
    pub id: MenuId,
    #[serde(rename = "usuarioId", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(rename = "diasComidas", default)]
    pub entries: Vec<DayMeal>,
}

/// One flattened grid cell, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuContentEntry {
    pub weekday: Weekday,
    pub category: MealCategory,
    pub recipe_ids: Vec<RecipeId>,
}

/// Body for POST /menu/nuevo.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateMenuRequest {
    #[serde(rename = "categorias")]
    #[validate(length(min = 1, message = "El menú necesita al menos una categoría"))]
    pub categories: Vec<MealCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeIdRef {
    pub id: RecipeId,
}

/// Wire form of a [`MenuContentEntry`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayMealPayload {
    #[serde(rename = "dia")]
    pub weekday: Weekday,
    #[serde(rename = "categoria")]
    pub category: MealCategory,
    #[serde(rename = "recetas")]
    pub recipes: Vec<RecipeIdRef>,
}

impl From<&MenuContentEntry> for DayMealPayload {
    fn from(entry: &MenuContentEntry) -> Self {
        Self {
            weekday: entry.weekday,
            category: entry.category.clone(),
            recipes: entry
                .recipe_ids
                .iter()
                .map(|&id| RecipeIdRef { id })
                .collect(),
        }
    }
}

/// Body for PUT /menu/recetas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMenuRecipesRequest {
    #[serde(rename = "menuId")]
    pub menu_id: MenuId,
    #[serde(rename = "diasComidas")]
    pub entries: Vec<DayMealPayload>,
}

/// Body for POST /menu/addreceta.
#[derive(Debug, Clone, Serialize)]
pub struct AddRecipeToMenuRequest {
    #[serde(rename = "menuId")]
    pub menu_id: MenuId,
    #[serde(rename = "dia")]
    pub weekday: Weekday,
    #[serde(rename = "categoria")]
    pub category: MealCategory,
    #[serde(rename = "recetaId")]
    pub recipe_id: RecipeId,
}
