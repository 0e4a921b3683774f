use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::menu::MenuId;
use super::recipe::IngredientSummary;

pub type ShoppingListId = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShoppingList {
    pub id: ShoppingListId,
    #[serde(rename = "usuarioId", default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub items: Vec<IngredientSummary>,
}

impl ShoppingList {
    pub fn item_ids(&self) -> BTreeSet<i64> {
        self.items.iter().filter_map(|i| i.id).collect()
    }
}

/// Body for POST /listacompra/generar.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateListRequest {
    #[serde(rename = "menuId")]
    pub menu_id: MenuId,
}

/// Body for POST /listacompra/items/{anadir,quitar}.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ModifyItemsRequest {
    #[serde(rename = "listaCompraId")]
    pub list_id: ShoppingListId,
    #[serde(rename = "ingredienteIds")]
    #[validate(length(min = 1, message = "La lista de IDs de ingredientes no puede estar vacía"))]
    pub ingredient_ids: Vec<i64>,
}

/// Body for POST /listacompra/eliminar.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteListRequest {
    #[serde(rename = "listaCompraId")]
    pub list_id: ShoppingListId,
}

/// Difference between a list's current items and the wanted selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemChanges {
    pub added: Vec<i64>,
    pub removed: Vec<i64>,
}

impl ItemChanges {
    pub fn between(current: &BTreeSet<i64>, wanted: &BTreeSet<i64>) -> Self {
        Self {
            added: wanted.difference(current).copied().collect(),
            removed: current.difference(wanted).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
