use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::menu::{MealCategory, MenuContentEntry, RecipeId, RecipeRef, Weekday, WeeklyMenu};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("el menú necesita al menos una categoría")]
    NoCategories,

    #[error("la celda {weekday}/{category} no existe en este menú")]
    UnknownCell {
        weekday: Weekday,
        category: MealCategory,
    },
}

/// In-memory weekly menu: seven days by the menu's meal categories.
///
/// Every (weekday, category) pair of the grid has a cell, possibly empty.
/// A cell never holds two recipes with the same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuGrid {
    categories: Vec<MealCategory>,
    cells: BTreeMap<Weekday, BTreeMap<MealCategory, Vec<RecipeRef>>>,
}

impl MenuGrid {
    /// Grid with an empty cell for every weekday and category. Duplicate
    /// categories are collapsed, keeping the first occurrence.
    pub fn empty(categories: &[MealCategory]) -> Result<Self, GridError> {
        let mut unique: Vec<MealCategory> = Vec::with_capacity(categories.len());
        for category in categories {
            if !unique.contains(category) {
                unique.push(category.clone());
            }
        }
        if unique.is_empty() {
            return Err(GridError::NoCategories);
        }
        Ok(Self::covering(unique))
    }

    /// Rebuild the grid of a persisted menu. Columns are the menu's
    /// categories in order of first appearance; records sharing a cell are
    /// merged without repeating a recipe.
    pub fn from_menu(menu: &WeeklyMenu) -> Self {
        let mut categories: Vec<MealCategory> = Vec::new();
        for entry in &menu.entries {
            if !categories.contains(&entry.category) {
                categories.push(entry.category.clone());
            }
        }

        let mut grid = Self::covering(categories);
        for entry in &menu.entries {
            if let Some(cell) = grid.cell_mut(entry.weekday, &entry.category) {
                for recipe in &entry.recipes {
                    if !cell.iter().any(|r| r.id == recipe.id) {
                        cell.push(recipe.clone());
                    }
                }
            }
        }
        grid
    }

    fn covering(categories: Vec<MealCategory>) -> Self {
        let cells = Weekday::ALL
            .into_iter()
            .map(|day| {
                let row = categories.iter().map(|c| (c.clone(), Vec::new())).collect();
                (day, row)
            })
            .collect();
        Self { categories, cells }
    }

    pub fn categories(&self) -> &[MealCategory] {
        &self.categories
    }

    pub fn cell(&self, weekday: Weekday, category: &MealCategory) -> Option<&[RecipeRef]> {
        self.cells
            .get(&weekday)
            .and_then(|row| row.get(category))
            .map(Vec::as_slice)
    }

    fn cell_mut(&mut self, weekday: Weekday, category: &MealCategory) -> Option<&mut Vec<RecipeRef>> {
        self.cells.get_mut(&weekday).and_then(|row| row.get_mut(category))
    }

    fn cell_or_err(
        &mut self,
        weekday: Weekday,
        category: &MealCategory,
    ) -> Result<&mut Vec<RecipeRef>, GridError> {
        self.cell_mut(weekday, category).ok_or_else(|| GridError::UnknownCell {
            weekday,
            category: category.clone(),
        })
    }

    pub fn cell_count(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    pub fn recipe_count(&self) -> usize {
        self.cells.values().flat_map(BTreeMap::values).map(Vec::len).sum()
    }

    pub fn has_recipes(&self) -> bool {
        self.cells
            .values()
            .flat_map(BTreeMap::values)
            .any(|cell| !cell.is_empty())
    }

    /// Append `recipe` to a cell. Returns false when the cell already holds it.
    pub fn add_recipe(
        &mut self,
        weekday: Weekday,
        category: &MealCategory,
        recipe: RecipeRef,
    ) -> Result<bool, GridError> {
        let cell = self.cell_or_err(weekday, category)?;
        if cell.iter().any(|r| r.id == recipe.id) {
            return Ok(false);
        }
        cell.push(recipe);
        Ok(true)
    }

    /// Drop a recipe from a cell. Returns false when it was not there.
    pub fn remove_recipe(
        &mut self,
        weekday: Weekday,
        category: &MealCategory,
        recipe_id: RecipeId,
    ) -> Result<bool, GridError> {
        let cell = self.cell_or_err(weekday, category)?;
        let before = cell.len();
        cell.retain(|r| r.id != recipe_id);
        Ok(cell.len() != before)
    }

    /// Flatten into one entry per cell, empty cells included.
    pub fn build_payload(&self) -> Vec<MenuContentEntry> {
        self.rows()
            .map(|(weekday, category, recipes)| MenuContentEntry {
                weekday,
                category: category.clone(),
                recipe_ids: recipes.iter().map(|r| r.id).collect(),
            })
            .collect()
    }

    /// Cells in display order: weekdays Monday first, categories in column order.
    pub fn rows(&self) -> impl Iterator<Item = (Weekday, &MealCategory, &[RecipeRef])> + '_ {
        Weekday::ALL.into_iter().flat_map(move |day| {
            self.categories.iter().filter_map(move |category| {
                self.cell(day, category).map(|recipes| (day, category, recipes))
            })
        })
    }
}
