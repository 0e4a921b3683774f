//! Presentation helpers: recipe badges, menu summaries and grid export.

use std::io;

use crate::models::ingredient::IngredientCategory;
use crate::models::menu::{RecipeRef, WeeklyMenu};
use crate::models::recipe::IngredientSummary;
use crate::planner::MenuGrid;

const DEFAULT_EMOJI: &str = "🍴";
const DEFAULT_CARD_CLASS: &str = "border-0";

pub fn category_emoji(category: Option<IngredientCategory>) -> &'static str {
    use IngredientCategory::*;
    match category {
        Some(Fruits) => "🍓",
        Some(Vegetables) => "🥦",
        Some(Meat) => "🍗",
        Some(Fish) => "🐟",
        Some(Legumes) => "🫘",
        Some(Dairy) => "🍶",
        Some(Cereals) => "🌾",
        Some(FatsAndOils) => "🧈",
        Some(Nuts) => "🥜",
        _ => DEFAULT_EMOJI,
    }
}

/// Bootstrap border class for a recipe card.
pub fn category_card_class(category: Option<IngredientCategory>) -> &'static str {
    use IngredientCategory::*;
    match category {
        Some(Fruits | Vegetables) => "border-success",
        Some(Meat) => "border-danger",
        Some(Fish) => "border-primary",
        Some(Legumes | Cereals | FatsAndOils) => "border-warning",
        Some(Dairy) => "border-light",
        Some(Nuts) => "border-dark",
        _ => DEFAULT_CARD_CLASS,
    }
}

/// Most frequent ingredient category; ties go to the one seen first.
/// Uncategorised ingredients count as a bucket of their own, and `None`
/// is returned when that bucket wins or there are no ingredients.
pub fn dominant_category(ingredients: &[IngredientSummary]) -> Option<IngredientCategory> {
    let mut counts: Vec<(Option<IngredientCategory>, usize)> = Vec::new();
    for category in ingredients.iter().map(|i| i.category) {
        match counts.iter_mut().find(|(c, _)| *c == category) {
            Some((_, n)) => *n += 1,
            None => counts.push((category, 1)),
        }
    }

    let mut best: Option<(Option<IngredientCategory>, usize)> = None;
    for (category, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((category, n));
        }
    }
    best.and_then(|(category, _)| category)
}

pub fn recipe_emoji(recipe: &RecipeRef) -> &'static str {
    category_emoji(dominant_category(&recipe.ingredients))
}

pub fn recipe_card_class(recipe: &RecipeRef) -> &'static str {
    category_card_class(dominant_category(&recipe.ingredients))
}

/// Overview of a persisted menu as shown in the menu list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSummary {
    pub menu_id: i64,
    pub recipe_count: usize,
    pub recipe_names: Vec<String>,
    pub categories: Vec<String>,
}

impl MenuSummary {
    pub fn of(menu: &WeeklyMenu) -> Self {
        let mut recipe_names: Vec<String> = Vec::new();
        let mut categories: Vec<String> = Vec::new();
        let mut recipe_count = 0;

        for entry in &menu.entries {
            recipe_count += entry.recipes.len();
            if !categories.iter().any(|c| c == entry.category.as_str()) {
                categories.push(entry.category.to_string());
            }
            for recipe in &entry.recipes {
                if !recipe_names.contains(&recipe.name) {
                    recipe_names.push(recipe.name.clone());
                }
            }
        }

        Self {
            menu_id: menu.id,
            recipe_count,
            recipe_names,
            categories,
        }
    }
}

fn cell_text(recipes: &[RecipeRef]) -> String {
    recipes
        .iter()
        .map(|r| format!("{} {}", recipe_emoji(r), r.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Plain-text table: one line per weekday, one column per category.
pub fn render_grid(grid: &MenuGrid) -> String {
    let mut out = String::new();
    let mut current = None;
    for (day, category, recipes) in grid.rows() {
        if current != Some(day) {
            if current.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("{:<10}", day.label()));
            current = Some(day);
        }
        let text = if recipes.is_empty() { "-".to_string() } else { cell_text(recipes) };
        out.push_str(&format!(" | {category}: {text}"));
    }
    if current.is_some() {
        out.push('\n');
    }
    out
}

/// CSV export: header `dia,<categories...>`, one row per weekday.
pub fn write_csv<W: io::Write>(grid: &MenuGrid, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["dia".to_string()];
    header.extend(grid.categories().iter().map(|c| c.to_string()));
    wtr.write_record(&header)?;

    let mut row: Vec<String> = Vec::new();
    let mut current = None;
    for (day, _, recipes) in grid.rows() {
        if current != Some(day) {
            if !row.is_empty() {
                wtr.write_record(&row)?;
                row.clear();
            }
            row.push(day.label().to_string());
            current = Some(day);
        }
        let names: Vec<&str> = recipes.iter().map(|r| r.name.as_str()).collect();
        row.push(names.join("; "));
    }
    if !row.is_empty() {
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::menu::{DayMeal, MealCategory, Weekday};

    fn ingredient(category: IngredientCategory) -> IngredientSummary {
        IngredientSummary {
            id: None,
            name: String::new(),
            category: Some(category),
        }
    }

    #[test]
    fn dominant_category_prefers_majority_then_first_seen() {
        use IngredientCategory::*;
        let majority = [ingredient(Meat), ingredient(Vegetables), ingredient(Vegetables)];
        assert_eq!(dominant_category(&majority), Some(Vegetables));

        let tie = [ingredient(Fish), ingredient(Dairy), ingredient(Dairy), ingredient(Fish)];
        assert_eq!(dominant_category(&tie), Some(Fish));

        assert_eq!(dominant_category(&[]), None);
    }

    #[test]
    fn uncategorised_majority_falls_back_to_default() {
        let mut recipe = RecipeRef::new(3, "Guiso");
        recipe.ingredients = vec![
            IngredientSummary { id: None, name: "Sal".into(), category: None },
            IngredientSummary { id: None, name: "Agua".into(), category: None },
            ingredient(IngredientCategory::Meat),
        ];
        assert_eq!(dominant_category(&recipe.ingredients), None);
        assert_eq!(recipe_emoji(&recipe), "🍴");
        assert_eq!(recipe_card_class(&recipe), "border-0");

        recipe.ingredients.push(ingredient(IngredientCategory::Meat));
        recipe.ingredients.push(ingredient(IngredientCategory::Meat));
        assert_eq!(recipe_emoji(&recipe), "🍗");
    }

    #[test]
    fn recipes_without_ingredients_use_defaults() {
        let recipe = RecipeRef::new(1, "Agua");
        assert_eq!(recipe_emoji(&recipe), "🍴");
        assert_eq!(recipe_card_class(&recipe), "border-0");
    }

    #[test]
    fn emoji_and_class_follow_dominant_category() {
        let mut recipe = RecipeRef::new(2, "Macedonia");
        recipe.ingredients = vec![ingredient(IngredientCategory::Fruits)];
        assert_eq!(recipe_emoji(&recipe), "🍓");
        assert_eq!(recipe_card_class(&recipe), "border-success");
        assert_eq!(category_emoji(Some(IngredientCategory::Spices)), "🍴");
    }

    #[test]
    fn summary_counts_and_dedupes() {
        let menu = WeeklyMenu {
            id: 5,
            owner_id: None,
            entries: vec![
                DayMeal {
                    id: None,
                    weekday: Weekday::Monday,
                    category: MealCategory::CENA,
                    recipes: vec![RecipeRef::new(1, "Sopa"), RecipeRef::new(2, "Tortilla")],
                },
                DayMeal {
                    id: None,
                    weekday: Weekday::Tuesday,
                    category: MealCategory::DESAYUNO,
                    recipes: vec![RecipeRef::new(1, "Sopa")],
                },
                DayMeal {
                    id: None,
                    weekday: Weekday::Tuesday,
                    category: MealCategory::CENA,
                    recipes: vec![],
                },
            ],
        };

        let summary = MenuSummary::of(&menu);
        assert_eq!(summary.recipe_count, 3);
        assert_eq!(summary.recipe_names, vec!["Sopa", "Tortilla"]);
        assert_eq!(summary.categories, vec!["CENA", "DESAYUNO"]);
    }

    #[test]
    fn csv_has_a_row_per_weekday() {
        let mut grid = MenuGrid::empty(&[MealCategory::COMIDA, MealCategory::CENA]).unwrap();
        grid.add_recipe(Weekday::Monday, &MealCategory::CENA, RecipeRef::new(1, "Sopa"))
            .unwrap();
        grid.add_recipe(Weekday::Monday, &MealCategory::CENA, RecipeRef::new(2, "Pan"))
            .unwrap();

        let mut buf = Vec::new();
        write_csv(&grid, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "dia,COMIDA,CENA");
        assert_eq!(lines[1], "Lunes,,Sopa; Pan");
        assert_eq!(lines[7], "Domingo,,");
    }

    #[test]
    fn text_table_lists_every_day() {
        let mut grid = MenuGrid::empty(&[MealCategory::CENA]).unwrap();
        grid.add_recipe(Weekday::Sunday, &MealCategory::CENA, RecipeRef::new(1, "Sopa"))
            .unwrap();

        let text = render_grid(&grid);
        assert_eq!(text.lines().count(), 7);
        assert!(text.lines().last().unwrap().ends_with("CENA: 🍴 Sopa"));
        assert!(text.starts_with("Lunes"));
    }
}
