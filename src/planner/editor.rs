use thiserror::Error;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::backend::MenuBackend;
use super::grid::{GridError, MenuGrid};
use crate::error::ApiError;
use crate::models::menu::{MealCategory, MenuId, RecipeId, RecipeRef, Weekday};
use crate::navigation::Route;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no se pudo recuperar el menú {menu_id}: {source}")]
    Fetch {
        menu_id: MenuId,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("el menú no tiene ninguna receta")]
    EmptyMenu,

    #[error("no se pudo crear el menú: {0}")]
    ShellCreation(#[source] ApiError),

    #[error("no se pudo guardar el menú {menu_id}: {source}")]
    ContentSubmission {
        menu_id: MenuId,
        #[source]
        source: ApiError,
    },

    /// The empty menu exists on the server but its recipes were not stored.
    #[error("el menú {menu_id} se creó pero no se pudieron asignar sus recetas: {source}")]
    ContentAssignment {
        menu_id: MenuId,
        #[source]
        source: ApiError,
    },
}

impl SaveError {
    /// Id of a menu created by this save and left without contents.
    pub fn orphaned_shell(&self) -> Option<MenuId> {
        match self {
            SaveError::ContentAssignment { menu_id, .. } => Some(*menu_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub menu_id: MenuId,
    pub created: bool,
    pub redirect: Route,
}

impl SaveOutcome {
    pub fn message(&self) -> &'static str {
        if self.created {
            "Menú creado correctamente"
        } else {
            "Menú guardado correctamente"
        }
    }
}

/// Editing session for one weekly menu.
///
/// Holds the grid in memory and publishes a snapshot after every change.
/// Nothing reaches the backend until [`MenuEditor::save`].
pub struct MenuEditor<B> {
    backend: B,
    menu_id: Option<MenuId>,
    grid: MenuGrid,
    updates: watch::Sender<MenuGrid>,
}

impl<B: MenuBackend> MenuEditor<B> {
    /// Start a new, unsaved menu with these columns.
    pub fn create(backend: B, categories: &[MealCategory]) -> Result<Self, EditorError> {
        let grid = MenuGrid::empty(categories)?;
        Ok(Self::with_grid(backend, None, grid))
    }

    /// Load an existing menu for editing.
    pub async fn open(backend: B, menu_id: MenuId) -> Result<Self, EditorError> {
        let menu = backend
            .fetch_menu(menu_id)
            .await
            .map_err(|source| EditorError::Fetch { menu_id, source })?;
        let grid = MenuGrid::from_menu(&menu);
        tracing::debug!("Loaded menu {} ({} cells)", menu_id, grid.cell_count());
        Ok(Self::with_grid(backend, Some(menu_id), grid))
    }

    /// Edit `menu_id` when given, otherwise start a new menu with `categories`.
    pub async fn start(
        backend: B,
        menu_id: Option<MenuId>,
        categories: &[MealCategory],
    ) -> Result<Self, EditorError> {
        match menu_id {
            Some(id) => Self::open(backend, id).await,
            None => Self::create(backend, categories),
        }
    }

    fn with_grid(backend: B, menu_id: Option<MenuId>, grid: MenuGrid) -> Self {
        let (updates, _) = watch::channel(grid.clone());
        Self {
            backend,
            menu_id,
            grid,
            updates,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<MenuGrid> {
        self.updates.subscribe()
    }

    /// Current grid first, then one item per change.
    pub fn updates(&self) -> WatchStream<MenuGrid> {
        WatchStream::new(self.updates.subscribe())
    }

    pub fn grid(&self) -> &MenuGrid {
        &self.grid
    }

    pub fn menu_id(&self) -> Option<MenuId> {
        self.menu_id
    }

    pub fn add_recipe_to_cell(
        &mut self,
        weekday: Weekday,
        category: &MealCategory,
        recipe: RecipeRef,
    ) -> Result<bool, GridError> {
        let added = self.grid.add_recipe(weekday, category, recipe)?;
        self.publish();
        Ok(added)
    }

    pub fn remove_recipe_from_cell(
        &mut self,
        weekday: Weekday,
        category: &MealCategory,
        recipe_id: RecipeId,
    ) -> Result<bool, GridError> {
        let removed = self.grid.remove_recipe(weekday, category, recipe_id)?;
        self.publish();
        Ok(removed)
    }

    fn publish(&self) {
        self.updates.send_replace(self.grid.clone());
    }

    /// Persist the grid. A new menu is created first and its id kept, so a
    /// retry after a failed assignment updates that menu instead of making
    /// another one.
    pub async fn save(&mut self) -> Result<SaveOutcome, SaveError> {
        if !self.grid.has_recipes() {
            return Err(SaveError::EmptyMenu);
        }
        let entries = self.grid.build_payload();

        if let Some(menu_id) = self.menu_id {
            self.backend
                .submit_menu_contents(menu_id, &entries)
                .await
                .map_err(|source| SaveError::ContentSubmission { menu_id, source })?;
            tracing::info!("Saved menu {}", menu_id);
            return Ok(SaveOutcome {
                menu_id,
                created: false,
                redirect: Route::Menus,
            });
        }

        let menu_id = self
            .backend
            .create_menu_shell(self.grid.categories())
            .await
            .map_err(SaveError::ShellCreation)?;
        self.menu_id = Some(menu_id);

        self.backend
            .submit_menu_contents(menu_id, &entries)
            .await
            .map_err(|source| {
                tracing::warn!("Menu {} created without contents: {}", menu_id, source);
                SaveError::ContentAssignment { menu_id, source }
            })?;

        tracing::info!("Created menu {}", menu_id);
        Ok(SaveOutcome {
            menu_id,
            created: true,
            redirect: Route::Menus,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiResult;
    use crate::models::menu::{DayMeal, MenuContentEntry, WeeklyMenu};
    use async_trait::async_trait;
    use std::sync::{Arc, RwLock};
    use tokio_stream::StreamExt;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Fetch(MenuId),
        CreateShell(Vec<MealCategory>),
        Submit(MenuId, Vec<MenuContentEntry>),
    }

    /// In-memory backend recording every call.
    #[derive(Default)]
    struct FakeBackend {
        calls: RwLock<Vec<Call>>,
        menu: Option<WeeklyMenu>,
        shell_id: Option<MenuId>,
        failing_submits: RwLock<usize>,
    }

    impl FakeBackend {
        fn calls(&self) -> Vec<Call> {
            self.calls.read().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.write().unwrap().push(call);
        }
    }

    fn unavailable() -> ApiError {
        ApiError::Status {
            status: 503,
            message: "Servicio no disponible".into(),
        }
    }

    #[async_trait]
    impl MenuBackend for FakeBackend {
        async fn fetch_menu(&self, id: MenuId) -> ApiResult<WeeklyMenu> {
            self.record(Call::Fetch(id));
            self.menu.clone().ok_or_else(unavailable)
        }

        async fn create_menu_shell(&self, categories: &[MealCategory]) -> ApiResult<MenuId> {
            self.record(Call::CreateShell(categories.to_vec()));
            self.shell_id.ok_or_else(unavailable)
        }

        async fn submit_menu_contents(&self, menu_id: MenuId, entries: &[MenuContentEntry]) -> ApiResult<()> {
            self.record(Call::Submit(menu_id, entries.to_vec()));
            let mut failing = self.failing_submits.write().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(unavailable());
            }
            Ok(())
        }
    }

    fn submitted(call: &Call) -> Option<(MenuId, &[MenuContentEntry])> {
        match call {
            Call::Submit(id, entries) => Some((*id, entries.as_slice())),
            _ => None,
        }
    }

    #[tokio::test]
    async fn create_path_creates_shell_then_submits() {
        let backend = Arc::new(FakeBackend {
            shell_id: Some(42),
            ..Default::default()
        });
        let mut editor =
            MenuEditor::create(backend.clone(), &[MealCategory::DESAYUNO, MealCategory::COMIDA]).unwrap();
        editor
            .add_recipe_to_cell(Weekday::Monday, &MealCategory::DESAYUNO, RecipeRef::new(5, "Tostadas"))
            .unwrap();

        let outcome = editor.save().await.unwrap();
        assert_eq!(outcome.menu_id, 42);
        assert!(outcome.created);
        assert_eq!(outcome.redirect, Route::Menus);
        assert_eq!(outcome.message(), "Menú creado correctamente");
        assert_eq!(editor.menu_id(), Some(42));

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            Call::CreateShell(vec![MealCategory::DESAYUNO, MealCategory::COMIDA])
        );
        let (id, entries) = submitted(&calls[1]).unwrap();
        assert_eq!(id, 42);
        assert_eq!(entries.len(), 14);
        let filled: Vec<&MenuContentEntry> = entries.iter().filter(|e| !e.recipe_ids.is_empty()).collect();
        assert_eq!(
            filled,
            vec![&MenuContentEntry {
                weekday: Weekday::Monday,
                category: MealCategory::DESAYUNO,
                recipe_ids: vec![5],
            }]
        );
    }

    #[tokio::test]
    async fn edit_path_submits_to_existing_menu() {
        let menu = WeeklyMenu {
            id: 7,
            owner_id: Some(1),
            entries: vec![DayMeal {
                id: None,
                weekday: Weekday::Wednesday,
                category: MealCategory::CENA,
                recipes: vec![RecipeRef::new(3, "Crema")],
            }],
        };
        let backend = Arc::new(FakeBackend {
            menu: Some(menu),
            ..Default::default()
        });
        let mut editor = MenuEditor::open(backend.clone(), 7).await.unwrap();
        editor
            .add_recipe_to_cell(Weekday::Friday, &MealCategory::CENA, RecipeRef::new(8, "Pisto"))
            .unwrap();

        let outcome = editor.save().await.unwrap();
        assert_eq!(outcome.menu_id, 7);
        assert!(!outcome.created);
        assert_eq!(outcome.redirect, Route::Menus);
        assert_eq!(outcome.message(), "Menú guardado correctamente");

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert!(!calls.iter().any(|c| matches!(c, Call::CreateShell(_))));
        let (id, entries) = submitted(&calls[1]).unwrap();
        assert_eq!(id, 7);
        assert_eq!(entries.len(), 7);
        assert_eq!(entries.iter().map(|e| e.recipe_ids.len()).sum::<usize>(), 2);
    }

    #[tokio::test]
    async fn empty_menu_is_not_sent() {
        let backend = Arc::new(FakeBackend {
            shell_id: Some(42),
            ..Default::default()
        });
        let mut editor = MenuEditor::create(backend.clone(), &MealCategory::DEFAULTS).unwrap();

        assert!(matches!(editor.save().await, Err(SaveError::EmptyMenu)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn edit_failure_keeps_grid_and_stays_put() {
        let menu = WeeklyMenu {
            id: 7,
            owner_id: Some(1),
            entries: vec![DayMeal {
                id: None,
                weekday: Weekday::Thursday,
                category: MealCategory::COMIDA,
                recipes: vec![RecipeRef::new(3, "Cocido")],
            }],
        };
        let backend = Arc::new(FakeBackend {
            menu: Some(menu),
            failing_submits: RwLock::new(1),
            ..Default::default()
        });
        let mut editor = MenuEditor::start(backend.clone(), Some(7), &[]).await.unwrap();
        let before = editor.grid().clone();

        let err = editor.save().await.unwrap_err();
        assert!(matches!(err, SaveError::ContentSubmission { menu_id: 7, .. }));
        assert_eq!(err.orphaned_shell(), None);
        assert_eq!(editor.grid(), &before);
        assert_eq!(editor.menu_id(), Some(7));

        let calls = backend.calls();
        assert_eq!(calls[0], Call::Fetch(7));
        assert_eq!(submitted(&calls[1]).map(|(id, _)| id), Some(7));
    }

    #[tokio::test]
    async fn failed_fetch_produces_no_editor() {
        let backend = Arc::new(FakeBackend::default());
        let err = MenuEditor::open(backend, 99).await.err().unwrap();
        assert!(matches!(err, EditorError::Fetch { menu_id: 99, .. }));
    }

    #[tokio::test]
    async fn shell_failure_skips_contents() {
        let backend = Arc::new(FakeBackend::default());
        let mut editor = MenuEditor::create(backend.clone(), &[MealCategory::CENA]).unwrap();
        editor
            .add_recipe_to_cell(Weekday::Sunday, &MealCategory::CENA, RecipeRef::new(1, "Sopa"))
            .unwrap();

        assert!(matches!(editor.save().await, Err(SaveError::ShellCreation(_))));
        assert_eq!(backend.calls().len(), 1);
        assert_eq!(editor.menu_id(), None);
    }

    #[tokio::test]
    async fn retry_after_assignment_failure_reuses_shell() {
        let backend = Arc::new(FakeBackend {
            shell_id: Some(12),
            failing_submits: RwLock::new(1),
            ..Default::default()
        });
        let mut editor = MenuEditor::create(backend.clone(), &[MealCategory::CENA]).unwrap();
        editor
            .add_recipe_to_cell(Weekday::Tuesday, &MealCategory::CENA, RecipeRef::new(2, "Crema"))
            .unwrap();

        let err = editor.save().await.unwrap_err();
        assert_eq!(err.orphaned_shell(), Some(12));

        let outcome = editor.save().await.unwrap();
        assert_eq!(outcome.menu_id, 12);
        assert!(!outcome.created);

        let shells = backend
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::CreateShell(_)))
            .count();
        assert_eq!(shells, 1);
    }

    #[tokio::test]
    async fn every_change_is_published() {
        let backend = Arc::new(FakeBackend::default());
        let mut editor = MenuEditor::create(backend, &[MealCategory::COMIDA]).unwrap();
        let mut updates = editor.updates();

        let initial = updates.next().await.unwrap();
        assert_eq!(initial.recipe_count(), 0);

        editor
            .add_recipe_to_cell(Weekday::Monday, &MealCategory::COMIDA, RecipeRef::new(1, "Lentejas"))
            .unwrap();
        assert_eq!(updates.next().await.unwrap().recipe_count(), 1);

        editor
            .remove_recipe_from_cell(Weekday::Monday, &MealCategory::COMIDA, 1)
            .unwrap();
        assert_eq!(updates.next().await.unwrap().recipe_count(), 0);
    }

    #[tokio::test]
    async fn rejected_change_is_not_published() {
        let backend = Arc::new(FakeBackend::default());
        let mut editor = MenuEditor::create(backend, &[MealCategory::COMIDA]).unwrap();
        let mut rx = editor.subscribe();

        let err = editor
            .add_recipe_to_cell(Weekday::Monday, &MealCategory::CENA, RecipeRef::new(1, "Lentejas"))
            .unwrap_err();
        assert!(matches!(err, GridError::UnknownCell { .. }));
        assert!(!rx.has_changed().unwrap());
    }
}
