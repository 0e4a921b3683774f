use std::fmt;

use reqwest::Url;

use crate::models::menu::{MealCategory, MenuId};
use crate::session::Session;

const APP_ORIGIN: &str = "http://superlista.local";

/// Screens of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    Home,
    Ingredients,
    Recipes,
    Menus,
    /// New menu with these columns (may be empty when none were chosen).
    CreateMenu { categories: Vec<MealCategory> },
    EditMenu { menu_id: MenuId },
    ShoppingLists,
}

impl Route {
    /// Resolve an application path such as `/superlista/crear-menu?menuId=4`.
    /// Anything unknown lands on [`Route::Landing`].
    pub fn parse(raw: &str) -> Route {
        let raw = raw.trim().trim_start_matches('/');
        let url = match Url::parse(&format!("{APP_ORIGIN}/{raw}")) {
            Ok(url) => url,
            Err(_) => return Route::Landing,
        };

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            ["auth", "login"] => Route::Login,
            ["auth", "registro"] => Route::Register,
            ["superlista", "home"] => Route::Home,
            ["superlista", "ingredientes"] => Route::Ingredients,
            ["superlista", "recetas"] => Route::Recipes,
            ["superlista", "menu"] => Route::Menus,
            ["superlista", "mis-listas"] => Route::ShoppingLists,
            ["superlista", "crear-menu"] => Self::menu_form(&url),
            _ => Route::Landing,
        }
    }

    fn menu_form(url: &Url) -> Route {
        let mut categories = Vec::new();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "menuId" => {
                    if let Ok(menu_id) = value.trim().parse() {
                        return Route::EditMenu { menu_id };
                    }
                }
                "categorias" => categories = MealCategory::parse_list(&value),
                _ => {}
            }
        }
        Route::CreateMenu { categories }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".into(),
            Route::Login => "/auth/login".into(),
            Route::Register => "/auth/registro".into(),
            Route::Home => "/superlista/home".into(),
            Route::Ingredients => "/superlista/ingredientes".into(),
            Route::Recipes => "/superlista/recetas".into(),
            Route::Menus => "/superlista/menu".into(),
            Route::ShoppingLists => "/superlista/mis-listas".into(),
            Route::EditMenu { menu_id } => with_query(MENU_FORM, "menuId", &menu_id.to_string()),
            Route::CreateMenu { categories } if categories.is_empty() => MENU_FORM.into(),
            Route::CreateMenu { categories } => {
                let joined: Vec<&str> = categories.iter().map(MealCategory::as_str).collect();
                with_query(MENU_FORM, "categorias", &joined.join(","))
            }
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Route::Landing | Route::Login | Route::Register)
    }
}

const MENU_FORM: &str = "/superlista/crear-menu";

/// `path?key=value` with the value form-encoded.
fn with_query(path: &str, key: &str, value: &str) -> String {
    let mut url = match Url::parse(&format!("{APP_ORIGIN}{path}")) {
        Ok(url) => url,
        Err(_) => return path.to_string(),
    };
    url.query_pairs_mut().append_pair(key, value);
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where the user actually ends up when asking for `route`.
pub fn guard(session: &Session, route: Route) -> Route {
    if route.is_public() || session.is_authenticated() {
        route
    } else {
        tracing::debug!("Anonymous access to {}, redirecting to login", route);
        Route::Login
    }
}
