use std::collections::BTreeSet;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use superlista_client::{
    client::ApiClient,
    config::Config,
    display::{self, MenuSummary},
    models::{
        auth::LoginRequest,
        ingredient::IngredientCategory,
        menu::{MealCategory, MenuId, RecipeId, Weekday},
        user::RegisterRequest,
    },
    navigation::{guard, Route},
    planner::{MenuEditor, MenuGrid},
    services::{
        auth::AuthService, ingredients::IngredientService, menu::MenuService,
        recipes::RecipeService, shopping_lists::ShoppingListService, users::UserService,
    },
    session::TokenStore,
};

#[derive(Parser)]
#[command(name = "superlista", about = "Plan weekly menus and shopping lists against a SúperLista backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and remember the token
    Login {
        username: String,
        #[arg(long, env = "SUPERLISTA_PASSWORD")]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Create an account
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, env = "SUPERLISTA_PASSWORD")]
        password: String,
    },
    /// Show a user's profile
    Profile { email: String },
    /// List my menus
    Menus,
    /// Print one menu as a table
    Show { menu_id: MenuId },
    /// Export one menu as CSV (stdout unless --output is given)
    Export {
        menu_id: MenuId,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Create a menu, or edit one with --menu-id
    Plan {
        #[arg(long)]
        menu_id: Option<MenuId>,
        /// Comma separated columns for a new menu (defaults to all five)
        #[arg(long)]
        categories: Option<String>,
        /// DAY:CATEGORY:RECIPE_ID, repeatable
        #[arg(long = "assign")]
        assign: Vec<String>,
        /// DAY:CATEGORY:RECIPE_ID, repeatable
        #[arg(long = "remove")]
        remove: Vec<String>,
    },
    /// Delete a menu
    Delete { menu_id: MenuId },
    /// List recipes, optionally searching by name
    Recipes {
        #[arg(long)]
        search: Option<String>,
    },
    /// List ingredients, optionally of one category
    Ingredients {
        #[arg(long)]
        category: Option<String>,
    },
    /// List my shopping lists
    Lists,
    /// Generate a shopping list from a menu
    GenerateList { menu_id: MenuId },
    /// Set the exact ingredients of a shopping list
    SetItems {
        list_id: i64,
        ingredient_ids: Vec<i64>,
    },
}

impl Command {
    fn route(&self) -> Route {
        match self {
            Command::Login { .. } | Command::Logout => Route::Login,
            Command::Register { .. } => Route::Register,
            Command::Profile { .. } => Route::Home,
            Command::Menus | Command::Show { .. } | Command::Export { .. } | Command::Delete { .. } => {
                Route::Menus
            }
            Command::Plan {
                menu_id: Some(menu_id),
                ..
            } => Route::EditMenu { menu_id: *menu_id },
            Command::Plan { categories, .. } => Route::CreateMenu {
                categories: categories.as_deref().map(MealCategory::parse_list).unwrap_or_default(),
            },
            Command::Recipes { .. } => Route::Recipes,
            Command::Ingredients { .. } => Route::Ingredients,
            Command::Lists | Command::GenerateList { .. } | Command::SetItems { .. } => {
                Route::ShoppingLists
            }
        }
    }
}

/// `LUNES:CENA:12`
fn parse_assignment(raw: &str) -> anyhow::Result<(Weekday, MealCategory, RecipeId)> {
    let mut parts = raw.splitn(3, ':');
    let (Some(day), Some(category), Some(id)) = (parts.next(), parts.next(), parts.next()) else {
        bail!("Formato esperado DIA:CATEGORIA:ID_RECETA, recibido '{raw}'");
    };
    let id = id
        .trim()
        .parse()
        .with_context(|| format!("Id de receta no válido en '{raw}'"))?;
    Ok((day.parse()?, MealCategory::new(category), id))
}

async fn plan(
    client: Arc<ApiClient>,
    menu_id: Option<MenuId>,
    categories: Option<String>,
    assign: Vec<String>,
    remove: Vec<String>,
) -> anyhow::Result<()> {
    let mut columns = categories.as_deref().map(MealCategory::parse_list).unwrap_or_default();
    if columns.is_empty() {
        columns = MealCategory::DEFAULTS.to_vec();
    }

    let mut editor = MenuEditor::start(client.clone(), menu_id, &columns).await?;

    if !assign.is_empty() {
        let catalogue = RecipeService::list(&client).await?;
        for raw in &assign {
            let (day, category, id) = parse_assignment(raw)?;
            let recipe = catalogue
                .iter()
                .find(|r| r.id == Some(id))
                .and_then(|r| r.to_ref())
                .ok_or_else(|| anyhow!("La receta {id} no existe"))?;
            if !editor.add_recipe_to_cell(day, &category, recipe)? {
                info!("Recipe {} already in {}/{}", id, day, category);
            }
        }
    }
    for raw in &remove {
        let (day, category, id) = parse_assignment(raw)?;
        editor.remove_recipe_from_cell(day, &category, id)?;
    }

    println!("{}", display::render_grid(editor.grid()));

    match editor.save().await {
        Ok(outcome) => {
            println!("{} (menú {}) → {}", outcome.message(), outcome.menu_id, outcome.redirect);
            Ok(())
        }
        Err(e) => {
            if let Some(orphan) = e.orphaned_shell() {
                warn!(
                    "Menu {} exists without recipes; run again with --menu-id {} to fill it",
                    orphan, orphan
                );
            }
            Err(e.into())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let mut client = ApiClient::new(&config)?;
    if config.api_token.is_none() {
        client = client.with_session(TokenStore::load(&config.token_file)?);
    }
    let client = Arc::new(client);

    let wanted = cli.command.route();
    if guard(&client.session(), wanted.clone()) != wanted {
        bail!("Inicia sesión con `superlista login` para acceder a {wanted}");
    }

    match cli.command {
        Command::Login { username, password } => {
            let token = AuthService::login(&client, &LoginRequest { username, password }).await?;
            TokenStore::save(&config.token_file, &token)?;
            println!("Sesión iniciada como {}", token.username().unwrap_or("?"));
        }
        Command::Logout => {
            AuthService::logout(&client);
            TokenStore::clear(&config.token_file)?;
            println!("Sesión cerrada");
        }
        Command::Register {
            username,
            email,
            first_name,
            last_name,
            password,
        } => {
            let req = RegisterRequest {
                username,
                password,
                first_name,
                last_name,
                email,
            };
            UserService::register(&client, &req).await?;
            println!("Usuario {} registrado → {}", req.username, Route::Login);
        }
        Command::Profile { email } => {
            let user = UserService::profile(&client, &email).await?;
            println!("{} {} <{}> ({})", user.first_name, user.last_name, user.email, user.username);
            println!("Menús: {}  Listas: {}", user.menus.len(), user.shopping_lists.len());
        }
        Command::Menus => {
            for menu in MenuService::list_mine(&client).await? {
                let summary = MenuSummary::of(&menu);
                println!(
                    "#{}  {} recetas  [{}]  {}",
                    summary.menu_id,
                    summary.recipe_count,
                    summary.categories.join(", "),
                    summary.recipe_names.join(", ")
                );
            }
        }
        Command::Show { menu_id } => {
            let menu = MenuService::fetch(&client, menu_id).await?;
            print!("{}", display::render_grid(&MenuGrid::from_menu(&menu)));
        }
        Command::Export { menu_id, output } => {
            let menu = MenuService::fetch(&client, menu_id).await?;
            let grid = MenuGrid::from_menu(&menu);
            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Creating {}", path.display()))?;
                    display::write_csv(&grid, file)?;
                    info!("Menu {} exported to {}", menu_id, path.display());
                }
                None => display::write_csv(&grid, std::io::stdout().lock())?,
            }
        }
        Command::Plan {
            menu_id,
            categories,
            assign,
            remove,
        } => plan(client.clone(), menu_id, categories, assign, remove).await?,
        Command::Delete { menu_id } => {
            MenuService::delete(&client, menu_id).await?;
            println!("Menú {menu_id} eliminado");
        }
        Command::Recipes { search } => {
            let recipes = match search {
                Some(name) => RecipeService::search(&client, &name).await?,
                None => RecipeService::list(&client).await?,
            };
            for recipe in recipes {
                let emoji = recipe.to_ref().map_or("🍴", |r| display::recipe_emoji(&r));
                println!("{} {:>5}  {}", emoji, recipe.id.unwrap_or_default(), recipe.name);
            }
        }
        Command::Ingredients { category } => {
            let ingredients = match category {
                Some(raw) => {
                    let category: IngredientCategory = raw.parse()?;
                    IngredientService::by_category(&client, category).await?
                }
                None => IngredientService::list(&client).await?,
            };
            for ingredient in ingredients {
                println!(
                    "{} {:>5}  {}",
                    display::category_emoji(ingredient.category),
                    ingredient.id.unwrap_or_default(),
                    ingredient.name
                );
            }
        }
        Command::Lists => {
            for list in ShoppingListService::list_mine(&client).await? {
                let names: Vec<&str> = list.items.iter().map(|i| i.name.as_str()).collect();
                println!("#{}  {}", list.id, names.join(", "));
            }
        }
        Command::GenerateList { menu_id } => {
            let list = ShoppingListService::generate(&client, menu_id).await?;
            println!("Lista {} generada con {} ingredientes", list.id, list.items.len());
        }
        Command::SetItems {
            list_id,
            ingredient_ids,
        } => {
            let list = ShoppingListService::list_mine(&client)
                .await?
                .into_iter()
                .find(|l| l.id == list_id)
                .ok_or_else(|| anyhow!("La lista {list_id} no existe"))?;
            let wanted: BTreeSet<i64> = ingredient_ids.into_iter().collect();
            let changes = ShoppingListService::sync_items(&client, &list, &wanted).await?;
            if changes.is_empty() {
                println!("La lista {list_id} ya estaba al día");
            } else {
                println!(
                    "Lista {list_id}: {} añadidos, {} quitados",
                    changes.added.len(),
                    changes.removed.len()
                );
            }
        }
    }

    Ok(())
}
