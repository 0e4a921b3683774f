use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::menu::WeeklyMenu;
use super::shopping_list::ShoppingList;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    User,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Admin => "ADMIN",
            UserRole::User => "USER",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(UserRole::Admin),
            "USER" => Ok(UserRole::User),
            _ => Err(anyhow::anyhow!("Rol desconocido: {s}")),
        }
    }
}

/// Profile returned by POST /usuarios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Option<i64>,
    pub username: String,
    #[serde(rename = "nombre", default)]
    pub first_name: String,
    #[serde(rename = "apellido", default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "rol", default)]
    pub role: Option<UserRole>,
    #[serde(rename = "fechaCreacion", default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "listaCompras", default)]
    pub shopping_lists: Vec<ShoppingList>,
    #[serde(rename = "menuSemanal", default)]
    pub menus: Vec<WeeklyMenu>,
}

/// Body for POST /usuarios.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ProfileLookup {
    #[validate(email)]
    pub email: String,
}

/// Sign-up form, sent to POST /usuarios/nuevo.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "El nombre de usuario es obligatorio"))]
    pub username: String,
    #[validate(length(min = 1, message = "La contraseña es obligatoria"))]
    pub password: String,
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 50, message = "El nombre es obligatorio"))]
    pub first_name: String,
    #[serde(rename = "apellido")]
    #[validate(length(min = 1, max = 50, message = "El apellido es obligatorio"))]
    pub last_name: String,
    #[validate(email(message = "El correo electrónico no es válido"))]
    pub email: String,
}

/// Body for POST /usuarios/actualizar. Changing the password needs the old one.
#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "validate_password_change"))]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "El nombre de usuario es obligatorio"))]
    pub username: String,
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 50, message = "El nombre es obligatorio"))]
    pub first_name: String,
    #[serde(rename = "apellido")]
    #[validate(length(min = 1, max = 50, message = "El apellido es obligatorio"))]
    pub last_name: String,
    #[validate(email(message = "El correo electrónico no es válido"))]
    pub email: String,
    #[serde(rename = "passwordAntiguo", skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,
    #[serde(rename = "passwordNuevo", skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

fn validate_password_change(req: &UpdateProfileRequest) -> Result<(), ValidationError> {
    let wants_change = req.new_password.as_deref().is_some_and(|p| !p.is_empty());
    let has_old = req.old_password.as_deref().is_some_and(|p| !p.is_empty());
    if wants_change && !has_old {
        return Err(ValidationError::new("old_password_required"));
    }
    Ok(())
}
