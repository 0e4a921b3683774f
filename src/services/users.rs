use validator::Validate;

use crate::{
    client::ApiClient,
    error::{ApiError, ApiResult},
    models::user::{ProfileLookup, RegisterRequest, UpdateProfileRequest, UserProfile},
};

pub struct UserService;

impl UserService {
    pub async fn register(client: &ApiClient, req: &RegisterRequest) -> ApiResult<()> {
        req.validate()?;
        let created: bool = client.post_data(&["usuarios", "nuevo"], req).await?;
        if !created {
            return Err(ApiError::Rejected(format!(
                "No se pudo registrar el usuario {}",
                req.username
            )));
        }
        tracing::info!("Registered user {}", req.username);
        Ok(())
    }

    pub async fn profile(client: &ApiClient, email: &str) -> ApiResult<UserProfile> {
        let req = ProfileLookup {
            email: email.trim().to_string(),
        };
        req.validate()?;
        client.post_data(&["usuarios"], &req).await
    }

    pub async fn update(client: &ApiClient, req: &UpdateProfileRequest) -> ApiResult<()> {
        req.validate()?;
        let updated: bool = client.post_data(&["usuarios", "actualizar"], req).await?;
        if !updated {
            return Err(ApiError::Rejected("Hubo un error actualizando el perfil".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock_backend;
    use crate::models::user::UserRole;
    use axum::{routing::post, Json, Router};
    use serde_json::json;

    #[tokio::test]
    async fn profile_decodes_backend_user() {
        let router = Router::new().route(
            "/usuarios",
            post(|| async {
                Json(json!({"data": {
                    "id": 2,
                    "username": "marta",
                    "nombre": "Marta",
                    "apellido": "García",
                    "email": "marta@example.com",
                    "rol": "USER",
                    "fechaCreacion": "2024-03-01T10:15:00",
                    "menuSemanal": [{"id": 8, "diasComidas": []}]
                }, "estado": "exito"}))
            }),
        );
        let client = mock_backend(router).await;

        let user = UserService::profile(&client, " marta@example.com ").await.unwrap();
        assert_eq!(user.role, Some(UserRole::User));
        assert_eq!(user.menus[0].id, 8);
        assert!(user.shopping_lists.is_empty());
    }

    #[tokio::test]
    async fn refused_registration_is_an_error() {
        let router = Router::new().route(
            "/usuarios/nuevo",
            post(|| async { Json(json!({"data": false, "estado": "exito"})) }),
        );
        let client = mock_backend(router).await;

        let req = RegisterRequest {
            username: "marta".into(),
            password: "secreto".into(),
            first_name: "Marta".into(),
            last_name: "García".into(),
            email: "marta@example.com".into(),
        };
        assert!(matches!(
            UserService::register(&client, &req).await,
            Err(ApiError::Rejected(_))
        ));
    }
}
