use validator::Validate;

use crate::{
    client::ApiClient,
    error::ApiResult,
    models::auth::{LoginRequest, LoginResponse},
    session::AuthToken,
};

pub struct AuthService;

impl AuthService {
    /// Exchange credentials for a token and sign the client in with it.
    pub async fn login(client: &ApiClient, req: &LoginRequest) -> ApiResult<AuthToken> {
        req.validate()?;

        let response: LoginResponse = client.post_data(&["auth", "login"], req).await?;
        let token = AuthToken::new(response.token);
        client.sign_in(token.clone());

        tracing::info!("Signed in as {}", req.username);
        Ok(token)
    }

    pub fn logout(client: &ApiClient) {
        if let Some(user) = client.session().token().and_then(|t| t.username().map(str::to_owned)) {
            tracing::info!("Signing out {}", user);
        }
        client.sign_out();
    }
}
