use serde::{Deserialize, Serialize};

/// `estado` field of every enveloped backend response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Exito,
    Error,
}

/// Standard backend response envelope: `{ "data": T, "estado": "exito" }`.
///
/// Both fields may be absent on the wire (`data` for void endpoints,
/// `estado` on some older handlers), so both are optional here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(rename = "estado", default)]
    pub status: Option<ApiStatus>,
}

impl<T> ApiResponse<T> {
    pub fn is_error(&self) -> bool {
        self.status == Some(ApiStatus::Error)
    }
}
