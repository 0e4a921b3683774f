use thiserror::Error;

/// Failures talking to the SúperLista backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS or timeout failure from the HTTP transport
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// 401 from the backend
    #[error("sesión no autorizada")]
    Unauthorized,

    /// Protected call attempted without a token
    #[error("no has iniciado sesión")]
    NotSignedIn,

    /// Envelope came back with `estado: error`
    #[error("el servidor rechazó la petición: {0}")]
    Rejected(String),

    /// Envelope without a `data` field where one was required
    #[error("respuesta sin datos: {0}")]
    MissingData(String),

    #[error("respuesta no válida: {0}")]
    Decode(#[from] serde_json::Error),

    /// Form failed local validation; nothing was sent
    #[error("formulario no válido: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("configuración no válida: {0}")]
    Config(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::NotSignedIn)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
