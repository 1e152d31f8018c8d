use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    /// Dataset or dataset version absent. The message is shown to the user verbatim.
    #[error("{0}")]
    NotFound(String),

    /// Local form validation failed; nothing was sent to the backend.
    #[error("Input non valido: {0}")]
    Validation(String),

    #[error("Errore di rete: {0}")]
    Network(String),

    #[error("Errore del backend ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Configurazione non valida: {0}")]
    Config(String),

    #[error("Errore di I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("Errore JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl PortalError {
    /// Builds the rejection surfaced when a dataset (or one of its versions) cannot be resolved.
    pub fn dataset_not_found(short_name: &str, version: Option<&str>) -> Self {
        let mut message = format!("Can't find dataset {}", short_name);
        if let Some(version) = version {
            message.push_str(" version ");
            message.push_str(version);
        }
        PortalError::NotFound(message)
    }

    /// True for failures that came from the transport or the backend rather than local checks.
    pub fn is_remote(&self) -> bool {
        matches!(self, PortalError::Network(_) | PortalError::Backend { .. })
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => PortalError::Backend {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => PortalError::Network(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
