use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdmissionsError {
    #[error("Application not found: {0}")]
    NotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Could not decode CV '{file_name}': {source}")]
    CvDecode {
        file_name: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Invalid application data: {0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No application selected")]
    NothingSelected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, AdmissionsError>;
