use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn partial(message: &str, data: T) -> Self {
        Self {
            status: "partial_success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }
}

/// Acknowledgement body the backend returns for commands.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct CommandResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}
