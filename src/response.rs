use serde::Serialize;
use utoipa::ToSchema;

/// Envelope metadata. Collections report how many records they carry.
#[derive(Debug, Serialize, ToSchema, Clone, Default)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl Meta {
    pub fn with_total(total: usize) -> Self {
        Self {
            total: Some(total as i64),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Body shape shared by every endpoint, success or failure.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
