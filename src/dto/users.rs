use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::User;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Subject identifier issued by the identity provider.
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<User>)]
    pub items: Vec<User>,
}
