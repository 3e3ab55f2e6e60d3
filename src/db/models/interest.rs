use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Interest {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateInterestRequest {
    pub name: Option<String>,
}

/// Query string of `GET /interests`
#[derive(Debug, Default, Deserialize)]
pub struct InterestQuery {
    pub interest: Option<String>,
}
