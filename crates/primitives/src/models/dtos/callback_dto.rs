use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Body returned to the gateway on the callback endpoint. Always sent with HTTP 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CallbackAck {
    pub result_code: i32,
    pub result_desc: String,
}

impl CallbackAck {
    pub fn accepted() -> Self {
        Self {
            result_code: 0,
            result_desc: "Accepted".to_string(),
        }
    }

    pub fn internal_error() -> Self {
        Self {
            result_code: 1,
            result_desc: "Internal Server Error".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackEventsQuery {
    /// How many of the most recent events to return (1 to 500, default 50).
    pub limit: Option<i64>,
}
