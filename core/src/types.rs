//! Wire types shared by every endpoint.

use serde::{Deserialize, Serialize};

/// The `{"data": T}` envelope every API response is wrapped in. Fields other
/// than `data` are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}
