use serde::{Deserialize, Serialize};

/// A programmatic subscription as the sidecar reads it from `GET /dapr/subscribe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub pubsubname: String,
    pub topic: String,
    pub route: String,
}
