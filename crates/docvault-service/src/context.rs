//! Request context carrying the calling identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docvault_core::types::CallerId;

/// Context for the current request.
///
/// The caller identity is resolved to an owner key by the injected
/// [`OwnerResolver`](docvault_core::traits::OwnerResolver) at the start of
/// every operation; the context itself carries no ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The calling identity.
    pub caller_id: CallerId,
    /// When the request was received. Date-range searches are relative to it.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context stamped with the current time.
    pub fn new(caller_id: CallerId) -> Self {
        Self {
            caller_id,
            request_time: Utc::now(),
        }
    }
}
