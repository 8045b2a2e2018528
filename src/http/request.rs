//! Request ID handling.
//!
//! A UUID v4 is generated when the caller sent none; the id is echoed on
//! the response and forwarded to neighbour hops, so one journey shares one
//! id across every hop's logs.

use axum::http::Request;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub use crate::relay::envelope::X_REQUEST_ID;

/// Generates `x-request-id` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        Uuid::new_v4().to_string().parse().ok().map(RequestId::new)
    }
}
