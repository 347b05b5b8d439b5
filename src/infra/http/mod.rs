pub mod api;
mod middleware;

pub use api::{HttpState, build_router, cors_layer};
pub use middleware::{REQUEST_ID_HEADER, RequestContext};
