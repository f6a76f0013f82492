pub mod access_log;
pub mod router;
pub mod routes;

pub use router::{GatewayState, gateway_router};
