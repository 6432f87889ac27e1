pub mod error;
pub mod handlers;
pub mod hash;
pub mod middleware;
pub mod routes;
pub mod shutdown;
pub mod stats;

pub use error::ApiError;
pub use routes::create_router;
