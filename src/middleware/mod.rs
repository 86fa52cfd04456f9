pub mod csrf;
pub mod response;

pub use csrf::csrf_middleware;
pub use response::{ApiResponse, ApiResult};
