pub mod handlers;
pub mod nested_handlers;
pub mod response;
pub mod routes;
pub mod state;
pub mod upload_handlers;

pub use handlers::*;
pub use nested_handlers::*;
pub use response::*;
pub use routes::*;
pub use state::*;
pub use upload_handlers::*;
