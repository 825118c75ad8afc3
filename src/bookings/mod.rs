pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod status_machine;

pub use handlers::*;
pub use models::*;
pub use repository::*;
pub use service::*;
pub use status_machine::*;
