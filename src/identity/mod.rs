pub mod directory;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod postgres;

pub use directory::*;
pub use handlers::*;
pub use memory::*;
pub use models::*;
pub use postgres::*;
