//! Wire types shared by the catalog services and their clients.

pub mod messages;
pub mod systems;
pub mod users;
pub mod validation;

pub use messages::*;
pub use systems::*;
pub use users::*;
pub use validation::ValidationError;
