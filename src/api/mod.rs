// Thin namespace wrapper for API-layer components
pub mod handlers {
    pub use crate::handlers::*;
}

pub mod files_handler {
    pub use crate::files_handler::*;
}

pub mod integrations_handler {
    pub use crate::integrations_handler::*;
}

pub mod routes {
    pub use crate::routes::*;
}
