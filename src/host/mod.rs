//! Host integrations.

mod extract;
mod server;

pub use extract::{PreResults, RouteId};
pub use server::AxumHost;
