//! Registration-time services: controller resolution and validator selection.

mod resolver;
mod validation;
pub use resolver::Resolver;
pub use validation::{Validation, ValidationResolver};
