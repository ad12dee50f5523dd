pub mod fetch;
pub mod registry;
