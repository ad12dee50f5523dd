mod builtin;
mod reader;
mod types;

pub use builtin::founders;
pub use reader::RegistryReader;
pub use types::*;
