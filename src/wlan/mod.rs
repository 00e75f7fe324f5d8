pub mod export;
pub mod parse;
pub mod resolver;
pub mod source;
pub mod types;

pub use resolver::ProfileInfoResolver;
pub use source::{NetshSource, ProfileSource};
pub use types::*;
