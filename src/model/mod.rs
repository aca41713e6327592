pub mod document;
pub mod identifier;
pub mod resource;

pub use document::*;
pub use identifier::*;
pub use resource::*;
