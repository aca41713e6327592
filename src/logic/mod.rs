pub mod crud;
pub mod error;
pub mod nested;
pub mod validate;

pub use crud::*;
pub use error::*;
pub use nested::*;
pub use validate::*;
