pub mod memory;
pub mod object;
pub mod postgres;
pub mod registry;
pub mod traits;

pub use memory::*;
pub use object::*;
pub use postgres::*;
pub use registry::*;
pub use traits::*;
