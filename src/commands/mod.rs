pub mod cleanup;
pub mod drop;
pub mod list;
pub mod pop;
pub mod push;

pub use cleanup::*;
pub use drop::*;
pub use list::*;
pub use pop::*;
pub use push::*;
