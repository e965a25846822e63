pub mod cell;
pub mod macros;
pub mod records;
pub mod time;

pub use cell::*;
pub use records::*;
pub use time::*;
