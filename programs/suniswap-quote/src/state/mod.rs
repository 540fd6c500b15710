pub mod pool;
pub mod position;
pub mod tick;
pub mod tick_array;

pub use pool::*;
pub use position::*;
pub use tick::*;
pub use tick_array::*;
