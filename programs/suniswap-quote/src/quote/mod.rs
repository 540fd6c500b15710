pub mod fees;
pub mod liquidity;
pub mod reposition;
pub mod rewards;
pub mod slippage;
pub mod swap;

pub use fees::*;
pub use liquidity::*;
pub use reposition::*;
pub use rewards::*;
pub use slippage::*;
pub use swap::*;
