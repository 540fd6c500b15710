//! Value adjustment for mints whose nominal amount differs from what moves
//! or what is displayed.

pub mod mint;
pub mod scaled_ui;
pub mod transfer_fee;

pub use mint::*;
pub use scaled_ui::*;
pub use transfer_fee::*;
