//! Mathematical utilities and decisions.

mod axis;
pub use axis::*;
mod axis_box;
pub use axis_box::*;
mod coord;
pub use coord::*;
mod face;
pub use face::*;
mod rotation;
pub use rotation::*;
#[cfg(feature = "serde")]
mod serde_impls;
mod transform;
pub use transform::*;

// We make an assumption in several places that `usize` is at least 32 bits.
#[cfg(target_pointer_width = "16")]
compile_error!("descent does not support platforms with less than 32-bit `usize`");
