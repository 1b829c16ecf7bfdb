//! Dense tensor types
//!
//! [`DenseTensor`] is the storage behind each tile: a contiguous row-major
//! buffer plus a [`Shape`]. It carries no device or layout machinery; tiles
//! are always host-resident and contiguous.

mod dense;
mod shape;

pub use dense::DenseTensor;
pub use shape::Shape;
pub(crate) use shape::STACK_DIMS;
