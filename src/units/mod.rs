//! # Units and Quantities
//!
//! Dimension vectors, registered units, compound units and dimensioned
//! quantities. A [`UnitDispenser`] is the registry every other piece resolves
//! unit text against; [`UnitDispenser::si`] provides the standard catalogue.
//!
//! ## Example Usage
//!
//! ```rust
//! use scaled_params::units::UnitDispenser;
//!
//! let si = UnitDispenser::si();
//! let speed = si.quantity(36.0, "km/h").unwrap();
//! let in_si = speed.to(&si.get("m/s").unwrap()).unwrap();
//! assert!((in_si.value() - 10.0).abs() < 1e-9);
//! ```

pub mod compound;
pub mod dimensions;
pub mod dispenser;
pub mod quantity;
mod si;
pub mod unit;

pub use compound::Units;
pub use dimensions::Dimensions;
pub use dispenser::{Prefix, UnitDispenser};
pub use quantity::Quantity;
pub use unit::{Unit, UnitError, UnitSpec};
