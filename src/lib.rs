//! A compressed bitmap of 64-bit unsigned integers.
//!
//! Values are split into a 48-bit high key and a 16-bit low key. An adaptive
//! radix tree indexes containers by high key; each container holds its low
//! keys in whichever of three forms (array, bitmap, run) is currently
//! cheapest, converting between them automatically as it grows and shrinks.
//!
//! ```
//! use artmap::Bitmap64;
//!
//! let mut bitmap = Bitmap64::new();
//! bitmap.add(1);
//! bitmap.add(1_000_000_000_000);
//! assert!(bitmap.contains(1));
//! assert_eq!(bitmap.cardinality(), 2);
//! ```

mod art;
mod container;
mod error;
mod key;
mod ops;

pub mod bitmap;
pub mod iter;
pub mod serialization;

#[cfg(feature = "serde")]
mod serde_impl;

pub use bitmap::Bitmap64;
pub use error::{Error, Result};
pub use iter::Iter;
