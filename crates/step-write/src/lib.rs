//! Attribute values for ISO 10303-21 (STEP physical file) exchange structures
//! and the text writer that turns them into tokens.
//!
//! # Overview
//!
//! - [`ArgumentValue`] - one attribute value: scalar, enumeration, reference,
//!   nested list, or the `$` / `*` markers
//! - [`StepEncoder`] / [`render`] - writes a value as its exact token sequence
//! - [`StringEncoder`] - seam for the string token encoder, with
//!   [`Part21StringEncoder`] as the default
//! - [`Instance`] - what a referenced object must expose
//!
//! # Example
//!
//! ```
//! use step_write::{render, ArgumentValue, BitSequence};
//!
//! let mut value = ArgumentValue::new();
//! value.set_real(1.5e10).unwrap();
//! assert_eq!(render(&value, false).unwrap(), "1.5E10");
//!
//! value.set_binary("101".parse::<BitSequence>().unwrap());
//! assert_eq!(render(&value, false).unwrap(), "\"15\"");
//! ```

mod bits;
mod encoder;
mod error;
mod instance;
mod options;
mod strings;
mod types;
mod value;

pub use bits::{BitSequence, ParseBitsError};
pub use encoder::{format_binary, format_real, render, StepEncoder};
pub use error::ArgumentError;
pub use instance::{Instance, InstanceRef, SimpleValue};
pub use options::{RenderOptions, DEFAULT_MAX_DEPTH};
pub use strings::{Part21StringEncoder, StringEncoder};
pub use types::{EnumerationReference, Logical, TypeTag};
pub use value::ArgumentValue;
