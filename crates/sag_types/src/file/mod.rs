//! File format implementations.

mod error;
pub mod sag;

pub use error::{ErrorKind, SagError};
pub use sag::{DelayUnit, File as SagFile, Frame, Header as SagHeader, decode, encode};
