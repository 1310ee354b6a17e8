//! Error types produced when encoding to or decoding from OPC UA Binary.
//! Encoding can result in an `EncodeError` and decoding in a `DecodeError`;
//! both carry a kind that maps onto an OPC UA `StatusCode`.

#![allow(clippy::module_name_repetitions)]
mod decode;
mod encode;
pub use decode::Kind as DecodeErrorKind;
pub use decode::{DecodeError, DecodingLimit};
pub use encode::Kind as EncodeErrorKind;
pub use encode::EncodeError;
