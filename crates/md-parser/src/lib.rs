//! Decoder for the array engine's metadata wire format.
//!
//! The backend describes each array with five delimited text fields:
//! dimensions, attributes, spatial reference, temporal reference and
//! extent. This crate turns one such [`MetadataRow`] into an
//! [`ArrayDescriptor`](coverage_common::ArrayDescriptor), reporting a typed
//! [`DecodeError`] that separates wrong field counts from unparseable values.
//!
//! A failure only ever affects the array it belongs to: [`decode_batch`]
//! logs and skips bad rows and keeps the rest.

pub mod decode;
pub mod error;
pub mod wire;

pub use decode::{
    decode_attributes, decode_batch, decode_dimensions, decode_extent, decode_row, decode_srs,
    decode_trs, DecodedBatch, MetadataRow,
};
pub use error::{DecodeError, DecodeResult, WireField};
pub use wire::SEPARATOR;
