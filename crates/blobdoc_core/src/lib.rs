//! Public library API for decoding tagged binary object-graph blobs.

/// Byte cursor, entry stream, generic value decoder, and input helpers.
pub mod blob;
