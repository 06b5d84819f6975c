/// Decode a blob into a value tree.
pub mod decode;
/// Flat wire entry listing.
pub mod entries;
/// Value tree printing.
pub mod print;
/// Input loading and shared helpers.
pub mod util;
