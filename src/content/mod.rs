//! Content: the data files mob types and areas are built from.
//!
//! - [`datanode`] – typed field access with error reporting
//! - [`errors`] – [`errors::ContentError`] and the accumulating reporter
//! - [`loader`] – background reading of type files and type registration
//! - [`area`] – area files and spawning their mobs
pub mod area;
pub mod datanode;
pub mod errors;
pub mod loader;
