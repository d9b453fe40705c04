//! Setting handlers for different configuration patterns.

pub mod boolean;
pub mod simple;

pub use boolean::*;
pub use simple::*;
