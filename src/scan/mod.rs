mod core;
pub mod stitch;

pub use self::core::*;
