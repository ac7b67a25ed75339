mod core;

pub use self::core::*;

#[cfg(test)]
mod tests;
