pub mod atomic;
pub mod input;
pub mod logging;
#[cfg(test)]
pub mod test_utils;
pub mod url;
