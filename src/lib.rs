pub mod engine;
pub mod logging;
pub mod notify;
pub mod sampler;
pub mod shared;

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
pub mod test_helpers;
