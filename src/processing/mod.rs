pub mod archiver;
pub mod classifier;
pub mod history;
pub mod sweep;

#[cfg(test)]
pub(crate) mod testing;
