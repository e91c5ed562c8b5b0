pub mod config;
pub mod contracts;
pub mod deployer;
pub mod report;
pub mod rpc;
pub mod scanner;

#[cfg(test)]
pub(crate) mod mock;
