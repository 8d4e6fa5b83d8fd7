//! Concrete implementations of the sale ports.

mod rpc;

pub use rpc::PresaleRpc;
