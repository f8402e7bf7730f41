//! Client for populating a remote orbital simulator with satellites.
//!
//! Orbital elements are derived with [`elements::OrbitalElementBuilder`] and
//! shipped over JSON-RPC by an [`rpc::RpcSession`].

pub mod config;
pub mod constellation;
pub mod elements;
pub mod rpc;
