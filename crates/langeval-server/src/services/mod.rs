//! Upstream access and per-request trace views.

#[cfg(test)]
pub mod memory;
pub mod source;
pub mod views;

pub use source::{
    path_segments, HttpTraceSource, ProxyRequest, ProxyResponse, TraceListQuery, TraceSource,
};
