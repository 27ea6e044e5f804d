//! File version infrastructure

mod service;

pub use service::FileVersionService;
