//! Rate-source metadata addressed through a configurable [`SourceSchema`].
//!
//! [`SourceSchema`]: currex_core::updater::SourceSchema

mod repository;

pub use repository::RateSourceRepository;
