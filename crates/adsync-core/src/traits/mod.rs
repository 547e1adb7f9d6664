//! Core traits for the adsync system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`AdsProvider`]: Perform advertising-platform operations via provider APIs
//! - [`RecordStore`]: Persist created resource names for later monitoring

pub mod ads_provider;
pub mod record_store;

pub use ads_provider::{AdStatusSnapshot, AdsProvider, ApprovalStatus};
pub use record_store::{CreatedRecord, RecordStore};
