// # adsync-core
//
// Core library for the adsync ad rollout tool.
//
// ## Architecture Overview
//
// This library provides the core functionality for rolling out a responsive
// search ad and swapping its Final URL once approved:
// - **AdsProvider**: Trait for the remote advertising-platform operations
// - **RecordStore**: Trait for persisting created resource names locally
// - **ResourceCreator**: Runs the strict create → create → link sequence
// - **ApprovalMonitor**: Polls approval status and applies the guarded
//   Final-URL update
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from the live API
// 2. **Injected Capabilities**: Providers and stores are trait objects, so
//    tests run against scripted fakes instead of the network
// 3. **No Hidden Retries**: A remote rejection surfaces immediately; loop
//    policy is owned by the monitor alone
// 4. **Local Idempotency**: A per-run seen set prevents re-applying an
//    update or skip, even while the platform keeps reporting the ad

pub mod config;
pub mod creator;
pub mod engine;
pub mod error;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::MonitorConfig;
pub use creator::{CreatedResources, CreationRequest, ResourceCreator};
pub use engine::{ApprovalMonitor, MonitorEvent, MonitorReport, PollOutcome, same_domain};
pub use error::{Error, Result};
pub use state::{FileRecordStore, MemoryRecordStore};
pub use traits::{AdStatusSnapshot, AdsProvider, ApprovalStatus, CreatedRecord, RecordStore};
