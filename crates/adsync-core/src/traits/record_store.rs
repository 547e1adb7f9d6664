// # Record Store Trait
//
// Defines the interface for persisting created resource names.
//
// ## Purpose
//
// Each successful creation run appends one entry recording the three
// resource names it produced, the initial Final URL, and the creation time.
// The approval monitor later reads these entries to build its tracked set.
//
// ## Implementations
//
// - File-based: one JSON file, `{"entries": [...]}`
// - Memory: for tests and ephemeral runs

use async_trait::async_trait;

/// One creation run's persisted output
///
/// Immutable once written; identified by `ad_group_ad_resource_name`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreatedRecord {
    /// Account the resources were created under (no dashes)
    pub customer_id: String,
    /// Campaign the ad group was attached to
    pub campaign_id: String,
    /// Resource name of the created ad group
    pub ad_group_resource_name: String,
    /// Resource name of the created ad
    pub ad_resource_name: String,
    /// Resource name of the ad-group-ad link; the monitor's unit of work
    pub ad_group_ad_resource_name: String,
    /// Final URL the ad was created with
    pub initial_final_url: String,
    /// Creation timestamp, UTC
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Trait for record store implementations
///
/// The store is an append-only log with a single-writer assumption: there is
/// no locking, and concurrent writers race on the rewritten file.
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks within
/// one process.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append one entry to the store
    ///
    /// Opens or initializes the backing storage as needed and persists the
    /// full entry sequence.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Successfully appended and persisted
    /// - `Err(Error)`: Storage error
    async fn append(&self, record: &CreatedRecord) -> Result<(), crate::Error>;

    /// Read all entries, in append order
    ///
    /// An absent or unparsable backing file reads as empty; corruption is
    /// swallowed, not raised.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<CreatedRecord>)`: The ordered entries (possibly empty)
    /// - `Err(Error)`: Storage error
    async fn read_all(&self) -> Result<Vec<CreatedRecord>, crate::Error>;
}
