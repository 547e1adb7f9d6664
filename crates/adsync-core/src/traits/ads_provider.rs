// # Ads Provider Trait
//
// Defines the interface for the remote advertising-platform operations.
//
// ## Implementations
//
// - Google Ads: `adsync-provider-googleads` crate
// - Test fakes: scripted providers under `tests/common`
//
// ## Constraints
//
// Providers are single-shot integrations: one API call per method
// invocation, no retry or backoff (a rejection propagates to the caller
// unchanged), no caching, and no knowledge of the record store or the
// monitor's loop policy. All coordination is owned by [`ResourceCreator`]
// and [`ApprovalMonitor`].
//
// [`ResourceCreator`]: crate::creator::ResourceCreator
// [`ApprovalMonitor`]: crate::engine::ApprovalMonitor

use async_trait::async_trait;
use std::collections::HashMap;

/// Policy-review outcome for a linked ad
///
/// Only [`ApprovalStatus::Approved`] triggers the Final-URL update; every
/// other value leaves the resource pending for the next poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalStatus {
    /// Review finished and the ad may serve
    Approved,
    /// Review finished and the ad was rejected
    Disapproved,
    /// Anything else: still under review, limited approval, or a value this
    /// library does not recognize
    Unknown,
}

impl ApprovalStatus {
    /// Map a provider-reported status string onto the tri-state model
    ///
    /// Unrecognized values (including partial approvals such as
    /// `APPROVED_LIMITED`) map to [`ApprovalStatus::Unknown`] so they never
    /// trigger an update.
    pub fn from_api(value: &str) -> Self {
        match value {
            "APPROVED" => Self::Approved,
            "DISAPPROVED" => Self::Disapproved,
            _ => Self::Unknown,
        }
    }

    /// Whether this status permits the Final-URL update
    pub fn is_approved(self) -> bool {
        self == Self::Approved
    }
}

/// Point-in-time view of one linked ad, from a batched status query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdStatusSnapshot {
    /// Current policy-review outcome
    pub approval_status: ApprovalStatus,
    /// Final URLs currently set on the ad, in platform order
    pub final_urls: Vec<String>,
}

impl AdStatusSnapshot {
    /// Create a snapshot
    pub fn new(approval_status: ApprovalStatus, final_urls: Vec<String>) -> Self {
        Self {
            approval_status,
            final_urls,
        }
    }

    /// The first recorded Final URL, which the domain guard compares against
    pub fn current_url(&self) -> Option<&str> {
        self.final_urls.first().map(String::as_str)
    }
}

/// Trait for advertising-platform provider implementations
///
/// All calls require the implementation to hold a pre-authenticated client
/// context; credential loading is the implementation's concern.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait AdsProvider: Send + Sync {
    /// Create an ad group under an existing campaign
    ///
    /// The ad group is created enabled, with the platform's standard search
    /// type.
    ///
    /// # Parameters
    ///
    /// - `customer_id`: Account identifier (no dashes)
    /// - `campaign_id`: Campaign to attach the new ad group to
    /// - `name`: Name for the new ad group
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: Resource name of the created ad group
    /// - `Err(Error)`: If the platform rejected the creation
    async fn create_ad_group(
        &self,
        customer_id: &str,
        campaign_id: &str,
        name: &str,
    ) -> Result<String, crate::Error>;

    /// Create a responsive search ad, independent of any ad group
    ///
    /// The ad carries the supplied Final URL and the full headline and
    /// description sets; the platform assembles the variants.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: Resource name of the created ad
    /// - `Err(Error)`: If the platform rejected the creation (e.g. policy)
    async fn create_responsive_search_ad(
        &self,
        customer_id: &str,
        final_url: &str,
        headlines: &[String],
        descriptions: &[String],
    ) -> Result<String, crate::Error>;

    /// Link a created ad to a created ad group via the join resource
    ///
    /// The link is created in a paused, non-serving state; activation is a
    /// deliberate step outside this system.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: Resource name of the created ad-group-ad link
    /// - `Err(Error)`: If the platform rejected the link
    async fn link_ad_group_ad(
        &self,
        customer_id: &str,
        ad_group_resource_name: &str,
        ad_resource_name: &str,
    ) -> Result<String, crate::Error>;

    /// Query approval status and current Final URLs for a set of links
    ///
    /// One batched query. Resources the platform does not return (e.g.
    /// deleted ones) are simply absent from the map; that is not an error.
    ///
    /// # Returns
    ///
    /// - `Ok(HashMap)`: Resource name → snapshot, for the resources found
    /// - `Err(Error)`: If the query itself failed
    async fn query_ad_group_ad_status(
        &self,
        customer_id: &str,
        resource_names: &[String],
    ) -> Result<HashMap<String, AdStatusSnapshot>, crate::Error>;

    /// Replace the Final URL of a linked ad via a field-masked update
    ///
    /// Only the destination-URL field is touched; all other ad properties
    /// are left as they are.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: Resource name of the updated link
    /// - `Err(Error)`: If the platform rejected the update
    async fn update_ad_final_url(
        &self,
        customer_id: &str,
        resource_name: &str,
        new_url: &str,
    ) -> Result<String, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_status_mapping() {
        assert_eq!(ApprovalStatus::from_api("APPROVED"), ApprovalStatus::Approved);
        assert_eq!(
            ApprovalStatus::from_api("DISAPPROVED"),
            ApprovalStatus::Disapproved
        );
        assert_eq!(
            ApprovalStatus::from_api("APPROVED_LIMITED"),
            ApprovalStatus::Unknown
        );
        assert_eq!(ApprovalStatus::from_api("UNKNOWN"), ApprovalStatus::Unknown);
        assert_eq!(ApprovalStatus::from_api(""), ApprovalStatus::Unknown);
    }

    #[test]
    fn only_approved_permits_update() {
        assert!(ApprovalStatus::Approved.is_approved());
        assert!(!ApprovalStatus::Disapproved.is_approved());
        assert!(!ApprovalStatus::Unknown.is_approved());
    }

    #[test]
    fn snapshot_current_url_is_first() {
        let snapshot = AdStatusSnapshot::new(
            ApprovalStatus::Approved,
            vec!["https://a.example.com/x".into(), "https://a.example.com/y".into()],
        );
        assert_eq!(snapshot.current_url(), Some("https://a.example.com/x"));

        let empty = AdStatusSnapshot::new(ApprovalStatus::Approved, Vec::new());
        assert_eq!(empty.current_url(), None);
    }
}
