//! Resource creation sequence
//!
//! Performs the three dependent remote calls of a rollout, in strict order:
//!
//! 1. Create an ad group under the given campaign
//! 2. Create a responsive search ad (independent of any ad group)
//! 3. Link the two via the ad-group-ad join resource, initially paused
//!
//! Asset minimums are validated before the first remote call, so an
//! under-specified request has no side effects at all. A remote rejection
//! mid-sequence surfaces immediately with the provider's message; earlier
//! steps are NOT rolled back, so partial creation (e.g. an ad group with no
//! linked ad) is possible and visible to the operator.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::traits::{AdsProvider, CreatedRecord};

/// Minimum headline variants a responsive search ad must carry
pub const MIN_HEADLINES: usize = 3;

/// Minimum description variants a responsive search ad must carry
pub const MIN_DESCRIPTIONS: usize = 2;

/// Inputs for one creation run
#[derive(Debug, Clone)]
pub struct CreationRequest {
    /// Account identifier (no dashes)
    pub customer_id: String,
    /// Campaign to attach the new ad group to
    pub campaign_id: String,
    /// Name for the new ad group
    pub ad_group_name: String,
    /// Initial Final URL for the ad (must be policy-compliant)
    pub final_url: String,
    /// Headline texts, at least [`MIN_HEADLINES`]
    pub headlines: Vec<String>,
    /// Description texts, at least [`MIN_DESCRIPTIONS`]
    pub descriptions: Vec<String>,
}

impl CreationRequest {
    /// Check asset minimums, before any remote call is made
    pub fn validate(&self) -> Result<()> {
        if self.headlines.len() < MIN_HEADLINES {
            return Err(Error::validation(format!(
                "At least {} headlines required, got {}",
                MIN_HEADLINES,
                self.headlines.len()
            )));
        }
        if self.descriptions.len() < MIN_DESCRIPTIONS {
            return Err(Error::validation(format!(
                "At least {} descriptions required, got {}",
                MIN_DESCRIPTIONS,
                self.descriptions.len()
            )));
        }
        Ok(())
    }
}

/// Resource names produced by one successful creation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedResources {
    /// The created ad group
    pub ad_group: String,
    /// The created ad
    pub ad: String,
    /// The ad-group-ad link (paused)
    pub ad_group_ad: String,
}

impl CreatedResources {
    /// Build the record to persist for later monitoring
    ///
    /// Stamps `created_at` with the current UTC time.
    pub fn into_record(self, request: &CreationRequest) -> CreatedRecord {
        CreatedRecord {
            customer_id: request.customer_id.clone(),
            campaign_id: request.campaign_id.clone(),
            ad_group_resource_name: self.ad_group,
            ad_resource_name: self.ad,
            ad_group_ad_resource_name: self.ad_group_ad,
            initial_final_url: request.final_url.clone(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Runs the create → create → link sequence against an injected provider
pub struct ResourceCreator {
    provider: Box<dyn AdsProvider>,
}

impl ResourceCreator {
    /// Create a resource creator backed by the given provider
    pub fn new(provider: Box<dyn AdsProvider>) -> Self {
        Self { provider }
    }

    /// Perform the three-step creation
    ///
    /// On full success, returns the three resource names; the caller is
    /// responsible for persisting them (see
    /// [`CreatedResources::into_record`]).
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if asset minimums are not met (no remote
    ///   calls were made)
    /// - [`Error::Provider`] if any step is rejected remotely; earlier
    ///   steps are left in place
    pub async fn create(&self, request: &CreationRequest) -> Result<CreatedResources> {
        request.validate()?;
        debug!(
            "Creating ad group '{}' under campaign {} for customer {}",
            request.ad_group_name, request.campaign_id, request.customer_id
        );

        let ad_group = self
            .provider
            .create_ad_group(
                &request.customer_id,
                &request.campaign_id,
                &request.ad_group_name,
            )
            .await?;
        info!("Created ad group: {}", ad_group);

        let ad = self
            .provider
            .create_responsive_search_ad(
                &request.customer_id,
                &request.final_url,
                &request.headlines,
                &request.descriptions,
            )
            .await?;
        info!("Created responsive search ad: {}", ad);

        let ad_group_ad = self
            .provider
            .link_ad_group_ad(&request.customer_id, &ad_group, &ad)
            .await?;
        info!("Linked ad to ad group (paused): {}", ad_group_ad);

        Ok(CreatedResources {
            ad_group,
            ad,
            ad_group_ad,
        })
    }
}
