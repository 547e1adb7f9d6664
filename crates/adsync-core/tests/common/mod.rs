//! Test doubles and common utilities for contract tests
//!
//! This module provides a scripted, call-counting AdsProvider fake so the
//! creator and the approval monitor can be exercised without a network.

use adsync_core::error::{Error, Result};
use adsync_core::traits::{AdStatusSnapshot, AdsProvider, ApprovalStatus};
use adsync_core::CreationRequest;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Which provider operation the fake should reject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum FailStep {
    CreateAdGroup,
    CreateAd,
    Link,
    UpdateUrl,
}

/// One scripted poll cycle: a status map, or a service-level error message
pub type ScriptedCycle = std::result::Result<HashMap<String, AdStatusSnapshot>, String>;

/// A scripted AdsProvider that counts calls
///
/// Cloning shares all counters and the script, so a clone can be handed to
/// the component under test while the original stays behind for assertions.
#[derive(Clone, Default)]
pub struct FakeAdsProvider {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    ad_group_calls: AtomicUsize,
    ad_calls: AtomicUsize,
    link_calls: AtomicUsize,
    query_calls: AtomicUsize,
    update_calls: AtomicUsize,
    /// Operation names in invocation order
    op_log: Mutex<Vec<&'static str>>,
    /// Operation to reject, with the message the "platform" reports
    fail_step: Mutex<Option<(FailStep, String)>>,
    /// Queued per-cycle status responses
    script: Mutex<VecDeque<ScriptedCycle>>,
    /// Last successful cycle, repeated once the script runs dry
    last_cycle: Mutex<HashMap<String, AdStatusSnapshot>>,
    /// (resource_name, new_url) pairs passed to update_ad_final_url
    updated: Mutex<Vec<(String, String)>>,
}

#[allow(dead_code)]
impl FakeAdsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fake whose status query replays the given cycles in order,
    /// then repeats the last one
    pub fn with_script(cycles: Vec<ScriptedCycle>) -> Self {
        let fake = Self::new();
        *fake.inner.script.lock().unwrap() = cycles.into();
        fake
    }

    /// Reject the given operation with a provider error carrying `message`
    pub fn fail_on(&self, step: FailStep, message: impl Into<String>) {
        *self.inner.fail_step.lock().unwrap() = Some((step, message.into()));
    }

    fn check_fail(&self, step: FailStep) -> Result<()> {
        if let Some((failing, message)) = self.inner.fail_step.lock().unwrap().clone() {
            if failing == step {
                return Err(Error::provider("fake", message));
            }
        }
        Ok(())
    }

    pub fn ad_group_calls(&self) -> usize {
        self.inner.ad_group_calls.load(Ordering::SeqCst)
    }

    pub fn ad_calls(&self) -> usize {
        self.inner.ad_calls.load(Ordering::SeqCst)
    }

    pub fn link_calls(&self) -> usize {
        self.inner.link_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.inner.query_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.inner.update_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.ad_group_calls()
            + self.ad_calls()
            + self.link_calls()
            + self.query_calls()
            + self.update_calls()
    }

    /// Operations invoked so far, in order
    pub fn op_log(&self) -> Vec<&'static str> {
        self.inner.op_log.lock().unwrap().clone()
    }

    /// (resource_name, new_url) pairs that reached the update operation
    pub fn updated(&self) -> Vec<(String, String)> {
        self.inner.updated.lock().unwrap().clone()
    }

    fn log_op(&self, op: &'static str) {
        self.inner.op_log.lock().unwrap().push(op);
    }
}

#[async_trait]
impl AdsProvider for FakeAdsProvider {
    async fn create_ad_group(
        &self,
        customer_id: &str,
        _campaign_id: &str,
        _name: &str,
    ) -> Result<String> {
        let n = self.inner.ad_group_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.log_op("create_ad_group");
        self.check_fail(FailStep::CreateAdGroup)?;
        Ok(format!("customers/{customer_id}/adGroups/{n}"))
    }

    async fn create_responsive_search_ad(
        &self,
        customer_id: &str,
        _final_url: &str,
        _headlines: &[String],
        _descriptions: &[String],
    ) -> Result<String> {
        let n = self.inner.ad_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.log_op("create_responsive_search_ad");
        self.check_fail(FailStep::CreateAd)?;
        Ok(format!("customers/{customer_id}/ads/{n}"))
    }

    async fn link_ad_group_ad(
        &self,
        customer_id: &str,
        _ad_group_resource_name: &str,
        _ad_resource_name: &str,
    ) -> Result<String> {
        let n = self.inner.link_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.log_op("link_ad_group_ad");
        self.check_fail(FailStep::Link)?;
        Ok(format!("customers/{customer_id}/adGroupAds/{n}~{n}"))
    }

    async fn query_ad_group_ad_status(
        &self,
        _customer_id: &str,
        _resource_names: &[String],
    ) -> Result<HashMap<String, AdStatusSnapshot>> {
        self.inner.query_calls.fetch_add(1, Ordering::SeqCst);
        self.log_op("query_ad_group_ad_status");

        let next = self.inner.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(cycle)) => {
                *self.inner.last_cycle.lock().unwrap() = cycle.clone();
                Ok(cycle)
            }
            Some(Err(message)) => Err(Error::provider("fake", message)),
            // Script exhausted: the platform keeps answering the same way
            None => Ok(self.inner.last_cycle.lock().unwrap().clone()),
        }
    }

    async fn update_ad_final_url(
        &self,
        _customer_id: &str,
        resource_name: &str,
        new_url: &str,
    ) -> Result<String> {
        self.inner.update_calls.fetch_add(1, Ordering::SeqCst);
        self.log_op("update_ad_final_url");
        self.check_fail(FailStep::UpdateUrl)?;
        self.inner
            .updated
            .lock()
            .unwrap()
            .push((resource_name.to_string(), new_url.to_string()));
        Ok(resource_name.to_string())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// Build a snapshot with the given status and current URLs
#[allow(dead_code)]
pub fn snapshot(status: ApprovalStatus, urls: &[&str]) -> AdStatusSnapshot {
    AdStatusSnapshot::new(status, urls.iter().map(|u| u.to_string()).collect())
}

/// Build one scripted cycle from (resource, snapshot) pairs
#[allow(dead_code)]
pub fn cycle(entries: &[(&str, AdStatusSnapshot)]) -> ScriptedCycle {
    Ok(entries
        .iter()
        .map(|(name, snap)| (name.to_string(), snap.clone()))
        .collect())
}

/// A well-formed creation request
#[allow(dead_code)]
pub fn sample_request() -> CreationRequest {
    CreationRequest {
        customer_id: "1234567890".to_string(),
        campaign_id: "111".to_string(),
        ad_group_name: "Spring launch".to_string(),
        final_url: "https://shop.example.com/landing".to_string(),
        headlines: vec![
            "Fast shipping".to_string(),
            "Great prices".to_string(),
            "Shop today".to_string(),
        ],
        descriptions: vec![
            "Everything in stock".to_string(),
            "Free returns for 30 days".to_string(),
        ],
    }
}
