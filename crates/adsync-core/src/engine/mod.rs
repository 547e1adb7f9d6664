//! Approval monitor engine
//!
//! The ApprovalMonitor is responsible for:
//! - Polling approval status for a fixed set of tracked ad-group-ad links
//! - Applying the same-domain guard once a link is approved
//! - Issuing the field-masked Final-URL update when the guard passes
//! - Reporting a per-resource outcome when the loop ends
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐   batched status query    ┌──────────────┐
//! │ AdsProvider  │◄──────────────────────────│ Approval     │
//! │ (remote API) │──── per-link snapshot ───►│ Monitor      │
//! └──────────────┘                           └──────────────┘
//!                                                   │
//!                          approved & same-domain   │   approved & cross-domain
//!                        ┌──────────────────────────┼──────────────────────────┐
//!                        ▼                          ▼                          ▼
//!                 update Final URL          mark skipped (done)         still pending
//! ```
//!
//! ## Loop policy
//!
//! Cycles are separated by a configurable sleep, bounded by a wall-clock
//! timeout measured from loop start. Termination is checked each cycle, in
//! order: every tracked resource resolved → success; elapsed time past the
//! timeout → timeout report with the unresolved remainder still pending.
//! A service-level query error aborts the whole loop immediately — there is
//! no retry-on-error here.
//!
//! ## Idempotency
//!
//! Once a resource is updated or skipped it is marked done in a local seen
//! set and excluded from further action, even though subsequent status
//! queries may keep reporting it as approved. The seen set is scoped to one
//! `run()` invocation; no process-wide mutable state.

use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::MonitorConfig;
use crate::error::{Error, Result};
use crate::traits::{AdStatusSnapshot, AdsProvider};

/// Reason string attached to a cross-domain skip
pub const CROSS_DOMAIN_SKIP_REASON: &str = "cross-domain change not allowed";

/// Events emitted by the ApprovalMonitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Monitor loop started
    Started {
        /// Number of tracked resources
        tracked: usize,
    },

    /// One poll cycle finished
    CycleCompleted {
        /// 1-based cycle counter
        cycle: usize,
        /// Resources resolved so far (updated or skipped)
        resolved: usize,
        /// Total tracked resources
        tracked: usize,
    },

    /// Final URL replaced on an approved resource
    UrlUpdated {
        resource_name: String,
        new_url: String,
    },

    /// Update refused by the domain guard; resource permanently skipped
    UpdateSkipped {
        resource_name: String,
        current_url: String,
        reason: String,
    },

    /// Wall-clock budget exhausted with resources still pending
    TimedOut {
        /// The unresolved resource names
        pending: Vec<String>,
    },
}

/// Terminal (or not) outcome for one tracked resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Final URL was replaced
    Updated {
        /// The URL it was replaced with
        new_url: String,
    },

    /// Domain guard refused the change; no remote mutation happened, but
    /// the resource is done for this run
    SkippedCrossDomain {
        /// The URL currently on the ad
        current_url: String,
    },

    /// Never reached an actionable state before the loop ended
    StillPending,
}

impl PollOutcome {
    /// Whether this outcome excludes the resource from further action
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::StillPending)
    }
}

/// Result of one monitor run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorReport {
    /// Per-resource outcome, keyed by resource name
    pub outcomes: HashMap<String, PollOutcome>,
    /// Whether the loop ended on the wall-clock timeout
    pub timed_out: bool,
    /// Poll cycles executed
    pub cycles: usize,
}

impl MonitorReport {
    fn collect(&self, pick: impl Fn(&PollOutcome) -> bool) -> Vec<String> {
        let mut names: Vec<String> = self
            .outcomes
            .iter()
            .filter(|(_, outcome)| pick(outcome))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Resource names that received the new URL, sorted
    pub fn updated(&self) -> Vec<String> {
        self.collect(|o| matches!(o, PollOutcome::Updated { .. }))
    }

    /// Resource names refused by the domain guard, sorted
    pub fn skipped(&self) -> Vec<String> {
        self.collect(|o| matches!(o, PollOutcome::SkippedCrossDomain { .. }))
    }

    /// Resource names still unresolved when the loop ended, sorted
    pub fn pending(&self) -> Vec<String> {
        self.collect(|o| matches!(o, PollOutcome::StillPending))
    }
}

/// Compare two URLs by hostname only
///
/// Scheme, port, path, and query are ignored. Both sides must parse as
/// absolute URLs with a host; any parse failure or missing host counts as a
/// mismatch, so a malformed URL can never satisfy the guard.
pub fn same_domain(url_a: &str, url_b: &str) -> bool {
    match (Url::parse(url_a), Url::parse(url_b)) {
        (Ok(a), Ok(b)) => match (a.host_str(), b.host_str()) {
            (Some(host_a), Some(host_b)) => host_a == host_b,
            _ => false,
        },
        _ => false,
    }
}

/// Approval monitor engine
///
/// The tracked set is fixed at construction and not refreshed mid-run.
///
/// ## Lifecycle
///
/// 1. Create with [`ApprovalMonitor::new()`], which also yields the event
///    receiver
/// 2. Drive with [`ApprovalMonitor::run()`] until it returns a
///    [`MonitorReport`]
///
/// ## Threading
///
/// The loop is strictly sequential: one batched status query per cycle, then
/// per-resource decisions in order. There is no parallelism across tracked
/// resources and no cancellation beyond the wall-clock timeout.
pub struct ApprovalMonitor {
    /// Provider for status queries and URL updates
    provider: Box<dyn AdsProvider>,

    /// Account the tracked resources belong to
    customer_id: String,

    /// Replacement Final URL (validated absolute, with host)
    new_url: String,

    /// Tracked ad-group-ad resource names
    targets: Vec<String>,

    /// Loop policy
    config: MonitorConfig,

    /// Event sender for external observation
    event_tx: mpsc::Sender<MonitorEvent>,
}

impl ApprovalMonitor {
    /// Create a new approval monitor
    ///
    /// # Parameters
    ///
    /// - `provider`: Ads provider implementation
    /// - `customer_id`: Account identifier
    /// - `new_url`: Replacement Final URL; must parse as an absolute URL
    ///   with a host, since the guard compares hostnames
    /// - `targets`: Non-empty set of ad-group-ad resource names to track
    /// - `config`: Loop policy
    ///
    /// # Returns
    ///
    /// A tuple of (monitor, event_receiver) where event_receiver yields
    /// [`MonitorEvent`]s as the loop progresses
    pub fn new(
        provider: Box<dyn AdsProvider>,
        customer_id: impl Into<String>,
        new_url: impl Into<String>,
        targets: Vec<String>,
        config: MonitorConfig,
    ) -> Result<(Self, mpsc::Receiver<MonitorEvent>)> {
        config.validate()?;

        if targets.is_empty() {
            return Err(Error::invalid_input(
                "No ad group ad resources to monitor",
            ));
        }

        let new_url = new_url.into();
        match Url::parse(&new_url) {
            Ok(parsed) if parsed.host_str().is_some() => {}
            Ok(_) => {
                return Err(Error::invalid_input(format!(
                    "New URL has no host: {new_url}"
                )));
            }
            Err(e) => {
                return Err(Error::invalid_input(format!(
                    "New URL is not a valid absolute URL: {new_url} ({e})"
                )));
            }
        }

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let monitor = Self {
            provider,
            customer_id: customer_id.into(),
            new_url,
            targets,
            config,
            event_tx: tx,
        };

        Ok((monitor, rx))
    }

    /// Run the poll loop to completion
    ///
    /// # Returns
    ///
    /// - `Ok(MonitorReport)`: Every resource resolved, or the timeout
    ///   elapsed (`timed_out` set; progress made so far is preserved)
    /// - `Err(Error)`: A remote call failed; the loop aborted immediately
    pub async fn run(&self) -> Result<MonitorReport> {
        let start = Instant::now();
        let mut outcomes: HashMap<String, PollOutcome> = self
            .targets
            .iter()
            .map(|t| (t.clone(), PollOutcome::StillPending))
            .collect();
        let mut done: HashSet<String> = HashSet::new();
        let mut cycles = 0usize;

        self.emit_event(MonitorEvent::Started {
            tracked: self.targets.len(),
        });
        info!(
            "Monitoring {} ad group ad(s) for approval (interval {:?}, timeout {:?})",
            self.targets.len(),
            self.config.poll_interval,
            self.config.timeout
        );

        loop {
            cycles += 1;
            let statuses = self
                .provider
                .query_ad_group_ad_status(&self.customer_id, &self.targets)
                .await?;

            for resource in &self.targets {
                if done.contains(resource) {
                    continue;
                }
                let Some(snapshot) = statuses.get(resource) else {
                    // Absent from this cycle's response (e.g. deleted
                    // remotely): no update this cycle, not an error.
                    debug!("{} not in status response this cycle", resource);
                    continue;
                };
                if !snapshot.approval_status.is_approved() {
                    debug!(
                        "{} not approved yet ({:?})",
                        resource, snapshot.approval_status
                    );
                    continue;
                }

                let outcome = self.apply_update(resource, snapshot).await?;
                done.insert(resource.clone());
                outcomes.insert(resource.clone(), outcome);
            }

            self.emit_event(MonitorEvent::CycleCompleted {
                cycle: cycles,
                resolved: done.len(),
                tracked: self.targets.len(),
            });

            if done.len() == self.targets.len() {
                info!("All {} tracked resource(s) resolved after {} cycle(s)", done.len(), cycles);
                return Ok(MonitorReport {
                    outcomes,
                    timed_out: false,
                    cycles,
                });
            }

            let elapsed = start.elapsed();
            if elapsed >= self.config.timeout {
                let report = MonitorReport {
                    outcomes,
                    timed_out: true,
                    cycles,
                };
                let pending = report.pending();
                warn!(
                    "Timed out after {:?} with {} resource(s) still pending",
                    elapsed,
                    pending.len()
                );
                self.emit_event(MonitorEvent::TimedOut { pending });
                return Ok(report);
            }

            // Never sleep past the deadline; the next cycle performs the
            // final timeout check.
            let remaining = self.config.timeout - elapsed;
            tokio::time::sleep(self.config.poll_interval.min(remaining)).await;
        }
    }

    /// Decide and apply the Final-URL change for one approved resource
    async fn apply_update(
        &self,
        resource: &str,
        snapshot: &AdStatusSnapshot,
    ) -> Result<PollOutcome> {
        if let Some(current) = snapshot.current_url() {
            if !same_domain(current, &self.new_url) {
                warn!(
                    "Skipping {}: current URL {} and new URL {} differ in hostname",
                    resource, current, self.new_url
                );
                self.emit_event(MonitorEvent::UpdateSkipped {
                    resource_name: resource.to_string(),
                    current_url: current.to_string(),
                    reason: CROSS_DOMAIN_SKIP_REASON.to_string(),
                });
                return Ok(PollOutcome::SkippedCrossDomain {
                    current_url: current.to_string(),
                });
            }
        } else {
            // No recorded URL means nothing to guard against; the update
            // proceeds.
            debug!("{} has no recorded Final URL, domain guard skipped", resource);
        }

        let updated = self
            .provider
            .update_ad_final_url(&self.customer_id, resource, &self.new_url)
            .await?;
        info!("Updated Final URL of {} to {}", updated, self.new_url);
        self.emit_event(MonitorEvent::UrlUpdated {
            resource_name: resource.to_string(),
            new_url: self.new_url.clone(),
        });

        Ok(PollOutcome::Updated {
            new_url: self.new_url.clone(),
        })
    }

    /// Emit a monitor event
    fn emit_event(&self, event: MonitorEvent) {
        // Send event, logging a warning if the channel is full. Dropping is
        // preferable to blocking the poll loop on a slow consumer.
        if self.event_tx.try_send(event).is_err() {
            warn!("Event channel full, dropping monitor event");
        }
    }
}
