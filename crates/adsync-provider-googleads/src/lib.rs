// # Google Ads Provider
//
// This crate provides a Google Ads implementation of the adsync
// `AdsProvider` trait, speaking the Google Ads REST API.
//
// ## Scope
//
// - Makes one HTTP request per trait call
// - Full error propagation to the caller (no retry, no backoff — the
//   monitor's loop policy is deliberately retry-free)
// - HTTP timeout configured (30 seconds)
// - Rejection messages from the platform are surfaced verbatim
// - No caching, no background tasks, no knowledge of the record store
//
// ## Security Requirements
//
// - Developer and access tokens NEVER appear in logs or `Debug` output
// - The provider fails fast on empty credentials
//
// ## API Reference
//
// - REST overview: https://developers.google.com/google-ads/api/rest/overview
// - Mutates: POST `/vN/customers/{cid}/{service}:mutate`
// - Search:  POST `/vN/customers/{cid}/googleAds:search` with a GAQL query

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use adsync_core::traits::{AdStatusSnapshot, AdsProvider, ApprovalStatus};
use adsync_core::{Error, Result};
use serde_json::{Value, json};

pub mod config;
pub use config::GoogleAdsConfig;

/// Google Ads REST API base URL
const GOOGLE_ADS_API_BASE: &str = "https://googleads.googleapis.com/v19";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Google Ads provider
///
/// Holds the pre-authenticated client context and translates each trait
/// operation into one REST call.
pub struct GoogleAdsProvider {
    config: GoogleAdsConfig,
    client: reqwest::Client,
}

// Credential material lives in the config, whose Debug already redacts it
impl std::fmt::Debug for GoogleAdsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleAdsProvider")
            .field("config", &self.config)
            .finish()
    }
}

impl GoogleAdsProvider {
    /// Create a provider from validated credentials
    pub fn new(config: GoogleAdsConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create a provider by loading credentials from disk
    ///
    /// Path resolution is documented on [`GoogleAdsConfig::load`].
    pub fn from_config_file(path: Option<&std::path::Path>) -> Result<Self> {
        Self::new(GoogleAdsConfig::load(path)?)
    }

    fn mutate_url(&self, customer_id: &str, service: &str) -> String {
        format!("{GOOGLE_ADS_API_BASE}/customers/{customer_id}/{service}:mutate")
    }

    fn search_url(&self, customer_id: &str) -> String {
        format!("{GOOGLE_ADS_API_BASE}/customers/{customer_id}/googleAds:search")
    }

    /// POST a JSON payload and parse the JSON response
    ///
    /// Non-success statuses surface the platform's `error.message` verbatim
    /// as a provider error.
    async fn post_json(&self, url: &str, payload: &Value) -> Result<Value> {
        tracing::debug!("POST {}", url);

        let mut request = self
            .client
            .post(url)
            .bearer_auth(&self.config.access_token)
            .header("developer-token", &self.config.developer_token);
        if let Some(ref login_customer_id) = self.config.login_customer_id {
            request = request.header("login-customer-id", login_customer_id);
        }

        let response = request
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(Error::provider(
                "googleads",
                extract_failure_message(&body, status.as_u16()),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::provider("googleads", format!("Invalid JSON response: {e}"))
        })
    }

    /// Pull the first result's resource name out of a mutate response
    fn first_resource_name(response: &Value) -> Result<String> {
        response["results"][0]["resourceName"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                Error::provider(
                    "googleads",
                    "Mutate response carried no result resource name",
                )
            })
    }
}

/// Extract the platform's failure message from an error response body
///
/// Google Ads error payloads look like
/// `{"error": {"code": 400, "message": "...", "status": "..."}}`. When the
/// body is not in that shape, fall back to the raw text so nothing is lost.
fn extract_failure_message(body: &str, status: u16) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {status}: {body}"))
}

/// Build the GAQL status query for a set of ad-group-ad resource names
fn status_query(resource_names: &[String]) -> String {
    let quoted: Vec<String> = resource_names
        .iter()
        .map(|rn| format!("'{rn}'"))
        .collect();
    format!(
        "SELECT ad_group_ad.resource_name, ad_group_ad.status, \
         ad_group_ad.policy_summary.approval_status, ad_group_ad.ad.final_urls \
         FROM ad_group_ad WHERE ad_group_ad.resource_name IN ({})",
        quoted.join(", ")
    )
}

/// Fold a `googleAds:search` response into per-resource snapshots
///
/// Rows with no policy summary map to an unknown approval status; rows with
/// no final URLs map to an empty URL list.
fn parse_search_results(response: &Value) -> HashMap<String, AdStatusSnapshot> {
    let mut snapshots = HashMap::new();
    let Some(rows) = response["results"].as_array() else {
        return snapshots;
    };

    for row in rows {
        let ad_group_ad = &row["adGroupAd"];
        let Some(resource_name) = ad_group_ad["resourceName"].as_str() else {
            continue;
        };

        let approval_status = ad_group_ad["policySummary"]["approvalStatus"]
            .as_str()
            .map(ApprovalStatus::from_api)
            .unwrap_or(ApprovalStatus::Unknown);

        let final_urls = ad_group_ad["ad"]["finalUrls"]
            .as_array()
            .map(|urls| {
                urls.iter()
                    .filter_map(|u| u.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        snapshots.insert(
            resource_name.to_string(),
            AdStatusSnapshot::new(approval_status, final_urls),
        );
    }

    snapshots
}

#[async_trait]
impl AdsProvider for GoogleAdsProvider {
    async fn create_ad_group(
        &self,
        customer_id: &str,
        campaign_id: &str,
        name: &str,
    ) -> Result<String> {
        tracing::info!("Creating ad group '{}' under campaign {}", name, campaign_id);

        let payload = json!({
            "operations": [{
                "create": {
                    "name": name,
                    "campaign": format!("customers/{customer_id}/campaigns/{campaign_id}"),
                    "status": "ENABLED",
                    "type": "SEARCH_STANDARD",
                }
            }]
        });

        let response = self
            .post_json(&self.mutate_url(customer_id, "adGroups"), &payload)
            .await?;
        Self::first_resource_name(&response)
    }

    async fn create_responsive_search_ad(
        &self,
        customer_id: &str,
        final_url: &str,
        headlines: &[String],
        descriptions: &[String],
    ) -> Result<String> {
        tracing::info!(
            "Creating responsive search ad ({} headlines, {} descriptions)",
            headlines.len(),
            descriptions.len()
        );

        let headline_assets: Vec<Value> = headlines.iter().map(|h| json!({ "text": h })).collect();
        let description_assets: Vec<Value> =
            descriptions.iter().map(|d| json!({ "text": d })).collect();

        let payload = json!({
            "operations": [{
                "create": {
                    "finalUrls": [final_url],
                    "responsiveSearchAd": {
                        "headlines": headline_assets,
                        "descriptions": description_assets,
                    }
                }
            }]
        });

        let response = self
            .post_json(&self.mutate_url(customer_id, "ads"), &payload)
            .await?;
        Self::first_resource_name(&response)
    }

    async fn link_ad_group_ad(
        &self,
        customer_id: &str,
        ad_group_resource_name: &str,
        ad_resource_name: &str,
    ) -> Result<String> {
        tracing::info!(
            "Linking {} into {} (paused)",
            ad_resource_name,
            ad_group_resource_name
        );

        // PAUSED is the safety default: serving requires a deliberate
        // activation outside this tool.
        let payload = json!({
            "operations": [{
                "create": {
                    "adGroup": ad_group_resource_name,
                    "ad": { "resourceName": ad_resource_name },
                    "status": "PAUSED",
                }
            }]
        });

        let response = self
            .post_json(&self.mutate_url(customer_id, "adGroupAds"), &payload)
            .await?;
        Self::first_resource_name(&response)
    }

    async fn query_ad_group_ad_status(
        &self,
        customer_id: &str,
        resource_names: &[String],
    ) -> Result<HashMap<String, AdStatusSnapshot>> {
        if resource_names.is_empty() {
            return Ok(HashMap::new());
        }

        let payload = json!({ "query": status_query(resource_names) });
        let response = self.post_json(&self.search_url(customer_id), &payload).await?;
        Ok(parse_search_results(&response))
    }

    async fn update_ad_final_url(
        &self,
        customer_id: &str,
        resource_name: &str,
        new_url: &str,
    ) -> Result<String> {
        tracing::info!("Updating Final URL of {} to {}", resource_name, new_url);

        // Field mask keeps this a partial update: only ad.final_urls moves
        let payload = json!({
            "operations": [{
                "update": {
                    "resourceName": resource_name,
                    "ad": { "finalUrls": [new_url] },
                },
                "updateMask": "ad.final_urls",
            }]
        });

        let response = self
            .post_json(&self.mutate_url(customer_id, "adGroupAds"), &payload)
            .await?;
        Self::first_resource_name(&response)
    }

    fn provider_name(&self) -> &'static str {
        "googleads"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GoogleAdsConfig {
        GoogleAdsConfig {
            developer_token: "dev-token-abc".to_string(),
            access_token: "ya29.secret-access".to_string(),
            login_customer_id: None,
        }
    }

    #[test]
    fn provider_rejects_empty_credentials() {
        let mut config = test_config();
        config.developer_token.clear();
        assert!(GoogleAdsProvider::new(config).is_err());
    }

    #[test]
    fn provider_name_is_stable() {
        let provider = GoogleAdsProvider::new(test_config()).unwrap();
        assert_eq!(provider.provider_name(), "googleads");
    }

    #[test]
    fn tokens_not_exposed_in_debug() {
        let provider = GoogleAdsProvider::new(test_config()).unwrap();
        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("dev-token-abc"));
        assert!(!debug_str.contains("ya29.secret-access"));
        assert!(debug_str.contains("GoogleAdsProvider"));
    }

    #[test]
    fn status_query_quotes_and_joins_resource_names() {
        let query = status_query(&[
            "customers/1/adGroupAds/1~1".to_string(),
            "customers/1/adGroupAds/2~2".to_string(),
        ]);
        assert!(query.contains(
            "IN ('customers/1/adGroupAds/1~1', 'customers/1/adGroupAds/2~2')"
        ));
        assert!(query.contains("ad_group_ad.policy_summary.approval_status"));
        assert!(query.contains("ad_group_ad.ad.final_urls"));
    }

    #[test]
    fn failure_message_extracted_verbatim() {
        let body = r#"{"error": {"code": 400, "message": "The ad violates policy X.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(extract_failure_message(body, 400), "The ad violates policy X.");
    }

    #[test]
    fn failure_message_falls_back_to_raw_body() {
        let message = extract_failure_message("gateway exploded", 502);
        assert!(message.contains("502"));
        assert!(message.contains("gateway exploded"));
    }

    #[test]
    fn search_results_fold_into_snapshots() {
        let response = json!({
            "results": [
                {
                    "adGroupAd": {
                        "resourceName": "customers/1/adGroupAds/1~1",
                        "policySummary": { "approvalStatus": "APPROVED" },
                        "ad": { "finalUrls": ["https://a.example.com/x"] }
                    }
                },
                {
                    "adGroupAd": {
                        "resourceName": "customers/1/adGroupAds/2~2",
                        "policySummary": { "approvalStatus": "UNDER_REVIEW" }
                    }
                }
            ]
        });

        let snapshots = parse_search_results(&response);
        assert_eq!(snapshots.len(), 2);

        let first = &snapshots["customers/1/adGroupAds/1~1"];
        assert_eq!(first.approval_status, ApprovalStatus::Approved);
        assert_eq!(first.final_urls, vec!["https://a.example.com/x"]);

        let second = &snapshots["customers/1/adGroupAds/2~2"];
        assert_eq!(second.approval_status, ApprovalStatus::Unknown);
        assert!(second.final_urls.is_empty());
    }

    #[test]
    fn empty_search_response_yields_no_snapshots() {
        assert!(parse_search_results(&json!({})).is_empty());
        assert!(parse_search_results(&json!({ "results": [] })).is_empty());
    }
}
