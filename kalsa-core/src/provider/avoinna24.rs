use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::SlotError,
    model::{FacilityQuery, SlotRecord},
};

use super::SlotApi;

const API_URL: &str = "https://avoinna24.fi/api/slot";
const SUBDOMAIN_HEADER: &str = "X-Subdomain";
const SUBDOMAIN: &str = "arenacenter";

/// The API enforces no timeout of its own; expiry surfaces as a transport
/// error like any other network failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the avoinna24.fi booking API.
#[derive(Debug, Clone)]
pub struct Avoinna24Client {
    http: Client,
}

impl Avoinna24Client {
    pub fn new() -> Result<Self, SlotError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http })
    }

    fn query_parameters(query: &FacilityQuery) -> Vec<(&'static str, String)> {
        let date = query.date.format("%Y-%m-%d").to_string();
        vec![
            ("filter[ismultibooking]", query.multibooking.to_string()),
            ("filter[branch_id]", query.branch_id.clone()),
            ("filter[group_id]", query.group_id.clone()),
            ("filter[product_id]", query.product_id.clone()),
            ("filter[user_id]", query.user_id.clone()),
            ("filter[date]", date.clone()),
            ("filter[start]", date.clone()),
            ("filter[end]", date),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct SlotResponse {
    data: Vec<SlotEntry>,
}

#[derive(Debug, Deserialize)]
struct SlotEntry {
    attributes: SlotAttributes,
}

#[derive(Debug, Deserialize)]
struct SlotAttributes {
    endtime: String,
}

/// Parse the API's offset-less end timestamp and tag it as UTC.
///
/// The feed has served both `2024-04-24T18:00:00` and
/// `2024-04-24 18:00:00`; accept either.
fn parse_end_time(raw: &str) -> Result<DateTime<Utc>, SlotError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .map(|naive| naive.and_utc())
        .map_err(|err| SlotError::Parse(format!("bad endtime {raw:?}: {err}")))
}

#[async_trait]
impl SlotApi for Avoinna24Client {
    async fn list_slots(&self, query: &FacilityQuery) -> Result<Vec<SlotRecord>, SlotError> {
        let res = self
            .http
            .get(API_URL)
            .header(SUBDOMAIN_HEADER, SUBDOMAIN)
            .query(&Self::query_parameters(query))
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(SlotError::Transport(format!(
                "slot listing failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        let parsed: SlotResponse = serde_json::from_str(&body)?;

        parsed
            .data
            .into_iter()
            .map(|entry| {
                parse_end_time(&entry.attributes.endtime)
                    .map(|end_time| SlotRecord { end_time })
            })
            .collect()
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        // Walk back to a char boundary so multi-byte text never splits.
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
