use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use futures_util::future::join_all;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use tracing::{debug, info, warn};

use crate::config::{self, Config, FILTER_SETS, ISTANBUL_UTC_OFFSET_SECS};
use crate::error::Result;
use crate::scrape::{extract_table, normalize_rows};
use crate::stats::aggregate;
use crate::types::{FilterResult, FilterSpec, ResponsePayload, ResultsByFilter, ShipRecord};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Shared client for upstream calls. The timeout here is the only one applied.
pub fn build_client(cfg: &Config) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.http_timeout_secs))
        .build()?;
    Ok(client)
}

/// Query all four filters concurrently and assemble the dashboard payload.
///
/// Per-filter failures (network, non-2xx, missing table, short rows) are
/// captured as `{error}` entries and zero-valued stats. Only a request that
/// cannot be built fails the whole call.
pub async fn fetch_all_ship_data(
    client: &reqwest::Client,
    cfg: &Config,
) -> Result<ResponsePayload> {
    let requests = FILTER_SETS
        .iter()
        .map(|filter| build_request(client, cfg, filter))
        .collect::<Result<Vec<_>>>()?;

    let outcomes = join_all(
        FILTER_SETS
            .iter()
            .zip(requests)
            .map(|(filter, request)| async move {
                let result = match fetch_filter(client, request).await {
                    Ok(ships) => {
                        debug!(filter = filter.name, rows = ships.len(), "filter scraped");
                        FilterResult::Ships(ships)
                    }
                    Err(e) => {
                        warn!(filter = filter.name, error = %e, "filter failed");
                        FilterResult::Failed { error: e.to_string() }
                    }
                };
                (filter.name, result)
            }),
    )
    .await;

    let detailed_data: ResultsByFilter = outcomes.into_iter().collect();
    let stats = aggregate(&detailed_data);

    info!(
        filters = detailed_data.len(),
        failed = detailed_data.failed_count(),
        ships = detailed_data
            .iter()
            .filter_map(|(_, r)| r.ships())
            .map(<[ShipRecord]>::len)
            .sum::<usize>(),
        "ship data fetched",
    );

    Ok(ResponsePayload {
        stats,
        detailed_data,
        last_update: format_last_update(Utc::now()),
    })
}

fn build_request(
    client: &reqwest::Client,
    cfg: &Config,
    filter: &FilterSpec,
) -> Result<reqwest::Request> {
    let request = client
        .post(&cfg.upstream_url)
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .header(USER_AGENT, config::USER_AGENT)
        .form(&filter.params.form_fields())
        .build()?;
    Ok(request)
}

async fn fetch_filter(client: &reqwest::Client, request: reqwest::Request) -> Result<Vec<ShipRecord>> {
    let html = client
        .execute(request)
        .await?
        .error_for_status()?
        .text()
        .await?;
    let rows = extract_table(&html)?;
    normalize_rows(&rows)
}

/// `dd.MM.yyyy HH:mm` in Istanbul local time.
pub fn format_last_update(now: DateTime<Utc>) -> String {
    const FORMAT: &str = "%d.%m.%Y %H:%M";
    match FixedOffset::east_opt(ISTANBUL_UTC_OFFSET_SECS) {
        Some(istanbul) => now.with_timezone(&istanbul).format(FORMAT).to_string(),
        None => now.format(FORMAT).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{http::StatusCode, response::IntoResponse, routing::post, Form, Router};
    use chrono::TimeZone;

    use super::*;
    use crate::config::TABLE_MARKER;
    use crate::error::AppError;
    use crate::types::{BucketStats, DashboardStats, Direction, Status};

    fn test_client() -> reqwest::Client {
        build_client(&Config { http_timeout_secs: 5, ..Config::default() }).unwrap()
    }

    fn table_page(rows: &[[&str; 9]]) -> String {
        let body: String = rows
            .iter()
            .map(|cells| {
                let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
                format!("<tr>{tds}</tr>\n")
            })
            .collect();
        format!(
            "<html><body>{TABLE_MARKER}\n<tr><th>#</th><th>Planlama</th></tr>\n{body}</table></body></html>"
        )
    }

    async fn upstream(Form(form): Form<HashMap<String, String>>) -> axum::response::Response {
        assert_eq!(form.get("Strait").map(String::as_str), Some("I"));
        assert_eq!(form.get("submitted").map(String::as_str), Some("1"));
        let key = (
            form.get("Direction").cloned().unwrap_or_default(),
            form.get("Movement").cloned().unwrap_or_default(),
        );
        match (key.0.as_str(), key.1.as_str()) {
            ("NS", "YP") => table_page(&[
                ["1", "08:00 &#304;STANBUL", "ATLAS", "229,5", "CRUDE OIL TANKER", "Evet", "Evet", "a", "b"],
                ["2", "09:00", "MARMARA", "120", "GENERAL CARGO", "Hayır", "Hayır", "c", "d"],
                ["3", "10:00", "EVER GIVEN", "399,9", "CONTAINER SHIP", "EVET", "Hayır", "e", "f"],
            ])
            .into_response(),
            ("NS", "YG") => "<html><body>bakım çalışması</body></html>".into_response(),
            ("SN", "YP") => format!("{TABLE_MARKER}<tr><td>1</td><td>kısa</td></tr></table>").into_response(),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "down").into_response(),
        }
    }

    async fn spawn_upstream() -> String {
        let app = Router::new().route("/traffic", post(upstream));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}/traffic")
    }

    #[tokio::test]
    async fn each_filter_is_resolved_independently() {
        let cfg = Config { upstream_url: spawn_upstream().await, ..Config::default() };
        let payload = fetch_all_ship_data(&test_client(), &cfg).await.unwrap();

        let ships = payload.detailed_data.get("Kuzey-Güney_Planlı").and_then(FilterResult::ships).unwrap();
        assert_eq!(ships.len(), 3);
        assert_eq!(ships[0].scheduling_label, "08:00 İSTANBUL");
        assert_eq!(ships[0].length, 229.5);
        assert_eq!(ships[0].aux_field2, "a");
        assert_eq!(ships[0].aux_field1, "b");
        assert!(ships[2].has_pilot);

        assert_eq!(
            payload.detailed_data.get("Kuzey-Güney_Hazır"),
            Some(&FilterResult::Failed { error: "Table not found".to_string() })
        );
        match payload.detailed_data.get("Güney-Kuzey_Planlı") {
            Some(FilterResult::Failed { error }) => assert!(error.contains("column 2"), "{error}"),
            other => panic!("expected short-row failure, got {other:?}"),
        }
        match payload.detailed_data.get("Güney-Kuzey_Hazır") {
            Some(FilterResult::Failed { error }) => assert!(error.contains("500"), "{error}"),
            other => panic!("expected status failure, got {other:?}"),
        }

        assert_eq!(
            *payload.stats.bucket(Direction::North, Status::Planned),
            BucketStats { total: 3, with_pilot: 2, without_pilot: 1, daytime_only: 2 }
        );
        assert_eq!(*payload.stats.bucket(Direction::North, Status::Ready), BucketStats::default());
        assert_eq!(payload.stats.south, Default::default());
    }

    #[tokio::test]
    async fn payload_keeps_filter_order_in_json() {
        let cfg = Config { upstream_url: spawn_upstream().await, ..Config::default() };
        let payload = fetch_all_ship_data(&test_client(), &cfg).await.unwrap();
        let json = serde_json::to_string(&payload).unwrap();

        let positions: Vec<usize> = FILTER_SETS
            .iter()
            .map(|f| json.find(&format!("\"{}\"", f.name)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");

        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(v["stats"]["kuzey"]["planli"]["gunduzcu"].is_u64());
        assert!(v["detailedData"]["Kuzey-Güney_Hazır"]["error"].is_string());
        assert!(v["lastUpdate"].is_string());
    }

    #[tokio::test]
    async fn all_upstream_failures_yield_zeroed_payload() {
        // nothing listens on port 1
        let cfg = Config { upstream_url: "http://127.0.0.1:1/".to_string(), ..Config::default() };
        let payload = fetch_all_ship_data(&test_client(), &cfg).await.unwrap();

        assert_eq!(payload.detailed_data.len(), 4);
        assert_eq!(payload.detailed_data.failed_count(), 4);
        for filter in &FILTER_SETS {
            assert!(matches!(
                payload.detailed_data.get(filter.name),
                Some(FilterResult::Failed { .. })
            ));
        }
        assert_eq!(payload.stats, DashboardStats::default());
    }

    #[tokio::test]
    async fn unbuildable_request_is_fatal() {
        let cfg = Config { upstream_url: "not a url".to_string(), ..Config::default() };
        let err = fetch_all_ship_data(&test_client(), &cfg).await.unwrap_err();
        assert!(matches!(err, AppError::Http(_)), "{err:?}");
    }

    #[test]
    fn last_update_is_istanbul_local_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 21, 7, 0).unwrap();
        assert_eq!(format_last_update(now), "06.03.2024 00:07");
        let now = Utc.with_ymd_and_hms(2025, 11, 30, 9, 5, 59).unwrap();
        assert_eq!(format_last_update(now), "30.11.2025 12:05");
    }
}
