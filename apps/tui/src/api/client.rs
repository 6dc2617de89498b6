use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{
    ApiRequest, Envelope, MaintenancePayload, RecordsPayload, StatsPayload,
};
use super::{ApiError, DataSource};
use crate::domain::{DataOperation, MaintenanceReport, Statistics, UserSummary, WorkRecordGroup};

/// Client for the admin statistics cloud function.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    url: Url,
    page_size: u32,
}

impl ApiClient {
    pub fn new(url: &str, timeout: Duration, page_size: u32) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("worklog-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Self::from_reqwest(url, http, page_size)
    }

    pub fn from_reqwest(url: &str, http: reqwest::Client, page_size: u32) -> Result<Self, ApiError> {
        let url = Url::parse(url).map_err(|e| ApiError::InvalidUrl(format!("{url}: {e}")))?;

        Ok(Self {
            http,
            url,
            page_size: page_size.max(1),
        })
    }

    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Posts `request` and unwraps the `{ success, data, error }` envelope.
    async fn envelope<T: DeserializeOwned>(
        &self,
        request: &ApiRequest<'_>,
    ) -> Result<Envelope<T>, ApiError> {
        debug!(action = request.action, url = %self.url, "calling statistics API");

        let response = self.http.post(self.url.clone()).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let envelope: Envelope<T> =
            serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
                action: request.action.to_string(),
                source,
            })?;

        if !envelope.success {
            let message = envelope
                .error
                .unwrap_or_else(|| "request failed".to_string());
            return Err(ApiError::rejected(request.action, message));
        }

        Ok(envelope)
    }

    async fn call<T: DeserializeOwned>(&self, request: &ApiRequest<'_>) -> Result<T, ApiError> {
        self.envelope(request)
            .await?
            .data
            .ok_or_else(|| ApiError::rejected(request.action, "response carried no data"))
    }
}

impl DataSource for ApiClient {
    async fn fetch_stats(&self) -> Result<Statistics, ApiError> {
        let payload: StatsPayload = self.call(&ApiRequest::action("getStats")).await?;
        Ok(payload.statistics())
    }

    async fn fetch_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        // The user table is part of the getStats payload.
        let payload: StatsPayload = self.call(&ApiRequest::action("getStats")).await?;
        Ok(payload.user_list.into_iter().map(UserSummary::from).collect())
    }

    async fn fetch_records(&self) -> Result<Vec<WorkRecordGroup>, ApiError> {
        let mut request = ApiRequest::action("getRecords");
        request.page = Some(1);
        request.limit = Some(self.page_size);

        let payload: RecordsPayload = self.call(&request).await?;
        debug!(
            received = payload.records.len(),
            total = payload.total,
            "work records page loaded"
        );
        Ok(payload.records.into_iter().map(WorkRecordGroup::from).collect())
    }

    async fn run_maintenance(
        &self,
        operation: &DataOperation,
    ) -> Result<MaintenanceReport, ApiError> {
        let mut request = ApiRequest::action(operation.action());
        if let DataOperation::DeleteUser(name) = operation {
            request.user_name = Some(name.as_str());
        }

        let envelope: Envelope<MaintenancePayload> = self.envelope(&request).await?;
        Ok(envelope.data.unwrap_or_default().into_report(operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> Result<(MockServer, ApiClient), ApiError> {
        let server = MockServer::start().await;
        let client = ApiClient::from_reqwest(
            &format!("{}/adminWeb", server.uri()),
            reqwest::Client::new(),
            20,
        )?;
        Ok((server, client))
    }

    fn stats_body() -> serde_json::Value {
        json!({
            "success": true,
            "data": {
                "totalUsers": 3,
                "totalRecords": 60,
                "totalSuccess": 51,
                "successRate": 85,
                "userList": [
                    { "userName": "Alice", "totalRecords": 30, "successCount": 27, "failCount": 3, "successRate": 90 },
                    { "userName": "Bob", "totalRecords": 30, "successCount": 24, "failCount": 6, "successRate": 80 }
                ]
            }
        })
    }

    #[tokio::test]
    async fn fetch_stats_posts_action() -> Result<(), Box<dyn std::error::Error>> {
        let (server, client) = setup().await?;

        Mock::given(method("POST"))
            .and(path("/adminWeb"))
            .and(body_json(json!({ "action": "getStats" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats_body()))
            .expect(1)
            .mount(&server)
            .await;

        let stats = client.fetch_stats().await?;
        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.total_success, 51);
        assert!((stats.success_rate - 85.0).abs() < f64::EPSILON);

        Ok(())
    }

    #[tokio::test]
    async fn fetch_users_reads_user_list() -> Result<(), Box<dyn std::error::Error>> {
        let (server, client) = setup().await?;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats_body()))
            .mount(&server)
            .await;

        let users = client.fetch_users().await?;
        let names: Vec<&str> = users.iter().map(|user| user.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert_eq!(users[1].fail_count, 6);

        Ok(())
    }

    #[tokio::test]
    async fn fetch_records_sends_page_and_limit() -> Result<(), Box<dyn std::error::Error>> {
        let (server, client) = setup().await?;

        Mock::given(method("POST"))
            .and(body_json(json!({ "action": "getRecords", "page": 1, "limit": 20 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "records": [{
                        "userName": "Alice",
                        "date": "2024-07-11",
                        "items": [{ "workContent": "Survey", "dataCount": 5, "successCount": 4, "failCount": 1 }]
                    }],
                    "total": 1
                }
            })))
            .mount(&server)
            .await;

        let records = client.fetch_records().await?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].owner, "Alice");
        assert_eq!(records[0].entries[0].work_content, "Survey");

        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let (server, client) = setup().await?;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client.fetch_stats().await.err().ok_or("expected failure")?;
        assert!(matches!(err, ApiError::Status { status: 502 }));

        Ok(())
    }

    #[tokio::test]
    async fn success_false_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let (server, client) = setup().await?;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": false, "error": "database offline" })),
            )
            .mount(&server)
            .await;

        let err = client.fetch_users().await.err().ok_or("expected failure")?;
        match err {
            ApiError::Rejected { action, message } => {
                assert_eq!(action, "getStats");
                assert_eq!(message, "database offline");
            }
            other => return Err(format!("unexpected error: {other}").into()),
        }

        Ok(())
    }

    #[tokio::test]
    async fn missing_data_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let (server, client) = setup().await?;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .mount(&server)
            .await;

        let err = client.fetch_records().await.err().ok_or("expected failure")?;
        assert!(matches!(err, ApiError::Rejected { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() -> Result<(), Box<dyn std::error::Error>> {
        let (server, client) = setup().await?;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = client.fetch_stats().await.err().ok_or("expected failure")?;
        assert!(matches!(err, ApiError::Decode { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() -> Result<(), Box<dyn std::error::Error>> {
        let (server, client) = setup().await?;
        drop(server);

        let err = client.fetch_stats().await.err().ok_or("expected failure")?;
        assert!(matches!(err, ApiError::Transport(_)));

        Ok(())
    }

    #[tokio::test]
    async fn delete_user_sends_user_name() -> Result<(), Box<dyn std::error::Error>> {
        let (server, client) = setup().await?;

        Mock::given(method("POST"))
            .and(body_json(json!({ "action": "deleteUser", "userName": "Bob" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "data": { "removed": 4 } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let report = client
            .run_maintenance(&DataOperation::DeleteUser("Bob".to_string()))
            .await?;
        assert_eq!(
            report,
            MaintenanceReport::Deleted {
                user: "Bob".to_string(),
                records: 4,
            }
        );

        Ok(())
    }

    #[test]
    fn invalid_url_is_rejected() {
        let result = ApiClient::from_reqwest("not a url", reqwest::Client::new(), 10);
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }
}
