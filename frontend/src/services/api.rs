use gloo::net::http::Request;
use shared::{CreateScheduleRequest, ScheduleListResponse, ScheduleQuery};

/// API client for communicating with the transport backend.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with the default base URL.
    pub fn new() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
        }
    }

    /// Create a new API client with a custom base URL.
    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url }
    }

    /// Fetch schedule records, optionally filtered. The records come back as
    /// raw JSON values; normalization happens on the caller's side.
    pub async fn get_schedules(
        &self,
        query: &ScheduleQuery,
    ) -> Result<ScheduleListResponse, String> {
        let url = format!("{}/schedule{}", self.base_url, query.to_query_string());

        match Request::get(&url).send().await {
            Ok(response) => {
                if response.ok() {
                    match response.json::<ScheduleListResponse>().await {
                        Ok(data) => Ok(data),
                        Err(e) => Err(format!("Failed to parse schedules: {}", e)),
                    }
                } else {
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Failed to fetch schedules: {}", e)),
        }
    }

    /// Create a schedule. Returns the raw record the backend stored, which
    /// the caller can normalize and append while the full refetch runs.
    pub async fn create_schedule(
        &self,
        request: &CreateScheduleRequest,
    ) -> Result<serde_json::Value, String> {
        let url = format!("{}/schedule", self.base_url);

        match Request::post(&url)
            .json(request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    match response.json::<serde_json::Value>().await {
                        Ok(data) => Ok(data),
                        Err(e) => Err(format!("Failed to parse response: {}", e)),
                    }
                } else {
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
