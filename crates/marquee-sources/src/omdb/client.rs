use async_trait::async_trait;
use marquee_config::{Config, CredentialStore};
use marquee_models::{ContentKind, ExternalRecord, SearchPage};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::omdb::api;
use crate::{MetadataProvider, SourceError};

/// Connection settings for [`OmdbClient`], injected at construction
#[derive(Debug, Clone)]
pub struct OmdbSettings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl OmdbSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://www.omdbapi.com/".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Settings from config, API key resolved through env/credentials/config
    pub fn from_config(config: &Config, credentials: &CredentialStore) -> anyhow::Result<Self> {
        Ok(Self {
            api_key: config.require_api_key(credentials)?,
            base_url: config.omdb.base_url.trim().to_string(),
            timeout: Duration::from_secs(config.omdb.timeout_secs),
        })
    }
}

#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    settings: OmdbSettings,
}

impl OmdbClient {
    pub fn new(settings: OmdbSettings) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, settings))
    }

    /// Use a caller-built reqwest client (shared pools, proxies)
    pub fn with_client(client: Client, settings: OmdbSettings) -> Self {
        Self { client, settings }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }

    async fn get(&self, params: &[(&str, String)]) -> Result<String, SourceError> {
        let mut query: Vec<(&str, String)> = vec![("apikey", self.settings.api_key.clone())];
        query.extend(params.iter().cloned());

        let response = self
            .client
            .get(&self.settings.base_url)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}

fn search_params(query: &str, kind: Option<ContentKind>, page: u32) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("s", query.to_string()),
        ("page", page.max(1).to_string()),
    ];
    if let Some(kind) = kind {
        params.push(("type", kind.as_str().to_string()));
    }
    params
}

fn details_params(external_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("i", external_id.trim().to_string()),
        ("plot", "full".to_string()),
    ]
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    fn provider_name(&self) -> &str {
        "omdb"
    }

    async fn search(
        &self,
        query: &str,
        kind: Option<ContentKind>,
        page: u32,
    ) -> Result<SearchPage, SourceError> {
        debug!(query, ?kind, page, "OMDB search");
        let result = match self.get(&search_params(query, kind, page)).await {
            Ok(body) => api::decode_search(&body),
            Err(e) => Err(e),
        };

        match &result {
            Ok(page) => debug!(query, results = page.results.len(), total = page.total, "OMDB search done"),
            Err(e) if e.is_transport() => error!(query, "OMDB search error: {}", e),
            Err(e) => warn!(query, "OMDB search rejected: {}", e),
        }
        result
    }

    async fn details(&self, external_id: &str) -> Result<ExternalRecord, SourceError> {
        debug!(external_id, "OMDB details");
        let result = match self.get(&details_params(external_id)).await {
            Ok(body) => api::decode_details(&body),
            Err(e) => Err(e),
        };

        match &result {
            Ok(record) => debug!(external_id, kind = %record.kind, "OMDB details done"),
            Err(e) if e.is_transport() => error!(external_id, "OMDB details error: {}", e),
            Err(e) => warn!(external_id, "OMDB details lookup failed: {}", e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params() {
        let params = search_params("Batman", Some(ContentKind::Series), 2);
        assert_eq!(
            params,
            vec![
                ("s", "Batman".to_string()),
                ("page", "2".to_string()),
                ("type", "series".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_params_without_kind_and_zero_page() {
        let params = search_params("Batman", None, 0);
        assert_eq!(params, vec![("s", "Batman".to_string()), ("page", "1".to_string())]);
    }

    #[test]
    fn test_details_params() {
        let params = details_params(" tt0468569 ");
        assert_eq!(
            params,
            vec![("i", "tt0468569".to_string()), ("plot", "full".to_string())]
        );
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.omdb.api_key = "abc".to_string();
        config.omdb.timeout_secs = 5;
        let credentials = CredentialStore::new(std::path::PathBuf::from("/tmp/marquee-no-credentials.toml"));

        // An env override set by the developer running the tests would win, so only
        // check the parts that do not depend on the environment.
        let settings = OmdbSettings::from_config(&config, &credentials).unwrap();
        assert_eq!(settings.base_url, "https://www.omdbapi.com/");
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert!(!settings.api_key.is_empty());
    }

    #[test]
    fn test_client_builds() {
        let client = OmdbClient::new(OmdbSettings::new("abc")).unwrap();
        assert_eq!(client.provider_name(), "omdb");
        assert_eq!(client.base_url(), "https://www.omdbapi.com/");
    }

    mod wire {
        use super::*;
        use axum::extract::{Query, State};
        use axum::http::StatusCode;
        use axum::routing::get;
        use axum::{Json, Router};
        use serde_json::{json, Value};
        use std::collections::HashMap;
        use std::sync::{Arc, Mutex};

        type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

        const API_KEY: &str = "good-key";

        async fn fake_omdb(
            State(seen): State<Seen>,
            Query(params): Query<HashMap<String, String>>,
        ) -> (StatusCode, Json<Value>) {
            seen.lock().unwrap().push(params.clone());

            if params.get("apikey").map(String::as_str) != Some(API_KEY) {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"Response": "False", "Error": "Invalid API key!"})),
                );
            }
            if let Some(query) = params.get("s") {
                if query == "Batman" {
                    return (
                        StatusCode::OK,
                        Json(json!({
                            "Search": [
                                {"Title": "Batman Begins", "Year": "2005", "imdbID": "tt0372784", "Type": "movie", "Poster": "N/A"}
                            ],
                            "totalResults": "1",
                            "Response": "True"
                        })),
                    );
                }
                return (StatusCode::OK, Json(json!({"Response": "False", "Error": "Movie not found!"})));
            }
            if params.get("i").map(String::as_str) == Some("tt0468569") {
                return (
                    StatusCode::OK,
                    Json(json!({
                        "Title": "The Dark Knight",
                        "Year": "2008",
                        "Runtime": "152 min",
                        "imdbRating": "9.0",
                        "imdbID": "tt0468569",
                        "Type": "movie",
                        "Response": "True"
                    })),
                );
            }
            (StatusCode::OK, Json(json!({"Response": "False", "Error": "Incorrect IMDb ID."})))
        }

        async fn spawn_omdb(api_key: &str) -> (OmdbClient, Seen) {
            let seen: Seen = Arc::default();
            let app = Router::new().route("/", get(fake_omdb)).with_state(seen.clone());
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            let settings = OmdbSettings {
                api_key: api_key.to_string(),
                base_url: format!("http://{}/", addr),
                timeout: Duration::from_secs(5),
            };
            (OmdbClient::new(settings).unwrap(), seen)
        }

        #[tokio::test]
        async fn test_search_sends_key_and_query() {
            let (client, seen) = spawn_omdb(API_KEY).await;

            let page = client.search("Batman", Some(ContentKind::Movie), 1).await.unwrap();
            assert_eq!(page.total, 1);
            assert_eq!(page.results[0].imdb_id, "tt0372784");
            assert_eq!(page.results[0].poster, None);

            let params = seen.lock().unwrap()[0].clone();
            assert_eq!(params["apikey"], API_KEY);
            assert_eq!(params["s"], "Batman");
            assert_eq!(params["type"], "movie");
            assert_eq!(params["page"], "1");
        }

        #[tokio::test]
        async fn test_search_refusal_is_provider_error() {
            let (client, _seen) = spawn_omdb(API_KEY).await;

            let err = client.search("zzzz", None, 1).await.unwrap_err();
            assert!(matches!(err, SourceError::Provider(ref m) if m == "Movie not found!"));
            assert!(!err.is_transport());
        }

        #[tokio::test]
        async fn test_details_requests_full_plot() {
            let (client, seen) = spawn_omdb(API_KEY).await;

            let record = client.details("tt0468569").await.unwrap();
            assert_eq!(record.title.as_deref(), Some("The Dark Knight"));
            assert_eq!(record.raw["Runtime"], "152 min");

            let params = seen.lock().unwrap()[0].clone();
            assert_eq!(params["i"], "tt0468569");
            assert_eq!(params["plot"], "full");
        }

        #[tokio::test]
        async fn test_details_unknown_id_is_not_found() {
            let (client, _seen) = spawn_omdb(API_KEY).await;

            let err = client.details("tt0000000").await.unwrap_err();
            assert!(matches!(err, SourceError::NotFound(ref m) if m == "Incorrect IMDb ID."));
        }

        #[tokio::test]
        async fn test_http_error_status_is_transport() {
            let (client, _seen) = spawn_omdb("wrong-key").await;

            let err = client.details("tt0468569").await.unwrap_err();
            match &err {
                SourceError::Status { status, body } => {
                    assert_eq!(*status, 401);
                    assert!(body.contains("Invalid API key!"));
                }
                other => panic!("expected a status error, got {:?}", other),
            }
            assert!(err.is_transport());
        }
    }
}
