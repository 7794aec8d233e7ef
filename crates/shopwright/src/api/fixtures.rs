//! Board service fixtures.
//!
//! An [`ApiSession`] owns the client and the test data. Board, list and
//! card fixtures are created through it; each creation asserts that the
//! service echoed the requested name and registers the resource on the
//! session's [`FixtureStack`], which deletes everything in reverse
//! creation order on teardown.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use super::client::{ApiCredentials, BoardClient, DEFAULT_BASE_URL};
use super::models::{self, Board, Card, List, Resource, ResourceKind};
use crate::result::{ShopError, ShopResult};

/// Default test-data location
pub const DEFAULT_TEST_DATA: &str = "data/test_data.json";

fn default_board() -> Board {
    Board::new("Test Board", "A board for testing")
}

fn default_list() -> List {
    List::new("Test List")
}

fn default_card() -> Card {
    let card = Card::new("Test Card", "A card for testing");
    match Utc.with_ymd_and_hms(2024, 12, 31, 12, 0, 0).single() {
        Some(due) => card.with_due(due),
        None => card,
    }
}

/// Credentials and fixture payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestData {
    /// Application key
    pub api_key: String,
    /// User token
    pub token: String,
    /// Board fixture payload
    #[serde(default = "default_board")]
    pub board: Board,
    /// List fixture payload
    #[serde(default = "default_list")]
    pub list: List,
    /// Card fixture payload
    #[serde(default = "default_card")]
    pub card: Card,
}

impl TestData {
    /// Test data with the default fixture payloads
    #[must_use]
    pub fn new(api_key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            token: token.into(),
            board: default_board(),
            list: default_list(),
            card: default_card(),
        }
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> ShopResult<Self> {
        serde_json::from_str(json).map_err(|e| ShopError::test_data(format!("invalid test data: {e}")))
    }

    /// Read the test-data file. A missing file or missing keys are fatal.
    pub fn load(path: impl AsRef<Path>) -> ShopResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ShopError::test_data(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Key and token
    #[must_use]
    pub fn credentials(&self) -> ApiCredentials {
        ApiCredentials::new(&self.api_key, &self.token)
    }
}

/// Resources awaiting deletion, in creation order.
#[derive(Debug, Default)]
pub struct FixtureStack {
    entries: Mutex<Vec<(ResourceKind, String)>>,
}

impl FixtureStack {
    /// Empty stack
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource for teardown
    pub fn push(&self, kind: ResourceKind, id: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((kind, id.into()));
    }

    /// Resources still registered
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delete every registered resource, newest first.
    ///
    /// Keeps going past failures; the first transport failure is returned
    /// as [`ShopError::Fixture`]. A non-2xx delete is logged only.
    pub async fn teardown(&self, client: &BoardClient) -> ShopResult<()> {
        let entries = std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner));
        let mut first_error = None;
        for (kind, id) in entries.into_iter().rev() {
            match models::delete(client, kind, &id).await {
                Ok(response) if !response.is_success() => {
                    tracing::warn!("Teardown left {} {id} behind (status {})", kind.label(), response.status);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Teardown of {} {id} failed: {e}", kind.label());
                    first_error.get_or_insert_with(|| {
                        ShopError::fixture(format!("teardown of {} {id} failed: {e}", kind.label()))
                    });
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Board created for a test module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardFixture {
    /// Service response
    pub resource: Resource,
}

/// List created on a [`BoardFixture`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFixture {
    /// Service response
    pub resource: Resource,
}

/// Card created on a [`ListFixture`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFixture {
    /// Service response
    pub resource: Resource,
}

impl BoardFixture {
    /// Board id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.resource.id
    }
}

impl ListFixture {
    /// List id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.resource.id
    }
}

impl CardFixture {
    /// Card id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.resource.id
    }
}

/// Client, test data and teardown stack for one API test session.
#[derive(Debug)]
pub struct ApiSession {
    client: BoardClient,
    data: TestData,
    stack: FixtureStack,
}

impl ApiSession {
    /// Session against the public endpoint
    pub fn new(data: TestData) -> ShopResult<Self> {
        Self::with_base_url(data, DEFAULT_BASE_URL)
    }

    /// Session against `base_url`
    pub fn with_base_url(data: TestData, base_url: &str) -> ShopResult<Self> {
        let client = BoardClient::with_base_url(data.credentials(), base_url)?;
        tracing::info!("Starting the API test session against {}", client.base_url());
        Ok(Self {
            client,
            data,
            stack: FixtureStack::new(),
        })
    }

    /// HTTP client
    #[must_use]
    pub const fn client(&self) -> &BoardClient {
        &self.client
    }

    /// Test data
    #[must_use]
    pub const fn data(&self) -> &TestData {
        &self.data
    }

    /// Pending teardown entries
    #[must_use]
    pub const fn stack(&self) -> &FixtureStack {
        &self.stack
    }

    /// Create the board fixture
    pub async fn board(&self) -> ShopResult<BoardFixture> {
        let response = self.data.board.create(&self.client).await?;
        let resource = self.register(ResourceKind::Board, &self.data.board.name, &response)?;
        Ok(BoardFixture { resource })
    }

    /// Create the list fixture on `board`
    pub async fn list(&self, board: &BoardFixture) -> ShopResult<ListFixture> {
        let response = self.data.list.create(&self.client, board.id()).await?;
        let resource = self.register(ResourceKind::List, &self.data.list.name, &response)?;
        Ok(ListFixture { resource })
    }

    /// Create the card fixture on `list`
    pub async fn card(&self, list: &ListFixture) -> ShopResult<CardFixture> {
        let response = self.data.card.create(&self.client, list.id()).await?;
        let resource = self.register(ResourceKind::Card, &self.data.card.name, &response)?;
        Ok(CardFixture { resource })
    }

    fn register(
        &self,
        kind: ResourceKind,
        name: &str,
        response: &super::client::ApiResponse,
    ) -> ShopResult<Resource> {
        tracing::info!("{} creation response: {}", kind.label(), response.body_text());
        let id = response.ensure_created(name)?;
        self.stack.push(kind, id);
        response.resource()
    }

    /// Delete every fixture created through this session
    pub async fn teardown(&self) -> ShopResult<()> {
        let result = self.stack.teardown(&self.client).await;
        tracing::info!("Ending the API test session");
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    mod test_data {
        use super::*;

        #[test]
        fn test_defaults_fill_payloads() {
            let data = TestData::from_json(r#"{"api_key": "k", "token": "t"}"#).unwrap();
            assert_eq!(data.board.name, "Test Board");
            assert_eq!(data.list.name, "Test List");
            assert_eq!(data.card.due_param().as_deref(), Some("2024-12-31T12:00:00Z"));
        }

        #[test]
        fn test_missing_key_is_fatal() {
            let err = TestData::from_json(r#"{"api_key": "k"}"#).unwrap_err();
            assert!(matches!(err, ShopError::TestData { .. }));
        }

        #[test]
        fn test_missing_file_is_fatal() {
            let err = TestData::load("/nonexistent/test_data.json").unwrap_err();
            assert!(matches!(err, ShopError::TestData { .. }));
        }

        #[test]
        fn test_load_overrides() {
            let mut file = NamedTempFile::new().unwrap();
            write!(
                file,
                r#"{{"api_key": "k", "token": "t", "board": {{"name": "QA Board", "desc": "qa"}}}}"#
            )
            .unwrap();
            let data = TestData::load(file.path()).unwrap();
            assert_eq!(data.board.name, "QA Board");
            assert_eq!(data.credentials(), ApiCredentials::new("k", "t"));
        }
    }

    mod stack {
        use super::*;

        #[tokio::test]
        async fn test_teardown_reverse_order() {
            let server = MockServer::start().await;
            Mock::given(method("DELETE"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
                .expect(3)
                .mount(&server)
                .await;
            let client = BoardClient::with_base_url(ApiCredentials::new("k", "t"), server.uri()).unwrap();

            let stack = FixtureStack::new();
            stack.push(ResourceKind::Board, "b1");
            stack.push(ResourceKind::List, "l1");
            stack.push(ResourceKind::Card, "c1");
            stack.teardown(&client).await.unwrap();
            assert!(stack.is_empty());

            let paths: Vec<String> = server
                .received_requests()
                .await
                .unwrap()
                .iter()
                .map(|r| r.url.path().to_string())
                .collect();
            assert_eq!(paths, vec!["/1/cards/c1", "/1/lists/l1", "/1/boards/b1"]);
        }

        #[tokio::test]
        async fn test_teardown_ignores_http_errors() {
            let server = MockServer::start().await;
            Mock::given(method("DELETE"))
                .respond_with(ResponseTemplate::new(404))
                .mount(&server)
                .await;
            let client = BoardClient::with_base_url(ApiCredentials::new("k", "t"), server.uri()).unwrap();
            let stack = FixtureStack::new();
            stack.push(ResourceKind::Board, "gone");
            stack.teardown(&client).await.unwrap();
        }

        #[tokio::test]
        async fn test_teardown_continues_past_transport_errors() {
            let client =
                BoardClient::with_base_url(ApiCredentials::new("k", "t"), "http://127.0.0.1:1").unwrap();
            let stack = FixtureStack::new();
            stack.push(ResourceKind::Board, "b1");
            stack.push(ResourceKind::Card, "c1");
            let err = stack.teardown(&client).await.unwrap_err();
            assert!(matches!(err, ShopError::Fixture { .. }));
            assert!(err.to_string().contains("card c1"));
            assert!(stack.is_empty());
        }
    }

    mod session {
        use super::*;

        async fn service() -> MockServer {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/1/boards/"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({"id": "b1", "name": "Test Board"})),
                )
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/1/lists/"))
                .and(query_param("idBoard", "b1"))
                .respond_with(ResponseTemplate::new(200).set_body_json(
                    json!({"id": "l1", "name": "Test List", "idBoard": "b1"}),
                ))
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/1/cards/"))
                .and(query_param("idList", "l1"))
                .respond_with(ResponseTemplate::new(200).set_body_json(
                    json!({"id": "c1", "name": "Test Card", "idList": "l1"}),
                ))
                .mount(&server)
                .await;
            Mock::given(method("DELETE"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_value": null})))
                .mount(&server)
                .await;
            server
        }

        #[tokio::test]
        async fn test_fixture_chain() {
            let server = service().await;
            let session = ApiSession::with_base_url(TestData::new("k", "t"), &server.uri()).unwrap();

            let board = session.board().await.unwrap();
            let list = session.list(&board).await.unwrap();
            let card = session.card(&list).await.unwrap();
            assert_eq!(board.id(), "b1");
            assert_eq!(list.resource.id_board.as_deref(), Some("b1"));
            assert_eq!(card.id(), "c1");
            assert_eq!(session.stack().len(), 3);

            session.teardown().await.unwrap();
            assert!(session.stack().is_empty());
        }

        #[tokio::test]
        async fn test_name_mismatch_fails_fixture() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/1/boards/"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({"id": "b9", "name": "Renamed"})),
                )
                .mount(&server)
                .await;
            let session = ApiSession::with_base_url(TestData::new("k", "t"), &server.uri()).unwrap();

            let err = session.board().await.unwrap_err();
            assert!(matches!(err, ShopError::AssertionFailed { .. }));
            assert!(session.stack().is_empty());
        }
    }
}
