//! Board, list and card resources.
//!
//! `create`/`delete` never fail on an HTTP error status: the failure is
//! logged and the decoded body handed back so the caller can assert on it.
//! Transport errors still propagate.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::client::{ApiResponse, BoardClient};
use crate::result::ShopResult;

const BOARDS: &str = "/1/boards/";
const LISTS: &str = "/1/lists/";
const CARDS: &str = "/1/cards/";

/// Resource kind, as it appears in URL paths and log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// `/1/boards`
    Board,
    /// `/1/lists`
    List,
    /// `/1/cards`
    Card,
}

impl ResourceKind {
    /// Singular label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Board => "board",
            Self::List => "list",
            Self::Card => "card",
        }
    }

    const fn path(self) -> &'static str {
        match self {
            Self::Board => "/1/boards",
            Self::List => "/1/lists",
            Self::Card => "/1/cards",
        }
    }
}

/// Subset of fields the service returns for any resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Resource id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Description (boards and cards)
    #[serde(default)]
    pub desc: Option<String>,
    /// Due timestamp (cards)
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    /// Owning board (lists and cards)
    #[serde(default)]
    pub id_board: Option<String>,
    /// Owning list (cards)
    #[serde(default)]
    pub id_list: Option<String>,
}

impl ApiResponse {
    /// Decode the body as a [`Resource`]
    pub fn resource(&self) -> ShopResult<Resource> {
        Ok(serde_json::from_value(self.body.clone())?)
    }
}

fn log_created(kind: ResourceKind, name: &str, response: &ApiResponse) {
    if response.is_success() {
        tracing::info!("Created {}: {name}", kind.label());
    } else {
        tracing::error!(
            status = response.status,
            "Failed to create {}: {}",
            kind.label(),
            response.body_text()
        );
    }
}

/// Delete any resource by id.
pub async fn delete(client: &BoardClient, kind: ResourceKind, id: &str) -> ShopResult<ApiResponse> {
    let response = client.delete(&format!("{}/{id}", kind.path())).await?;
    if response.is_success() {
        tracing::info!("Deleted {} with ID: {id}", kind.label());
    } else {
        tracing::error!(
            status = response.status,
            "Failed to delete {}: {}",
            kind.label(),
            response.body_text()
        );
    }
    Ok(response)
}

/// `DELETE /1/boards/{id}`
pub async fn delete_board(client: &BoardClient, id: &str) -> ShopResult<ApiResponse> {
    delete(client, ResourceKind::Board, id).await
}

/// `DELETE /1/lists/{id}`
pub async fn delete_list(client: &BoardClient, id: &str) -> ShopResult<ApiResponse> {
    delete(client, ResourceKind::List, id).await
}

/// `DELETE /1/cards/{id}`
pub async fn delete_card(client: &BoardClient, id: &str) -> ShopResult<ApiResponse> {
    delete(client, ResourceKind::Card, id).await
}

/// Board creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Board name
    pub name: String,
    /// Board description
    #[serde(default)]
    pub desc: String,
}

impl Board {
    /// New board request
    #[must_use]
    pub fn new(name: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: desc.into(),
        }
    }

    /// `POST /1/boards/`
    pub async fn create(&self, client: &BoardClient) -> ShopResult<ApiResponse> {
        let response = client
            .post(BOARDS, &[("name", self.name.as_str()), ("desc", self.desc.as_str())])
            .await?;
        log_created(ResourceKind::Board, &self.name, &response);
        Ok(response)
    }
}

/// List creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    /// List name
    pub name: String,
}

impl List {
    /// New list request
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// `POST /1/lists/` on `board_id`
    pub async fn create(&self, client: &BoardClient, board_id: &str) -> ShopResult<ApiResponse> {
        let response = client
            .post(LISTS, &[("name", self.name.as_str()), ("idBoard", board_id)])
            .await?;
        log_created(ResourceKind::List, &self.name, &response);
        Ok(response)
    }
}

/// Card creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Card name
    pub name: String,
    /// Card description
    #[serde(default)]
    pub desc: String,
    /// Due timestamp
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
}

impl Card {
    /// New card request without a due date
    #[must_use]
    pub fn new(name: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: desc.into(),
            due: None,
        }
    }

    /// Set the due timestamp
    #[must_use]
    pub const fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    /// `due` rendered as `2024-12-31T12:00:00Z`
    #[must_use]
    pub fn due_param(&self) -> Option<String> {
        self.due.map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// `POST /1/cards/` on `list_id`
    pub async fn create(&self, client: &BoardClient, list_id: &str) -> ShopResult<ApiResponse> {
        let due = self.due_param();
        let mut params = vec![
            ("name", self.name.as_str()),
            ("desc", self.desc.as_str()),
            ("idList", list_id),
        ];
        if let Some(due) = due.as_deref() {
            params.push(("due", due));
        }
        let response = client.post(CARDS, &params).await?;
        log_created(ResourceKind::Card, &self.name, &response);
        Ok(response)
    }
}
