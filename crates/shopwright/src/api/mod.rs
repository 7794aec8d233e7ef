//! Board service API suite: client, resource models, fixtures and the
//! smoke suite built on them.

pub mod client;
pub mod fixtures;
pub mod models;
pub mod suite;

pub use client::{ApiCredentials, ApiResponse, BoardClient, DEFAULT_BASE_URL};
pub use fixtures::{
    ApiSession, BoardFixture, CardFixture, FixtureStack, ListFixture, TestData, DEFAULT_TEST_DATA,
};
pub use models::{delete_board, delete_card, delete_list, Board, Card, List, Resource, ResourceKind};
