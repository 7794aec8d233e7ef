//! Board service smoke suite.
//!
//! Creation and deletion checks for each resource kind, run on top of the
//! board → list → card fixture chain. Unlike the UI scenarios every case
//! runs even after an earlier one failed; the report carries the first
//! failure. A fixture failure ends the suite.

use std::future::Future;
use std::time::Instant;

use super::fixtures::{ApiSession, BoardFixture, ListFixture};
use super::models::{Board, Card, List, ResourceKind};
use crate::journal::{StepJournal, StepRecord};
use crate::result::{ShopError, ShopResult};
use crate::scenario::ScenarioReport;

/// Suite name used in reports
pub const NAME: &str = "test_trello_api";

struct Cases<'a> {
    session: &'a ApiSession,
    journal: StepJournal,
    first_error: Option<ShopError>,
}

impl Cases<'_> {
    async fn run<Fut>(&mut self, name: &str, case: Fut)
    where
        Fut: Future<Output = ShopResult<()>>,
    {
        tracing::info!(suite = NAME, "Case: {name}");
        let started = Instant::now();
        match case.await {
            Ok(()) => self.journal.record(StepRecord::passed(name, started.elapsed())),
            Err(e) => {
                tracing::error!(suite = NAME, "Case '{name}' failed: {e}");
                self.journal
                    .record(StepRecord::failed(name, started.elapsed(), e.to_string()));
                if self.first_error.is_none() {
                    self.first_error = Some(e);
                }
            }
        }
    }
}

async fn create_board(session: &ApiSession, board: Board, keep: bool) -> ShopResult<String> {
    let response = board.create(session.client()).await?;
    let id = response.ensure_created(&board.name)?.to_string();
    if keep {
        session.stack().push(ResourceKind::Board, &id);
    }
    Ok(id)
}

async fn create_list(session: &ApiSession, list: List, board: &BoardFixture, keep: bool) -> ShopResult<String> {
    let response = list.create(session.client(), board.id()).await?;
    let id = response.ensure_created(&list.name)?.to_string();
    if keep {
        session.stack().push(ResourceKind::List, &id);
    }
    Ok(id)
}

async fn create_card(session: &ApiSession, card: Card, list: &ListFixture, keep: bool) -> ShopResult<String> {
    let due = session.data().card.due;
    let card = match due {
        Some(due) => card.with_due(due),
        None => card,
    };
    let response = card.create(session.client(), list.id()).await?;
    let id = response.ensure_created(&card.name)?.to_string();
    if keep {
        session.stack().push(ResourceKind::Card, &id);
    }
    Ok(id)
}

async fn delete_now(session: &ApiSession, kind: ResourceKind, id: &str) -> ShopResult<()> {
    let response = super::models::delete(session.client(), kind, id).await?;
    if response.is_success() {
        Ok(())
    } else {
        Err(ShopError::assertion(format!(
            "deleting {} {id} returned status {}",
            kind.label(),
            response.status
        )))
    }
}

/// Run the suite. Fixtures are torn down before returning.
pub async fn run(session: &ApiSession) -> ScenarioReport {
    let started = Instant::now();
    let mut cases = Cases {
        session,
        journal: StepJournal::new(),
        first_error: None,
    };

    let fixtures = async {
        let board = session.board().await?;
        let list = session.list(&board).await?;
        let card = session.card(&list).await?;
        Ok::<_, ShopError>((board, list, card))
    }
    .await;

    match fixtures {
        Ok((board, list, card)) => {
            tracing::info!("Fixtures ready: board {}, list {}, card {}", board.id(), list.id(), card.id());
            run_cases(&mut cases, &board, &list).await;
        }
        Err(e) => {
            tracing::error!(suite = NAME, "Fixture setup failed: {e}");
            cases
                .journal
                .record(StepRecord::failed("fixtures", started.elapsed(), e.to_string()));
            cases.first_error = Some(e);
        }
    }

    if let Err(e) = session.teardown().await {
        tracing::error!(suite = NAME, "{e}");
        if cases.first_error.is_none() {
            cases.first_error = Some(e);
        }
    }

    let report = ScenarioReport {
        name: NAME.to_string(),
        steps: cases.journal.records(),
        duration: started.elapsed(),
        error: cases.first_error,
    };
    if report.passed() {
        tracing::info!("{report}");
    } else {
        tracing::error!("{report}");
    }
    report
}

async fn run_cases(cases: &mut Cases<'_>, board: &BoardFixture, list: &ListFixture) {
    let session = cases.session;

    cases
        .run("test_board_creation", async {
            create_board(session, Board::new("Another Test Board", "Another board for testing"), true)
                .await
                .map(drop)
        })
        .await;
    cases
        .run("test_list_creation", async {
            create_list(session, List::new("Another Test List"), board, true)
                .await
                .map(drop)
        })
        .await;
    cases
        .run("test_card_creation", async {
            create_card(session, Card::new("Another Test Card", "Another card for testing"), list, true)
                .await
                .map(drop)
        })
        .await;
    cases
        .run("test_board_deletion", async {
            let id = create_board(session, Board::new("Temporary Board", "A board to be deleted"), false).await?;
            delete_now(session, ResourceKind::Board, &id).await
        })
        .await;
    cases
        .run("test_list_deletion", async {
            let id = create_list(session, List::new("Temporary List"), board, false).await?;
            delete_now(session, ResourceKind::List, &id).await
        })
        .await;
    cases
        .run("test_card_deletion", async {
            let id = create_card(session, Card::new("Temporary Card", "A card to be deleted"), list, false).await?;
            delete_now(session, ResourceKind::Card, &id).await
        })
        .await;
}
