//! `PostgreSQL` repository implementation for card lifecycle storage.

use super::{
    models::{CardChangeset, CardRow, NewCardRow},
    schema::cards,
};
use crate::card::{
    domain::{
        Card, CardField, CardId, CardListQuery, CardPage, CardStatus, CardText, CardTitle,
        CardVersion, Pagination, PersistedCardData,
    },
    ports::{
        CardRepository, CardRepositoryError, CardRepositoryResult,
        repository::MissingDeletionTimestamp,
    },
};
use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Bool;
use tracing::debug;

/// `PostgreSQL` connection pool type used by card adapters.
pub type CardPgPool = Pool<ConnectionManager<PgConnection>>;

/// Boxed `WHERE` clause over the `cards` table.
type CardPredicate = Box<dyn BoxableExpression<cards::table, Pg, SqlType = Bool>>;

/// `PostgreSQL`-backed card repository.
///
/// Conditional writes are single `UPDATE` statements keyed on the card
/// identifier, the expected version, and `deleted_at IS NULL`, so the
/// database performs the compare and the write atomically.
#[derive(Debug, Clone)]
pub struct PostgresCardRepository {
    pool: CardPgPool,
}

impl PostgresCardRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: CardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> CardRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CardRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(CardRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(CardRepositoryError::persistence)?
    }
}

#[async_trait]
impl CardRepository for PostgresCardRepository {
    async fn insert(&self, card: &Card) -> CardRepositoryResult<()> {
        let card_id = card.id();
        let new_row = to_new_row(card)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(cards::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        CardRepositoryError::DuplicateCard(card_id)
                    }
                    _ => CardRepositoryError::persistence(err),
                })?;
            debug!(card_id = %card_id, "inserted card row");
            Ok(())
        })
        .await
    }

    async fn find_visible(&self, id: CardId) -> CardRepositoryResult<Option<Card>> {
        self.run_blocking(move |connection| {
            let row = cards::table
                .filter(cards::id.eq(id.into_inner()))
                .filter(cards::deleted_at.is_null())
                .select(CardRow::as_select())
                .first::<CardRow>(connection)
                .optional()
                .map_err(CardRepositoryError::persistence)?;
            row.map(row_to_card).transpose()
        })
        .await
    }

    async fn find_including_deleted(&self, id: CardId) -> CardRepositoryResult<Option<Card>> {
        self.run_blocking(move |connection| {
            let row = cards::table
                .filter(cards::id.eq(id.into_inner()))
                .select(CardRow::as_select())
                .first::<CardRow>(connection)
                .optional()
                .map_err(CardRepositoryError::persistence)?;
            row.map(row_to_card).transpose()
        })
        .await
    }

    async fn list_visible(&self, query: &CardListQuery) -> CardRepositoryResult<CardPage> {
        let criteria = query.clone();
        self.run_blocking(move |connection| {
            let page = criteria.page();
            let offset = i64::try_from(page.offset()).map_err(CardRepositoryError::persistence)?;
            let limit =
                i64::try_from(page.page_size()).map_err(CardRepositoryError::persistence)?;

            // Count and page read one snapshot.
            connection
                .build_transaction()
                .read_only()
                .repeatable_read()
                .run::<_, CardRepositoryError, _>(|tx| {
                    let total_rows = cards::table
                        .filter(visible_matching(&criteria))
                        .select(count_star())
                        .get_result::<i64>(tx)
                        .map_err(CardRepositoryError::persistence)?;
                    let rows = cards::table
                        .filter(visible_matching(&criteria))
                        .order((cards::created_at.desc(), cards::id.desc()))
                        .offset(offset)
                        .limit(limit)
                        .select(CardRow::as_select())
                        .load::<CardRow>(tx)
                        .map_err(CardRepositoryError::persistence)?;

                    let cards = rows
                        .into_iter()
                        .map(row_to_card)
                        .collect::<CardRepositoryResult<Vec<_>>>()?;
                    let total = u64::try_from(total_rows).map_err(CardRepositoryError::persistence)?;
                    debug!(total, returned = cards.len(), "listed visible cards");
                    Ok(CardPage {
                        cards,
                        pagination: Pagination::new(page, total),
                    })
                })
        })
        .await
    }

    async fn replace_if_version(
        &self,
        card: &Card,
        expected: CardVersion,
    ) -> CardRepositoryResult<()> {
        let card_id = card.id();
        let changeset = to_changeset(card)?;
        let expected_raw =
            i64::try_from(expected.value()).map_err(CardRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                cards::table
                    .filter(cards::id.eq(card_id.into_inner()))
                    .filter(cards::version.eq(expected_raw))
                    .filter(cards::deleted_at.is_null()),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(CardRepositoryError::persistence)?;

            if updated == 1 {
                debug!(card_id = %card_id, version = changeset.version, "replaced card row");
                return Ok(());
            }

            // Zero rows: classify the miss for the caller.
            let current = cards::table
                .filter(cards::id.eq(card_id.into_inner()))
                .filter(cards::deleted_at.is_null())
                .select(cards::version)
                .first::<i64>(connection)
                .optional()
                .map_err(CardRepositoryError::persistence)?;
            match current {
                None => Err(CardRepositoryError::NotFound(card_id)),
                Some(raw) => Err(CardRepositoryError::VersionConflict {
                    id: card_id,
                    current: to_version(raw)?,
                    provided: expected,
                }),
            }
        })
        .await
    }

    async fn soft_delete(&self, card: &Card) -> CardRepositoryResult<()> {
        let card_id = card.id();
        let deleted_at = card
            .deleted_at()
            .ok_or_else(|| CardRepositoryError::persistence(MissingDeletionTimestamp(card_id)))?;
        let updated_at = card.updated_at();

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                cards::table
                    .filter(cards::id.eq(card_id.into_inner()))
                    .filter(cards::deleted_at.is_null()),
            )
            .set((
                cards::deleted_at.eq(Some(deleted_at)),
                cards::updated_at.eq(updated_at),
            ))
            .execute(connection)
            .map_err(CardRepositoryError::persistence)?;

            if updated == 0 {
                return Err(CardRepositoryError::NotFound(card_id));
            }
            debug!(card_id = %card_id, "soft-deleted card row");
            Ok(())
        })
        .await
    }
}

impl From<DieselError> for CardRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// Builds the visibility filter plus the query's status and search filters.
fn visible_matching(query: &CardListQuery) -> CardPredicate {
    let mut predicate: CardPredicate = Box::new(cards::deleted_at.is_null());
    if let Some(status) = query.status() {
        predicate = Box::new(predicate.and(cards::status.eq(status.as_str())));
    }
    if let Some(term) = query.search() {
        let pattern = contains_pattern(term);
        predicate = Box::new(
            predicate.and(
                cards::title
                    .ilike(pattern.clone())
                    .or(cards::problem.ilike(pattern)),
            ),
        );
    }
    predicate
}

/// Wraps `term` for a substring `ILIKE`, escaping wildcard characters.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn to_new_row(card: &Card) -> CardRepositoryResult<NewCardRow> {
    Ok(NewCardRow {
        id: card.id().into_inner(),
        title: card.title().as_str().to_owned(),
        problem: card.problem().as_str().to_owned(),
        success_criteria: card.success_criteria().as_str().to_owned(),
        out_of_scope: card.out_of_scope().map(|text| text.as_str().to_owned()),
        stakeholders: card.stakeholders().map(|text| text.as_str().to_owned()),
        risks: card.risks().map(|text| text.as_str().to_owned()),
        due_date: card.due_date(),
        status: card.status().as_str().to_owned(),
        version: i64::try_from(card.version().value()).map_err(CardRepositoryError::persistence)?,
        created_at: card.created_at(),
        updated_at: card.updated_at(),
        deleted_at: card.deleted_at(),
    })
}

fn to_changeset(card: &Card) -> CardRepositoryResult<CardChangeset> {
    Ok(CardChangeset {
        title: card.title().as_str().to_owned(),
        problem: card.problem().as_str().to_owned(),
        success_criteria: card.success_criteria().as_str().to_owned(),
        out_of_scope: card.out_of_scope().map(|text| text.as_str().to_owned()),
        stakeholders: card.stakeholders().map(|text| text.as_str().to_owned()),
        risks: card.risks().map(|text| text.as_str().to_owned()),
        due_date: card.due_date(),
        status: card.status().as_str().to_owned(),
        version: i64::try_from(card.version().value()).map_err(CardRepositoryError::persistence)?,
        updated_at: card.updated_at(),
    })
}

fn to_version(raw: i64) -> CardRepositoryResult<CardVersion> {
    u64::try_from(raw)
        .map(CardVersion::new)
        .map_err(CardRepositoryError::persistence)
}

fn to_text(field: CardField, value: String) -> CardRepositoryResult<CardText> {
    CardText::new(field, value).map_err(CardRepositoryError::persistence)
}

fn row_to_card(row: CardRow) -> CardRepositoryResult<Card> {
    let CardRow {
        id,
        title,
        problem,
        success_criteria,
        out_of_scope,
        stakeholders,
        risks,
        due_date,
        status: persisted_status,
        version,
        created_at,
        updated_at,
        deleted_at,
    } = row;

    let status = CardStatus::try_from(persisted_status.as_str())
        .map_err(CardRepositoryError::persistence)?;
    let data = PersistedCardData {
        id: CardId::from_uuid(id),
        title: CardTitle::new(title).map_err(CardRepositoryError::persistence)?,
        problem: to_text(CardField::Problem, problem)?,
        success_criteria: to_text(CardField::SuccessCriteria, success_criteria)?,
        out_of_scope: out_of_scope
            .map(|value| to_text(CardField::OutOfScope, value))
            .transpose()?,
        stakeholders: stakeholders
            .map(|value| to_text(CardField::Stakeholders, value))
            .transpose()?,
        risks: risks
            .map(|value| to_text(CardField::Risks, value))
            .transpose()?,
        due_date,
        status,
        version: to_version(version)?,
        created_at,
        updated_at,
        deleted_at,
    };
    Ok(Card::from_persisted(data))
}
