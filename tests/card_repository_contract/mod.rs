//! Behavioural contract every `CardRepository` implementation must honour.
//!
//! Each check takes a fresh, empty repository.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use clarifier::card::{
    domain::{
        Card, CardListQuery, CardStatus, CardTitle, CardUpdate, CardVersion, PageRequest,
        is_visible,
    },
    ports::{CardRepository, CardRepositoryError},
};
use eyre::{bail, ensure};
use mockable::Clock;

/// Clock pinned to a single instant.
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Returns a clock `seconds` after a fixed base instant.
    pub fn offset(seconds: i64) -> Self {
        let base = Utc
            .with_ymd_and_hms(2026, 4, 1, 12, 0, 0)
            .single()
            .unwrap_or_default();
        Self(base + TimeDelta::seconds(seconds))
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<chrono::Local> {
        self.0.with_timezone(&chrono::Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn new_card(title: &str, seconds: i64) -> eyre::Result<Card> {
    Ok(Card::new(CardTitle::new(title)?, &FixedClock::offset(seconds)))
}

/// Inserted cards read back unchanged and duplicates are refused.
pub async fn insert_and_find(repository: &impl CardRepository) -> eyre::Result<()> {
    let card = new_card("Persist me", 0)?;
    repository.insert(&card).await?;

    ensure!(repository.find_visible(card.id()).await? == Some(card.clone()));
    ensure!(repository.find_including_deleted(card.id()).await? == Some(card.clone()));

    let duplicate = repository.insert(&card).await;
    ensure!(matches!(
        duplicate,
        Err(CardRepositoryError::DuplicateCard(id)) if id == card.id()
    ));
    Ok(())
}

/// Conditional replacement succeeds once per observed version.
pub async fn replace_is_version_guarded(repository: &impl CardRepository) -> eyre::Result<()> {
    let clock = FixedClock::offset(10);
    let mut card = new_card("Guarded", 0)?;
    repository.insert(&card).await?;

    let observed = card.version();
    card.apply_update(
        &CardUpdate::new(observed)
            .with_problem("Needs a guard")
            .with_success_criteria("Second writer loses"),
        &clock,
    )?;
    repository.replace_if_version(&card, observed).await?;

    let stale = repository.replace_if_version(&card, observed).await;
    let Err(CardRepositoryError::VersionConflict {
        current, provided, ..
    }) = stale
    else {
        bail!("expected version conflict, got {stale:?}");
    };
    ensure!(current == CardVersion::new(1));
    ensure!(provided == CardVersion::INITIAL);

    let stored = repository.find_visible(card.id()).await?;
    ensure!(stored == Some(card));
    Ok(())
}

/// Soft-deleted cards disappear from every visible path.
pub async fn soft_delete_hides_card(repository: &impl CardRepository) -> eyre::Result<()> {
    let mut card = new_card("Ghost", 0)?;
    repository.insert(&card).await?;
    let observed = card.version();

    card.mark_deleted(&FixedClock::offset(60));
    repository.soft_delete(&card).await?;

    ensure!(repository.find_visible(card.id()).await?.is_none());
    let query = CardListQuery::new(PageRequest::default());
    ensure!(repository.list_visible(&query).await?.cards.is_empty());

    let Some(audited) = repository.find_including_deleted(card.id()).await? else {
        bail!("deleted card must remain retrievable for audit");
    };
    ensure!(!is_visible(&audited));
    ensure!(audited.version() == observed);
    ensure!(audited.deleted_at() == card.deleted_at());

    ensure!(matches!(
        repository.replace_if_version(&card, observed).await,
        Err(CardRepositoryError::NotFound(_))
    ));
    ensure!(matches!(
        repository.soft_delete(&card).await,
        Err(CardRepositoryError::NotFound(_))
    ));
    Ok(())
}

/// Listing orders newest first, filters, and paginates.
pub async fn list_orders_filters_and_pages(
    repository: &impl CardRepository,
) -> eyre::Result<()> {
    let clock = FixedClock::offset(100);
    for (offset, title) in [(0, "Alpha 50% faster"), (1, "Bravo"), (2, "Charlie")] {
        repository.insert(&new_card(title, offset)?).await?;
    }
    let mut confirmed = new_card("Delta", 3)?;
    repository.insert(&confirmed).await?;
    let observed = confirmed.version();
    confirmed.apply_update(
        &CardUpdate::new(observed)
            .with_problem("Bravo-adjacent outage")
            .with_success_criteria("Resolved"),
        &clock,
    )?;
    confirmed.transition_to(CardStatus::Confirmed, &clock)?;
    repository.replace_if_version(&confirmed, observed).await?;

    let first_page = repository
        .list_visible(&CardListQuery::new(PageRequest::new(1, 3, 100)?))
        .await?;
    let titles: Vec<&str> = first_page
        .cards
        .iter()
        .map(|card| card.title().as_str())
        .collect();
    ensure!(titles == vec!["Delta", "Charlie", "Bravo"]);
    ensure!(first_page.pagination.total == 4);
    ensure!(first_page.pagination.total_pages == 2);

    let second_page = repository
        .list_visible(&CardListQuery::new(PageRequest::new(2, 3, 100)?))
        .await?;
    ensure!(second_page.cards.len() == 1);

    let beyond = repository
        .list_visible(&CardListQuery::new(PageRequest::new(5, 3, 100)?))
        .await?;
    ensure!(beyond.cards.is_empty());
    ensure!(beyond.pagination.total == 4);

    let by_status = repository
        .list_visible(
            &CardListQuery::new(PageRequest::default()).with_status(CardStatus::Confirmed),
        )
        .await?;
    ensure!(by_status.cards.len() == 1);
    ensure!(by_status.pagination.total == 1);

    let by_search = repository
        .list_visible(&CardListQuery::new(PageRequest::default()).with_search("bravo"))
        .await?;
    let titles: Vec<&str> = by_search
        .cards
        .iter()
        .map(|card| card.title().as_str())
        .collect();
    ensure!(titles == vec!["Delta", "Bravo"]);

    let literal_percent = repository
        .list_visible(&CardListQuery::new(PageRequest::default()).with_search("50%"))
        .await?;
    ensure!(literal_percent.cards.len() == 1);

    let leading_space = repository
        .list_visible(&CardListQuery::new(PageRequest::default()).with_search(" faster"))
        .await?;
    ensure!(leading_space.cards.len() == 1);
    let trailing_space = repository
        .list_visible(&CardListQuery::new(PageRequest::default()).with_search("faster "))
        .await?;
    ensure!(trailing_space.cards.is_empty());

    let blank = repository
        .list_visible(&CardListQuery::new(PageRequest::default()).with_search("   "))
        .await?;
    ensure!(blank.pagination.total == 4);
    Ok(())
}

/// Instants from a clock finer than the storage resolution read back equal.
pub async fn stored_timestamps_round_trip(repository: &impl CardRepository) -> eyre::Result<()> {
    let fine = |seconds: i64| {
        let FixedClock(instant) = FixedClock::offset(seconds);
        FixedClock(instant + TimeDelta::nanoseconds(123_456_789))
    };
    let mut card = Card::new(CardTitle::new("Precise")?, &fine(0));
    repository.insert(&card).await?;
    ensure!(repository.find_visible(card.id()).await? == Some(card.clone()));

    let observed = card.version();
    card.apply_update(&CardUpdate::new(observed).with_risks("Rounding"), &fine(5))?;
    repository.replace_if_version(&card, observed).await?;
    ensure!(repository.find_visible(card.id()).await? == Some(card.clone()));

    card.mark_deleted(&fine(9));
    repository.soft_delete(&card).await?;
    ensure!(repository.find_including_deleted(card.id()).await? == Some(card));
    Ok(())
}
