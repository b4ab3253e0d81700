//! Then steps for card lifecycle BDD scenarios.

use super::world::{CardLifecycleWorld, run_async};
use clarifier::card::{
    domain::{CardDomainError, CardField, CardStatus, CardUpdate, CardVersion},
    services::{CardLifecycleError, ErrorKind, ListCardsRequest, TransitionCardRequest},
};
use rstest_bdd_macros::then;

fn last_error(world: &CardLifecycleWorld) -> Result<&CardLifecycleError, eyre::Report> {
    world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the last operation to fail"))
}

fn join_fields(fields: &[CardField]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[then(r#"the card status is "{status}""#)]
fn card_status_is(world: &CardLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = CardStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let actual = world.card()?.status();
    eyre::ensure!(actual == expected, "expected status {expected}, found {actual}");
    Ok(())
}

#[then("the card version is {version:u64}")]
fn card_version_is(world: &CardLifecycleWorld, version: u64) -> Result<(), eyre::Report> {
    let actual = world.card()?.version();
    eyre::ensure!(
        actual == CardVersion::new(version),
        "expected version {version}, found {actual}"
    );
    Ok(())
}

#[then("the stored card version is {version:u64}")]
fn stored_card_version_is(world: &CardLifecycleWorld, version: u64) -> Result<(), eyre::Report> {
    let card_id = world.card()?.id();
    let stored = run_async(world.service.get_card(card_id))?;
    eyre::ensure!(
        stored.version() == CardVersion::new(version),
        "expected stored version {version}, found {}",
        stored.version()
    );
    Ok(())
}

#[then("the card problem and success criteria are empty")]
fn required_fields_are_empty(world: &CardLifecycleWorld) -> Result<(), eyre::Report> {
    let card = world.card()?;
    eyre::ensure!(card.problem().is_blank(), "problem should be empty");
    eyre::ensure!(
        card.success_criteria().is_blank(),
        "success criteria should be empty"
    );
    Ok(())
}

#[then(r#"the operation fails with an incompleteness violation listing "{fields}""#)]
fn fails_with_incompleteness(
    world: &CardLifecycleWorld,
    fields: String,
) -> Result<(), eyre::Report> {
    let err = last_error(world)?;
    eyre::ensure!(
        err.kind() == ErrorKind::IncompletenessViolation,
        "expected incompleteness violation, got {err:?}"
    );
    let listed = match err {
        CardLifecycleError::Domain(CardDomainError::Incomplete(violation)) => {
            join_fields(&violation.missing_fields)
        }
        CardLifecycleError::Domain(CardDomainError::ProtectedFieldsCleared(violation)) => {
            join_fields(&violation.fields)
        }
        other => return Err(eyre::eyre!("unexpected error shape: {other:?}")),
    };
    eyre::ensure!(listed == fields, "expected fields {fields}, found {listed}");
    Ok(())
}

#[then("the operation fails with a version conflict at version {version:u64}")]
fn fails_with_version_conflict(
    world: &CardLifecycleWorld,
    version: u64,
) -> Result<(), eyre::Report> {
    let err = last_error(world)?;
    let CardLifecycleError::VersionConflict { current, .. } = err else {
        return Err(eyre::eyre!("expected version conflict, got {err:?}"));
    };
    eyre::ensure!(
        *current == CardVersion::new(version),
        "expected current version {version}, found {current}"
    );
    Ok(())
}

#[then(r#"the operation fails with a state machine violation allowing "{allowed}""#)]
fn fails_with_state_machine_violation(
    world: &CardLifecycleWorld,
    allowed: String,
) -> Result<(), eyre::Report> {
    let err = last_error(world)?;
    let CardLifecycleError::Domain(CardDomainError::InvalidTransition(violation)) = err else {
        return Err(eyre::eyre!("expected state machine violation, got {err:?}"));
    };
    let listed = violation
        .allowed
        .iter()
        .map(|status| status.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    eyre::ensure!(listed == allowed, "expected allowed {allowed}, found {listed}");
    Ok(())
}

#[then("every card operation reports not found")]
fn every_operation_not_found(world: &CardLifecycleWorld) -> Result<(), eyre::Report> {
    let card_id = world.card()?.id();
    let service = &world.service;

    let outcomes = [
        run_async(service.get_card(card_id)).err(),
        run_async(service.update_card(
            card_id,
            CardUpdate::new(CardVersion::INITIAL).with_problem("X"),
        ))
        .err(),
        run_async(service.transition_card(TransitionCardRequest::new(card_id, "CONFIRMED"))).err(),
        run_async(service.export_card(card_id)).err(),
        run_async(service.delete_card(card_id)).err(),
    ];
    for outcome in outcomes {
        eyre::ensure!(
            matches!(outcome, Some(CardLifecycleError::NotFound(id)) if id == card_id),
            "expected not found, got {outcome:?}"
        );
    }
    Ok(())
}

#[then("listing cards returns no cards")]
fn listing_is_empty(world: &CardLifecycleWorld) -> Result<(), eyre::Report> {
    let page = run_async(world.service.list_cards(ListCardsRequest::new()))?;
    eyre::ensure!(page.cards.is_empty(), "expected no visible cards");
    eyre::ensure!(page.pagination.total == 0, "expected zero total");
    Ok(())
}
