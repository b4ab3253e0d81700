//! When steps for card lifecycle BDD scenarios.

use super::world::{CardLifecycleWorld, run_async};
use clarifier::card::{
    domain::{CardUpdate, CardVersion, FieldChange},
    services::TransitionCardRequest,
};
use rstest_bdd_macros::when;

#[when(r#"the card is transitioned to "{target_status}""#)]
fn transition_card(
    world: &mut CardLifecycleWorld,
    target_status: String,
) -> Result<(), eyre::Report> {
    let card_id = world.card()?.id();
    let result = run_async(
        world
            .service
            .transition_card(TransitionCardRequest::new(card_id, target_status)),
    );
    world.record(result);
    Ok(())
}

#[when(
    r#"the card is updated at version {version:u64} with problem "{problem}" and success criteria "{criteria}""#
)]
fn update_required_fields(
    world: &mut CardLifecycleWorld,
    version: u64,
    problem: String,
    criteria: String,
) -> Result<(), eyre::Report> {
    let card_id = world.card()?.id();
    let update = CardUpdate::new(CardVersion::new(version))
        .with_problem(problem)
        .with_success_criteria(criteria);
    let result = run_async(world.service.update_card(card_id, update));
    world.record(result);
    Ok(())
}

#[when("the card problem is cleared at version {version:u64}")]
fn clear_problem(world: &mut CardLifecycleWorld, version: u64) -> Result<(), eyre::Report> {
    let card_id = world.card()?.id();
    let update = CardUpdate::new(CardVersion::new(version))
        .with_problem_change(FieldChange::Set(String::new()));
    let result = run_async(world.service.update_card(card_id, update));
    world.record(result);
    Ok(())
}

#[when(r#"the card risks are set to "{risks}" at version {version:u64}"#)]
fn set_risks(
    world: &mut CardLifecycleWorld,
    risks: String,
    version: u64,
) -> Result<(), eyre::Report> {
    let card_id = world.card()?.id();
    let update = CardUpdate::new(CardVersion::new(version)).with_risks(risks);
    let result = run_async(world.service.update_card(card_id, update));
    world.record(result);
    Ok(())
}

#[when("the card is deleted")]
fn delete_card(world: &mut CardLifecycleWorld) -> Result<(), eyre::Report> {
    let card_id = world.card()?.id();
    if let Err(err) = run_async(world.service.delete_card(card_id)) {
        world.last_error = Some(err);
    }
    Ok(())
}
