//! Given steps for card lifecycle BDD scenarios.

use super::world::{CardLifecycleWorld, run_async};
use clarifier::card::{
    domain::{CardUpdate, CardVersion},
    services::{CreateCardRequest, TransitionCardRequest},
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a card titled "{title}" has been created"#)]
fn card_created(world: &mut CardLifecycleWorld, title: String) -> Result<(), eyre::Report> {
    let created = run_async(world.service.create_card(CreateCardRequest::new(title)))
        .wrap_err("create card for scenario")?;
    world.card = Some(created);
    Ok(())
}

#[given(r#"a confirmed card titled "{title}""#)]
fn confirmed_card(world: &mut CardLifecycleWorld, title: String) -> Result<(), eyre::Report> {
    let created = run_async(world.service.create_card(CreateCardRequest::new(title)))
        .wrap_err("create card for scenario")?;
    let update = CardUpdate::new(CardVersion::INITIAL)
        .with_problem("Checkout fails for guest users")
        .with_success_criteria("Guest checkout completes end to end");
    run_async(world.service.update_card(created.id(), update))
        .wrap_err("clarify card for scenario")?;
    let confirmed = run_async(
        world
            .service
            .transition_card(TransitionCardRequest::new(created.id(), "CONFIRMED")),
    )
    .wrap_err("confirm card for scenario")?;
    world.card = Some(confirmed);
    Ok(())
}
