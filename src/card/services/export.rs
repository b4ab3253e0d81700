//! Markdown projection of a card.
//!
//! Every section header is always present; empty bodies render a
//! placeholder so the document structure never varies.

use crate::card::domain::{Card, CardId, CardText};
use minijinja::{Environment, context};

/// Content type of rendered exports.
pub const EXPORT_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

const TO_BE_CLARIFIED: &str = "_To be clarified_";
const NONE_MARKER: &str = "_None_";
const UNCONFIRMED_MARKER: &str = "_To be confirmed_";
const DATE_FORMAT: &str = "%Y-%m-%d";

const EXPORT_TEMPLATE: &str = r"# [{{ status }}] {{ title }}

## Problem
{{ problem }}

## Success Criteria (Definition of Done)
{{ success_criteria }}

## Out of Scope
{{ out_of_scope }}

## Stakeholders
{{ stakeholders }}

## Risks
{{ risks }}

---

**Metadata**
- **Status**: {{ status }}
- **Version**: {{ version }}
- **Last Updated**: {{ updated_on }}
{% if due_on %}- **Due Date**: {{ due_on }}
{% endif %}";

/// Rendered export document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardExport {
    card_id: CardId,
    content: String,
}

impl CardExport {
    /// Returns the exported card's identifier.
    #[must_use]
    pub const fn card_id(&self) -> CardId {
        self.card_id
    }

    /// Returns the suggested download file name.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.md", self.card_id)
    }

    /// Returns the Markdown document.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Renders the Markdown projection of `card`.
pub(super) fn render_export(card: &Card) -> Result<CardExport, minijinja::Error> {
    let environment = Environment::new();
    let content = environment.render_str(
        EXPORT_TEMPLATE,
        context! {
            status => card.status().as_str(),
            title => card.title().as_str(),
            problem => body_or(Some(card.problem()), TO_BE_CLARIFIED),
            success_criteria => body_or(Some(card.success_criteria()), TO_BE_CLARIFIED),
            out_of_scope => body_or(card.out_of_scope(), NONE_MARKER),
            stakeholders => body_or(card.stakeholders(), UNCONFIRMED_MARKER),
            risks => body_or(card.risks(), NONE_MARKER),
            version => card.version().value(),
            updated_on => card.updated_at().date_naive().format(DATE_FORMAT).to_string(),
            due_on => card.due_date().map(|date| date.format(DATE_FORMAT).to_string()),
        },
    )?;
    Ok(CardExport {
        card_id: card.id(),
        content,
    })
}

fn body_or<'a>(text: Option<&'a CardText>, placeholder: &'a str) -> &'a str {
    text.filter(|value| !value.is_blank())
        .map_or(placeholder, CardText::as_str)
}
