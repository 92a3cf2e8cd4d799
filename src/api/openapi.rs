//! OpenAPI document covering every REST endpoint.

use utoipa::OpenApi;

use crate::api::handlers;

/// Aggregated OpenAPI description served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Coach Results API",
        description = "Collects the sports-event results of coaches one form block at a time and appends each submission as a row of a shared spreadsheet."
    ),
    paths(
        handlers::system::health_handler,
        handlers::system::logo_handler,
        handlers::form::form_schema,
        handlers::session::create_session,
        handlers::session::get_session,
        handlers::session::delete_session,
        handlers::session::update_personal,
        handlers::block::update_block,
        handlers::block::add_athlete,
        handlers::block::clear_athletes,
        handlers::block::submit_block,
    ),
    tags(
        (name = "System", description = "Health and branding"),
        (name = "Form", description = "Form description"),
        (name = "Sessions", description = "Form session lifecycle and coach details"),
        (name = "Blocks", description = "Event block values, athlete lists and submission"),
    )
)]
pub struct ApiDoc;
