use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::auth::{self, AppState};
use crate::uploads::BODY_LIMIT;
use crate::{campaign_requests, campaigns, creator_requests, donations, reports, updates};

async fn health() -> &'static str {
    "ok"
}

/// Every route of the service, without transport layers.
pub fn router(state: AppState) -> Router {
    let identity = Router::new()
        .route("/login", get(auth::form_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/register", get(auth::form_page).post(auth::register))
        .route("/register/admin", get(auth::admin_form).post(auth::create_admin))
        .route("/profile", get(auth::profile_page).post(auth::update_profile));

    let campaigns = Router::new()
        .route("/campaigns", get(campaigns::list))
        .route("/campaigns/page/{page}", get(campaigns::list_page))
        .route("/campaigns/owned", get(campaigns::owned))
        .route("/campaigns/create", get(campaigns::create_form).post(campaigns::create))
        .route("/campaigns/updates", post(updates::create))
        .route("/campaigns/{id}", get(campaigns::detail))
        .route("/campaigns/{id}/delete", get(campaigns::delete))
        .route("/donations", post(donations::create));

    let review = Router::new()
        .route(
            "/requests/campaigns",
            get(campaign_requests::list).post(campaign_requests::decide),
        )
        .route("/requests/campaigns/{id}", get(campaign_requests::detail))
        .route("/campaign_creators", get(creator_requests::list))
        .route(
            "/campaign_creators/{id}",
            get(creator_requests::detail).delete(creator_requests::delete),
        )
        .route("/campaign_creators/{id}/document", get(creator_requests::document))
        .route(
            "/campaign_creators/update_status/{id}",
            post(creator_requests::update_status),
        )
        .route("/reports", get(reports::list).post(reports::create))
        .route("/reports/{id}", get(reports::detail).delete(reports::delete))
        .route("/reports/delete/{id}", post(reports::delete));

    Router::new()
        .route("/health", get(health))
        .merge(identity)
        .merge(campaigns)
        .merge(review)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}
