pub mod auth;
pub mod bookings;
pub mod oncall;
pub mod reference;
pub mod schedule;
pub mod users;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // Users (admin)
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/:id", get(users::get_one).delete(users::deactivate))
        // Reference data
        .route("/api/reference", get(reference::refresh))
        .route("/api/reference/nurses", get(reference::list_nurses).post(reference::create_nurse))
        .route("/api/reference/nurses/:id", put(reference::update_nurse))
        .route(
            "/api/reference/intervention-types",
            get(reference::list_intervention_types).post(reference::create_intervention_type),
        )
        .route("/api/reference/intervention-types/:id", put(reference::update_intervention_type))
        .route("/api/reference/places", get(reference::list_places).post(reference::create_place))
        .route("/api/reference/places/:id", put(reference::update_place))
        // Bookings
        .route("/api/bookings", get(bookings::list).post(bookings::create))
        .route(
            "/api/bookings/:id",
            get(bookings::get_one).put(bookings::update).delete(bookings::remove),
        )
        // On-call assignments
        .route("/api/oncall", get(oncall::list_range))
        .route("/api/oncall/:id", axum::routing::delete(oncall::remove))
        .route("/api/oncall/days/:date", get(oncall::day_slate).put(oncall::set_day_slate))
        // Derived schedule views
        .route("/api/schedule/month", get(schedule::month_view))
        .route("/api/schedule/day", get(schedule::day_view))
        .with_state(state)
}
