use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::create_cors_layer;
use crate::handlers::{agenda, event_students, events, health_check, slots};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/events", get(events::list_events).post(events::create_event))
        .route("/events/type/:event_type", get(events::get_events_by_type))
        .route(
            "/events/student/:id_student",
            get(events::get_events_by_student),
        )
        .route(
            "/events/:id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route("/events/:id/students", get(events::get_event_students))
        .route(
            "/events/:id/slots/:slot_index/register",
            post(slots::register_slot),
        )
        .route(
            "/events/:id/slots/:slot_index/unregister",
            delete(slots::unregister_slot),
        )
        .route(
            "/event-students",
            get(event_students::list_event_students).post(event_students::create_event_student),
        )
        .route(
            "/event-students/student/:id_student",
            get(event_students::list_by_student),
        )
        .route(
            "/event-students/:id",
            get(event_students::get_event_student)
                .patch(event_students::update_event_student)
                .delete(event_students::delete_event_student),
        )
        .route("/agenda/student/:id_student", get(agenda::get_student_agenda))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}
