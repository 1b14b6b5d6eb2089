//! 路由表

use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::app::student::handler::{
    create_student, delete_student, get_student, health_check, list_students, update_student,
    AppState,
};
use crate::core::middleware::request_logging_middleware;

/// 允许任意来源、方法和请求头，并允许携带凭证。
/// 携带凭证时不能使用通配符 `*`，因此回显请求中的值。
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/students", get(list_students).post(create_student))
        .route("/students/", get(list_students).post(create_student))
        .route(
            "/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
