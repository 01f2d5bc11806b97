use crate::{
    message::{
        message_dto::{SendMessageRequest, SidebarUser},
        message_handlers,
        message_models::{Message, MessageResponse},
    },
    middleware::auth_middleware,
    state::AppState,
    user::user_models::User,
    websocket,
};
use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::message::message_handlers::get_sidebar,
        crate::message::message_handlers::get_messages,
        crate::message::message_handlers::send_message,
    ),
    components(
        schemas(
            SendMessageRequest,
            SidebarUser,
            User,
            Message,
            MessageResponse,
        )
    ),
    tags(
        (name = "messages", description = "User messaging endpoints")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([
            "http://localhost:3000".parse().unwrap(),
            "http://localhost:5173".parse().unwrap(),
            "http://127.0.0.1:5173".parse().unwrap(),
        ]))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true);

    // All chat routes require an authenticated user
    let api_routes = Router::new()
        .route("/sidebar", get(message_handlers::get_sidebar))
        .route(
            "/messages/:user_id",
            get(message_handlers::get_messages).post(message_handlers::send_message),
        )
        .route("/ws", get(websocket::ws_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
