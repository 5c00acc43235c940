use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Courtside Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game::create_game,
        crate::routes::game::list_games,
        crate::routes::game::get_state,
        crate::routes::game::update_state,
        crate::routes::game::finalize_game,
        crate::routes::game::load_game,
        crate::routes::event::add_event,
        crate::routes::event::list_events,
        crate::routes::event::delete_event,
        crate::routes::timer::control_timer,
        crate::routes::timer::get_timer,
        crate::routes::presence::join_game,
        crate::routes::presence::heartbeat,
        crate::routes::presence::leave_game,
        crate::routes::presence::list_presence,
        crate::routes::sse::game_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::GameStateUpdateRequest,
            crate::dto::game::GameStateView,
            crate::dto::game::GameSummary,
            crate::dto::game::TimerControlRequest,
            crate::dto::game::TimerStateView,
            crate::dto::game::FinalizeResponse,
            crate::dto::event::GameEventInput,
            crate::dto::event::GameEventView,
            crate::dto::event::AppendEventResponse,
            crate::dto::presence::JoinGameRequest,
            crate::dto::presence::HeartbeatRequest,
            crate::dto::presence::HeartbeatResponse,
            crate::dto::presence::PresenceEntryView,
            crate::dto::presence::PresenceListResponse,
            crate::dto::sse::ServerEvent,
            crate::state::events::Side,
            crate::state::events::EventType,
            crate::state::game::GameStatus,
            crate::state::presence::PresenceRole,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game", description = "Game lifecycle operations"),
        (name = "events", description = "Append-only action log"),
        (name = "timer", description = "Derived game clock control"),
        (name = "presence", description = "Viewer presence tracking"),
        (name = "sse", description = "Per-game server-sent event streams"),
    )
)]
pub struct ApiDoc;
