use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::board::columns::BoardColumns;
use crate::controllers::service_order_controller::ServiceOrderController;
use crate::dto::service_order_dto::{
    AllowedTransitionsResponse, CreateServiceOrderRequest, StatusHistoryResponse,
    UpdateStatusRequest,
};
use crate::dto::ApiResponse;
use crate::models::auth::{AuthenticatedUser, Permission};
use crate::models::ServiceOrder;
use crate::services::authorization_service::require_permission;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_service_order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/board", get(get_board))
        .route("/:id", get(get_order))
        .route("/:id/status", patch(update_order_status))
        .route("/:id/history", get(get_order_history))
        .route("/:id/transitions", get(get_allowed_transitions))
}

async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<ServiceOrder>>, AppError> {
    require_permission(&user, Permission::ViewOrders)?;
    let controller = ServiceOrderController::new(&state);
    Ok(Json(controller.list(user.company_id).await?))
}

async fn get_board(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<BoardColumns>, AppError> {
    require_permission(&user, Permission::ViewOrders)?;
    let controller = ServiceOrderController::new(&state);
    Ok(Json(controller.board(user.company_id).await?))
}

async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateServiceOrderRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ServiceOrder>>, AppError> {
    require_permission(&user, Permission::CreateOrders)?;
    let Json(request) = payload?;
    let controller = ServiceOrderController::new(&state);
    Ok(Json(controller.create(&user, request).await?))
}

async fn get_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ServiceOrder>, AppError> {
    require_permission(&user, Permission::ViewOrders)?;
    let Path(id) = path?;
    let controller = ServiceOrderController::new(&state);
    Ok(Json(controller.get_by_id(user.company_id, id).await?))
}

async fn update_order_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<ServiceOrder>, AppError> {
    require_permission(&user, Permission::MoveOrders)?;
    let Path(id) = path?;
    let Json(request) = payload?;
    let controller = ServiceOrderController::new(&state);
    Ok(Json(controller.update_status(&user, id, request).await?))
}

async fn get_order_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<StatusHistoryResponse>>, AppError> {
    require_permission(&user, Permission::ViewHistory)?;
    let Path(id) = path?;
    let controller = ServiceOrderController::new(&state);
    Ok(Json(controller.history(user.company_id, id).await?))
}

async fn get_allowed_transitions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<AllowedTransitionsResponse>, AppError> {
    require_permission(&user, Permission::ViewOrders)?;
    let Path(id) = path?;
    let controller = ServiceOrderController::new(&state);
    Ok(Json(controller.allowed_transitions(user.company_id, id).await?))
}
