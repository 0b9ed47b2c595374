//! Admin trash handlers.
//!
//! ```text
//! GET    /api/v1/admin/trash/{table}
//! POST   /api/v1/admin/trash/{table}/{id}           soft delete
//! POST   /api/v1/admin/trash/{table}/{id}/restore
//! DELETE /api/v1/admin/trash/{table}/{id}           purge, trashed rows only
//! ```

use actix_web::{HttpResponse, delete, get, post, web};

use crate::domain::{Error, RecordId, TrashTable};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::cache_control::private_json;
use crate::inbound::http::dto::{TrashActionBody, TrashViewBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_trash_table};

fn parse_target(path: &(String, String)) -> Result<(TrashTable, RecordId), Error> {
    let table = parse_trash_table(&path.0)?;
    let id = parse_id(&path.1, FieldName::new("id"))?;
    Ok((table, id))
}

/// Live and trashed rows of one soft-deletable table.
#[utoipa::path(
    get,
    path = "/api/v1/admin/trash/{table}",
    params(("table" = String, Path, description = "properties, rooms, tenants, payments, or tenant_bookings")),
    responses(
        (status = 200, description = "Table contents", body = TrashViewBody),
        (status = 400, description = "Unknown table", body = Error),
        (status = 403, description = "Admin only", body = Error)
    ),
    tags = ["trash"],
    operation_id = "trashView"
)]
#[get("/admin/trash/{table}")]
pub async fn trash_view(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let table = parse_trash_table(&path)?;
    let view = state.trash.trash_view(&caller, table).await?;
    Ok(private_json(TrashViewBody::new(table, view)))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/trash/{table}/{id}",
    params(
        ("table" = String, Path, description = "Soft-deletable table"),
        ("id" = String, Path, description = "Row id")
    ),
    responses(
        (status = 200, description = "Row moved to trash", body = TrashActionBody),
        (status = 403, description = "Admin only", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Already in trash", body = Error)
    ),
    tags = ["trash"],
    operation_id = "moveToTrash"
)]
#[post("/admin/trash/{table}/{id}")]
pub async fn move_to_trash(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (table, id) = parse_target(&path)?;
    let deleted_at = state.trash.move_to_trash(&caller, table, id).await?;
    Ok(private_json(TrashActionBody {
        table,
        id,
        deleted_at,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/trash/{table}/{id}/restore",
    params(
        ("table" = String, Path, description = "Soft-deletable table"),
        ("id" = String, Path, description = "Row id")
    ),
    responses(
        (status = 200, description = "Row restored", body = TrashActionBody),
        (status = 403, description = "Admin only", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Not in trash", body = Error)
    ),
    tags = ["trash"],
    operation_id = "restoreFromTrash"
)]
#[post("/admin/trash/{table}/{id}/restore")]
pub async fn restore(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (table, id) = parse_target(&path)?;
    let deleted_at = state.trash.restore(&caller, table, id).await?;
    Ok(private_json(TrashActionBody {
        table,
        id,
        deleted_at,
    }))
}

/// Permanently delete a row that is already in the trash.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/trash/{table}/{id}",
    params(
        ("table" = String, Path, description = "Soft-deletable table"),
        ("id" = String, Path, description = "Row id")
    ),
    responses(
        (status = 204, description = "Row purged"),
        (status = 403, description = "Admin only", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Row is not in trash", body = Error)
    ),
    tags = ["trash"],
    operation_id = "purgeFromTrash"
)]
#[delete("/admin/trash/{table}/{id}")]
pub async fn purge(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (table, id) = parse_target(&path)?;
    state.trash.purge_permanently(&caller, table, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
