//! Blog post handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use verrou_core::types::Page;
use verrou_entity::post::{Post, PostStats, PostView};
use verrou_service::blog::{CreatePostInput, PostFilter, UpdatePostInput};

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, MultipartForm, Pagination, QueryParams, UuidPath};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    mut form: MultipartForm,
) -> ApiResult<(StatusCode, Json<ApiResponse<Post>>)> {
    require_admin(&auth)?;
    let input = CreatePostInput {
        title: form.required("title")?.to_string(),
        content: form.required("content")?.to_string(),
        category_id: form.required_uuid("category_id")?,
        published: form.bool("published")?,
        image: form.take_file("image"),
    };
    let post = state.post_service.create(&auth, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(post, "Post created")),
    ))
}

/// GET /api/posts
pub async fn list_posts(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<PostFilter>,
    Pagination(query): Pagination,
) -> ApiResult<Json<ApiResponse<Page<PostView>>>> {
    let posts = state.post_service.list(filter, &query).await?;
    Ok(Json(ApiResponse::ok(posts)))
}

/// GET /api/posts/stats
pub async fn post_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<PostStats>>> {
    require_admin(&auth)?;
    let stats = state.post_service.stats().await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/posts/slug/{slug}
pub async fn read_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ApiResponse<PostView>>> {
    let post = state.post_service.read_by_slug(&slug).await?;
    Ok(Json(ApiResponse::ok(post)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ApiResponse<PostView>>> {
    let post = state.post_service.get(id).await?;
    Ok(Json(ApiResponse::ok(post)))
}

/// GET /api/posts/category/{category_id}
pub async fn list_by_category(
    State(state): State<AppState>,
    UuidPath(category_id): UuidPath,
    Pagination(query): Pagination,
) -> ApiResult<Json<ApiResponse<Page<PostView>>>> {
    let posts = state
        .post_service
        .list_by_category(category_id, &query)
        .await?;
    Ok(Json(ApiResponse::ok(posts)))
}

/// PATCH /api/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
    mut form: MultipartForm,
) -> ApiResult<Json<ApiResponse<Post>>> {
    require_admin(&auth)?;
    let input = UpdatePostInput {
        title: form.text("title").map(str::to_string),
        content: form.text("content").map(str::to_string),
        category_id: form.uuid("category_id")?,
        published: form.bool("published")?,
        image: form.take_file("image"),
    };
    let post = state.post_service.update(&auth, id, input).await?;
    Ok(Json(ApiResponse::with_message(post, "Post updated")))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ApiResponse<()>>> {
    require_admin(&auth)?;
    state.post_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::message("Post deleted")))
}
