use axum::{extract::State, http::StatusCode, routing::get, Router};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    blog::{
        dto::{BlogListResponse, BlogResponse, CreateBlogRequest, MessageResponse, UpdateBlogRequest},
        repo::{Blog, NewBlog},
    },
    error::ApiError,
    extract::{Json, Path},
    state::AppState,
};

pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blogs).post(create_blog))
        .route(
            "/:id",
            get(get_blog).patch(update_blog).delete(delete_blog),
        )
        .route("/user/:author_id", get(list_blogs_by_author))
}

#[instrument(skip(state))]
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<BlogListResponse>, ApiError> {
    let blogs = Blog::list_all(&state.db).await?;
    let count = blogs.len();
    Ok(Json(BlogListResponse { blogs, count }))
}

#[instrument(skip(state))]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BlogResponse>, ApiError> {
    let blog = Blog::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("blog post not found".into()))?;
    Ok(Json(BlogResponse { blog }))
}

#[instrument(skip(state))]
pub async fn list_blogs_by_author(
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> Result<Json<BlogListResponse>, ApiError> {
    let blogs = Blog::list_by_author(&state.db, author_id).await?;
    let count = blogs.len();
    Ok(Json(BlogListResponse { blogs, count }))
}

#[instrument(skip(state, payload))]
pub async fn create_blog(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateBlogRequest>,
) -> Result<(StatusCode, Json<BlogResponse>), ApiError> {
    let (title, content) = payload.validate()?;

    // Owner always comes from the verified token, never from the body
    let blog = Blog::create(
        &state.db,
        NewBlog {
            title,
            content,
            excerpt: payload.excerpt.as_deref(),
            image: payload.image.as_deref(),
            tags: &payload.tags,
            author_id: user.id,
            author_name: &user.name,
        },
    )
    .await?;

    info!(blog_id = %blog.id, author_id = %user.id, "blog post created");
    Ok((StatusCode::CREATED, Json(BlogResponse { blog })))
}

#[instrument(skip(state, payload))]
pub async fn update_blog(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBlogRequest>,
) -> Result<Json<BlogResponse>, ApiError> {
    let changes = payload.into_changes()?;

    let blog = Blog::update_owned(&state.db, id, user.id, &changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("blog post not found".into()))?;

    info!(blog_id = %blog.id, author_id = %user.id, "blog post updated");
    Ok(Json(BlogResponse { blog }))
}

#[instrument(skip(state))]
pub async fn delete_blog(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !Blog::delete_owned(&state.db, id, user.id).await? {
        return Err(ApiError::NotFound("blog post not found".into()));
    }

    info!(blog_id = %id, author_id = %user.id, "blog post deleted");
    Ok(Json(MessageResponse {
        message: "blog post deleted".into(),
    }))
}
