use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{is_valid_email, AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password_async, verify_password_async},
        repo::User,
    },
    error::ApiError,
    extract::Json,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Normalize and validate a registration payload.
fn validate_register(payload: RegisterRequest) -> Result<(String, String, String), ApiError> {
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::Validation("please provide name".into()))?
        .to_string();
    let chars = name.chars().count();
    if !(3..=50).contains(&chars) {
        return Err(ApiError::Validation(
            "name must be between 3 and 50 characters".into(),
        ));
    }

    let email = payload
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::Validation("please provide email".into()))?;
    if !is_valid_email(&email) {
        return Err(ApiError::Validation("please provide a valid email".into()));
    }

    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::Validation("please provide password".into()))?;
    if password.chars().count() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }

    Ok((name, email, password))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let (name, email, password) = validate_register(payload)?;

    let hash = hash_password_async(password).await?;

    let user = match User::create(&state.db, &name, &email, &hash).await {
        Ok(u) => u,
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            warn!(email = %email, "email already registered");
            return Err(ApiError::Validation("email already registered".into()));
        }
        Err(e) => return Err(e.into()),
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.name)?;

    info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: PublicUser { name: user.name },
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(ApiError::Validation(
            "please provide email and password".into(),
        ));
    };
    let email = email.trim().to_lowercase();

    // Unknown email and wrong password share one outcome so logins
    // cannot be used to enumerate accounts
    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!("login with unknown email");
        return Err(ApiError::Unauthenticated("invalid credentials".into()));
    };

    let ok = verify_password_async(password, user.password_hash.clone()).await?;
    if !ok {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::Unauthenticated("invalid credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.name)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        user: PublicUser { name: user.name },
        token,
    }))
}
