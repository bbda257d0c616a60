//! Authentication API endpoints.
//!
//! Phone login with verification codes, email register/login, a QQ OAuth
//! demo flow, and the account endpoints behind the bearer gate.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    Extension, Json,
};
use lazy_static::lazy_static;
use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::services::auth::{Claims, DUMMY_HASH};
use crate::store::models::User;
use crate::AppState;

use super::ApiResponse;

lazy_static! {
    /// Mainland mobile numbers: 1, then 3-9, then nine digits.
    static ref PHONE_RE: Regex = Regex::new(r"^1[3-9]\d{9}$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub phone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCodeData {
    /// Demo mode: the code is returned instead of sent over SMS.
    pub code: String,
    pub expires_in: u64,
}

/// POST /api/auth/send-code
///
/// Issues a verification code for the phone. In a real deployment the code
/// would go out via SMS; here it is returned in the response and logged.
pub async fn send_code(
    State(state): State<AppState>,
    Json(body): Json<SendCodeRequest>,
) -> Result<Json<ApiResponse<SendCodeData>>> {
    if !PHONE_RE.is_match(&body.phone) {
        return Err(AppError::BadRequest(
            "Please enter a valid phone number".to_string(),
        ));
    }

    let code = state.verification_codes().generate(&body.phone).await;
    tracing::info!(phone = %body.phone, code = %code, "Verification code issued");

    Ok(Json(ApiResponse::ok(
        "Verification code sent",
        SendCodeData {
            code,
            expires_in: state.config().auth.code_ttl_secs,
        },
    )))
}

#[derive(Debug, Deserialize)]
pub struct PhoneLoginRequest {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/login-phone
///
/// Verifies the code and logs the user in, creating the account on first
/// login.
pub async fn login_phone(
    State(state): State<AppState>,
    Json(body): Json<PhoneLoginRequest>,
) -> Result<Json<ApiResponse<LoginData>>> {
    if !PHONE_RE.is_match(&body.phone) {
        return Err(AppError::BadRequest(
            "Please enter a valid phone number".to_string(),
        ));
    }
    if body.code.is_empty() {
        return Err(AppError::BadRequest(
            "Verification code is required".to_string(),
        ));
    }

    state
        .verification_codes()
        .verify(&body.phone, &body.code)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let (user, created) = state.store().find_or_create_by_phone(&body.phone).await;
    let token = state.auth_service().create_token(user.id)?;

    tracing::info!(user_id = %user.id, created = created, "Phone login");

    let message = if created {
        "Registered and logged in"
    } else {
        "Logged in"
    };
    Ok(Json(ApiResponse::ok(message, LoginData { token, user })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub nickname: Option<String>,
}

/// POST /api/auth/register
///
/// Creates an email account. 201 on success.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoginData>>)> {
    if !EMAIL_RE.is_match(&body.email) {
        return Err(AppError::BadRequest(
            "Please enter a valid email address".to_string(),
        ));
    }
    if body.password.len() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    if body.password != body.confirm_password {
        return Err(AppError::BadRequest("Passwords do not match".to_string()));
    }

    let nickname = match body.nickname.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => body.email.split('@').next().unwrap_or("user").to_string(),
    };

    let hash = state.auth_service().hash_password(&body.password)?;
    let draft = User::from_email(body.email.clone(), hash, nickname);
    let user = state
        .store()
        .create_email_user(draft)
        .await
        .ok_or_else(|| AppError::BadRequest("Email is already registered".to_string()))?;

    let token = state.auth_service().create_token(user.id)?;
    tracing::info!(user_id = %user.id, "Email account registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Registered", LoginData { token, user })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct EmailLoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login
///
/// Email and password login. Unknown addresses run a dummy verification so
/// the response time does not reveal whether the account exists.
pub async fn login_email(
    State(state): State<AppState>,
    Json(body): Json<EmailLoginRequest>,
) -> Result<Json<ApiResponse<LoginData>>> {
    if body.email.is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let auth_service = state.auth_service();
    let user = match state.store().find_user_by_email(&body.email).await {
        Some(user) => user,
        None => {
            let _ = auth_service.verify_password(&body.password, DUMMY_HASH);
            return Err(AppError::Unauthorized);
        }
    };

    let authenticated = match user.password_hash.as_deref() {
        Some(hash) => auth_service.verify_password(&body.password, hash)?,
        None => {
            let _ = auth_service.verify_password(&body.password, DUMMY_HASH);
            false
        }
    };
    if !authenticated {
        return Err(AppError::Unauthorized);
    }

    let token = auth_service.create_token(user.id)?;
    tracing::info!(user_id = %user.id, "Email login");

    Ok(Json(ApiResponse::ok("Logged in", LoginData { token, user })))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QqInitData {
    pub auth_url: String,
    pub state: String,
}

/// GET /api/auth/qq/init
///
/// Starts the QQ OAuth flow by issuing a state token and building the
/// authorize URL.
pub async fn qq_init(State(state): State<AppState>) -> Result<Json<ApiResponse<QqInitData>>> {
    let oauth_state = state.qq_states().issue().await;
    let qq = &state.config().qq;

    let auth_url = format!(
        "https://graph.qq.com/oauth2.0/authorize?response_type=code&client_id={}&redirect_uri={}&state={}",
        qq.app_id,
        urlencoding::encode(&qq.redirect_uri),
        oauth_state
    );

    Ok(Json(ApiResponse::ok(
        "QQ login initialized",
        QqInitData {
            auth_url,
            state: oauth_state,
        },
    )))
}

#[derive(Debug, Deserialize)]
pub struct QqCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// GET /api/auth/qq/callback
///
/// Demo stub for the OAuth callback: the state must match an outstanding
/// one, the code is accepted without a real token exchange, and a QQ
/// identity is fabricated. Redirects back to the frontend with the token.
pub async fn qq_callback(
    State(state): State<AppState>,
    Query(query): Query<QqCallbackQuery>,
) -> Result<Redirect> {
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Authorization code is missing".to_string()))?;
    let oauth_state = query
        .state
        .ok_or_else(|| AppError::BadRequest("State parameter is missing".to_string()))?;

    if !state.qq_states().consume(&oauth_state).await {
        return Err(AppError::BadRequest(
            "Invalid or expired state parameter".to_string(),
        ));
    }

    // No real token exchange in demo mode; derive a stable-looking identity
    // from a random tag.
    let tag: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    let qq_id = format!("qq_{}", tag);
    let nickname = format!("QQ User {}", &tag[..4]);
    let avatar = "https://via.placeholder.com/150/12B7F5/FFFFFF?text=QQ".to_string();

    tracing::debug!(code = %code, "QQ callback accepted");

    let draft = User::from_qq(qq_id, nickname, avatar);
    let (user, created) = state.store().find_or_create_by_qq(draft).await;
    let token = state.auth_service().create_token(user.id)?;

    tracing::info!(user_id = %user.id, created = created, "QQ login");

    let target = format!(
        "{}/auth/qq/success?token={}",
        state.config().frontend.base_url,
        urlencoding::encode(&token)
    );
    Ok(Redirect::to(&target))
}

/// GET /api/auth/me
///
/// Returns the current authenticated user.
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<User>>> {
    let user = state
        .store()
        .find_user(claims.sub)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::ok("OK", user)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: String,
    pub confirm_password: String,
}

/// POST /api/auth/change-password
///
/// Sets a new password. Accounts that already have one must supply the old
/// password; phone/QQ accounts without a password may set one directly.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>> {
    if body.new_password.len() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    if body.new_password != body.confirm_password {
        return Err(AppError::BadRequest("Passwords do not match".to_string()));
    }

    let auth_service = state.auth_service();
    let user = state
        .store()
        .find_user(claims.sub)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if let Some(hash) = user.password_hash.as_deref() {
        let old = body.old_password.as_deref().unwrap_or("");
        if !auth_service.verify_password(old, hash)? {
            return Err(AppError::BadRequest(
                "Old password is incorrect".to_string(),
            ));
        }
    }

    let new_hash = auth_service.hash_password(&body.new_password)?;
    state
        .store()
        .update_user(claims.sub, |u| u.password_hash = Some(new_hash))
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %claims.sub, "Password changed");

    Ok(Json(ApiResponse::message("Password changed")))
}
