//! # ユーザーハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/v1/users` - ユーザー登録
//! - `GET /api/v1/users/me` - 自分のプロフィール取得（要認証）
//! - `PATCH /api/v1/users/me` - 自分のプロフィール更新（要認証）
//! - `GET /api/v1/users/{uuid}` - ユーザー取得（要認証）

use std::sync::Arc;

use account_domain::{password::PlainPassword, user::User};
use axum::extract::{FromRef, Path, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
   middleware::CurrentIdentity,
   pipeline::{EmptyRequest, Reply, Success, Typed, TypedRequest},
   redact::{Redact, mask, mask_opt},
   usecase::{ModifyInput, RegisterInput, UserUseCase},
   validation::{
      Rule,
      Validate,
      ValidationRuleTable,
      checks::{email, http_url, max_chars, min_chars, password_strength, required, username},
   },
};

/// ユーザーハンドラの共有状態
#[derive(Clone)]
pub struct UserState {
   pub usecase:    Arc<dyn UserUseCase>,
   pub rule_table: Arc<ValidationRuleTable>,
}

impl FromRef<UserState> for Arc<ValidationRuleTable> {
   fn from_ref(state: &UserState) -> Self {
      state.rule_table.clone()
   }
}

// --- リクエスト/レスポンス型 ---

/// ユーザー登録リクエスト
///
/// 欠けた必須項目は空文字列として受け取り、`required` ルールで検出する。
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
   #[serde(default)]
   pub username: String,
   #[serde(default)]
   pub password: String,
   pub nickname: Option<String>,
   pub avatar:   Option<String>,
   pub email:    Option<String>,
}

impl Validate for CreateUserRequest {
   const RULES: &'static [Rule<Self>] = &[
      Rule::new("username", "required", |r: &Self| required(&r.username)),
      Rule::new("username", "min", |r: &Self| min_chars(&r.username, 4)),
      Rule::new("username", "max", |r: &Self| max_chars(&r.username, 16)),
      Rule::new("username", "username", |r: &Self| username(&r.username)),
      Rule::new("password", "required", |r: &Self| required(&r.password)),
      Rule::new("password", "min", |r: &Self| min_chars(&r.password, 8)),
      Rule::new("password", "max", |r: &Self| max_chars(&r.password, 50)),
      Rule::new("password", "password", |r: &Self| password_strength(&r.password)),
      Rule::new("nickname", "min", |r: &Self| {
         r.nickname.as_deref().is_none_or(|v| min_chars(v, 2))
      }),
      Rule::new("nickname", "max", |r: &Self| {
         r.nickname.as_deref().is_none_or(|v| max_chars(v, 20))
      }),
      Rule::new("avatar", "url", |r: &Self| r.avatar.as_deref().is_none_or(http_url)),
      Rule::new("email", "email", |r: &Self| r.email.as_deref().is_none_or(email)),
   ];
}

impl Redact for CreateUserRequest {
   fn redact(&self) -> Self {
      Self {
         password: mask(&self.password),
         ..self.clone()
      }
   }
}

impl TypedRequest for CreateUserRequest {}

/// プロフィール更新リクエスト
///
/// 指定された項目のみ更新する。パスワードは登録時と同じ規則で検証する。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModifyUserRequest {
   pub nickname: Option<String>,
   pub avatar:   Option<String>,
   pub email:    Option<String>,
   pub password: Option<String>,
}

impl Validate for ModifyUserRequest {
   const RULES: &'static [Rule<Self>] = &[
      Rule::new("nickname", "min", |r: &Self| {
         r.nickname.as_deref().is_none_or(|v| min_chars(v, 2))
      }),
      Rule::new("nickname", "max", |r: &Self| {
         r.nickname.as_deref().is_none_or(|v| max_chars(v, 20))
      }),
      Rule::new("avatar", "url", |r: &Self| r.avatar.as_deref().is_none_or(http_url)),
      Rule::new("email", "email", |r: &Self| r.email.as_deref().is_none_or(email)),
      Rule::new("password", "min", |r: &Self| {
         r.password.as_deref().is_none_or(|v| min_chars(v, 8))
      }),
      Rule::new("password", "max", |r: &Self| {
         r.password.as_deref().is_none_or(|v| max_chars(v, 50))
      }),
      Rule::new("password", "password", |r: &Self| {
         r.password.as_deref().is_none_or(password_strength)
      }),
   ];
}

impl Redact for ModifyUserRequest {
   fn redact(&self) -> Self {
      Self {
         password: mask_opt(self.password.as_deref()),
         ..self.clone()
      }
   }
}

impl TypedRequest for ModifyUserRequest {}

/// ユーザー登録レスポンス
#[derive(Debug, Serialize)]
pub struct UserCreatedResponse {
   pub username:  String,
   pub uuid:      String,
   #[serde(rename = "createAt")]
   pub create_at: DateTime<Utc>,
}

impl From<&User> for UserCreatedResponse {
   fn from(user: &User) -> Self {
      Self {
         username:  user.username().to_string(),
         uuid:      user.id().to_string(),
         create_at: user.created_at(),
      }
   }
}

/// ユーザー情報レスポンス
///
/// パスワードハッシュは含めない。
#[derive(Debug, Serialize)]
pub struct UserResponse {
   pub uuid:      String,
   pub username:  String,
   pub nickname:  Option<String>,
   pub avatar:    Option<String>,
   pub email:     Option<String>,
   #[serde(rename = "createAt")]
   pub create_at: DateTime<Utc>,
   #[serde(rename = "updateAt")]
   pub update_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
   fn from(user: &User) -> Self {
      Self {
         uuid:      user.id().to_string(),
         username:  user.username().to_string(),
         nickname:  user.nickname().map(str::to_string),
         avatar:    user.avatar().map(str::to_string),
         email:     user.email().map(str::to_string),
         create_at: user.created_at(),
         update_at: user.updated_at(),
      }
   }
}

// --- ハンドラ ---

/// POST /api/v1/users
pub async fn register(
   State(state): State<UserState>,
   Typed(req): Typed<CreateUserRequest>,
) -> Reply<UserCreatedResponse> {
   let user = state
      .usecase
      .register(RegisterInput {
         username: req.username,
         password: PlainPassword::new(req.password),
         nickname: req.nickname,
         avatar:   req.avatar,
         email:    req.email,
      })
      .await?;

   Ok(Success::created(UserCreatedResponse::from(&user)))
}

/// GET /api/v1/users/me
pub async fn get_me(
   State(state): State<UserState>,
   CurrentIdentity(identity): CurrentIdentity,
   Typed(_): Typed<EmptyRequest>,
) -> Reply<UserResponse> {
   let user = state.usecase.get_user(&identity.subject_id).await?;
   Ok(Success::ok(UserResponse::from(&user)))
}

/// GET /api/v1/users/{uuid}
pub async fn get_user(
   State(state): State<UserState>,
   Path(uuid): Path<String>,
   Typed(_): Typed<EmptyRequest>,
) -> Reply<UserResponse> {
   let user = state.usecase.get_user(&uuid).await?;
   Ok(Success::ok(UserResponse::from(&user)))
}

/// PATCH /api/v1/users/me
pub async fn modify_me(
   State(state): State<UserState>,
   CurrentIdentity(identity): CurrentIdentity,
   Typed(req): Typed<ModifyUserRequest>,
) -> Reply<UserResponse> {
   let user = state
      .usecase
      .modify_user(
         &identity.subject_id,
         ModifyInput {
            nickname: req.nickname,
            avatar:   req.avatar,
            email:    req.email,
            password: req.password.map(PlainPassword::new),
         },
      )
      .await?;

   Ok(Success::ok(UserResponse::from(&user)))
}
