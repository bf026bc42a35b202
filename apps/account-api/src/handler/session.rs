//! # セッションハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/v1/sessions` - ログイン（トークン発行）
//!
//! ログイン時の検証は `required` のみ。登録時の形式ルールが後から厳しくなっても、
//! 既存ユーザーがパスワード照合まで到達できるようにする。

use account_domain::password::PlainPassword;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use super::user::UserState;
use crate::{
   pipeline::{Reply, Success, Typed, TypedRequest},
   redact::{Redact, mask},
   usecase::LoginInput,
   validation::{Rule, Validate, checks::required},
};

/// ログインリクエスト
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
   #[serde(default)]
   pub username: String,
   #[serde(default)]
   pub password: String,
}

impl Validate for LoginRequest {
   const RULES: &'static [Rule<Self>] = &[
      Rule::new("username", "required", |r: &Self| required(&r.username)),
      Rule::new("password", "required", |r: &Self| required(&r.password)),
   ];
}

impl Redact for LoginRequest {
   fn redact(&self) -> Self {
      Self {
         password: mask(&self.password),
         ..self.clone()
      }
   }
}

impl TypedRequest for LoginRequest {}

/// ログインレスポンス
#[derive(Debug, Serialize)]
pub struct SessionResponse {
   pub token:     String,
   /// 有効期限（UNIX 秒）
   #[serde(rename = "expireAt")]
   pub expire_at: i64,
}

/// POST /api/v1/sessions
pub async fn login(
   State(state): State<UserState>,
   Typed(req): Typed<LoginRequest>,
) -> Reply<SessionResponse> {
   let issued = state
      .usecase
      .login(LoginInput {
         username: req.username,
         password: PlainPassword::new(req.password),
      })
      .await?;

   Ok(Success::created(SessionResponse {
      token:     issued.token,
      expire_at: issued.expires_at.timestamp(),
   }))
}
