//! # リクエストアダプタ
//!
//! 型付きリクエストのデコード・検証・秘匿化ログと、
//! 成功/失敗レスポンスのエンベロープ化を一箇所にまとめる。
//!
//! ## 処理の流れ
//!
//! ```text
//! ボディ ─→ デコード ─→ 秘匿化してログ ─→ 検証 ─→ ハンドラ ─→ Success / DomainError
//!             │                             │
//!             └─ 失敗 ──────────────────────┴─→ ValidationRuleTable::translate ─→ DomainError
//! ```
//!
//! - [`Typed`] は axum のエクストラクタとして上記の前半を担い、失敗時は
//!   [`DomainError`] でリジェクトする（ハンドラは呼ばれない）
//! - ハンドラは [`Reply`] を返し、後半のエンベロープ化は [`IntoResponse`] 実装が担う
//! - どの経路でもレスポンスはちょうど 1 つのエンベロープになる

use std::{fmt, sync::Arc};

use account_shared::SuccessEnvelope;
use axum::{
   Json,
   body::Bytes,
   extract::{FromRef, FromRequest, Request},
   http::StatusCode,
   response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
   error::DomainError,
   redact::Redact,
   validation::{BindError, Rule, Validate, ValidationRuleTable},
};

/// 型付きリクエストとして扱える型
pub trait TypedRequest: DeserializeOwned + Validate + Redact + fmt::Debug + Send {
   /// ボディを持たないリクエスト型は値を返し、デコードを省略させる
   fn without_body() -> Option<Self> {
      None
   }
}

/// ボディを持たないリクエスト
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct EmptyRequest;

impl Validate for EmptyRequest {
   const RULES: &'static [Rule<Self>] = &[];
}

impl Redact for EmptyRequest {
   fn redact(&self) -> Self {
      *self
   }
}

impl TypedRequest for EmptyRequest {
   fn without_body() -> Option<Self> {
      Some(Self)
   }
}

/// 型付きリクエストのエクストラクタ
///
/// 状態から [`ValidationRuleTable`] を取り出し、失敗を [`DomainError`] に変換する。
#[derive(Debug)]
pub struct Typed<T>(pub T);

impl<S, T> FromRequest<S> for Typed<T>
where
   S: Send + Sync,
   T: TypedRequest,
   Arc<ValidationRuleTable>: FromRef<S>,
{
   type Rejection = DomainError;

   async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
      if let Some(request) = T::without_body() {
         return Ok(Self(request));
      }

      let rules = Arc::<ValidationRuleTable>::from_ref(state);
      let body = Bytes::from_request(req, state).await.map_err(|rejection| {
         tracing::info!(
            status = rejection.status().as_u16(),
            "リクエストボディを読み取れません"
         );
         DomainError::INVALID_INPUT.wrap(rejection.body_text())
      })?;

      bind::<T>(&body)
         .map(Self)
         .map_err(|error| rules.translate(error))
   }
}

/// ボディをデコードして検証する
///
/// デコードに成功した時点で、検証結果にかかわらず秘匿化済みのコピーをログに出す。
pub fn bind<T: TypedRequest>(body: &[u8]) -> Result<T, BindError> {
   let request: T = serde_json::from_slice(body).map_err(|e| {
      let error = BindError::malformed(&e);
      tracing::info!(%error, "リクエストをデコードできません");
      error
   })?;

   tracing::info!(request = ?request.redact(), "リクエストを受け付けました");

   request.validate()?;
   Ok(request)
}

/// 成功レスポンスの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessKind {
   /// 200 OK
   Ok,
   /// 201 Created
   Created,
}

impl SuccessKind {
   pub fn status(self) -> StatusCode {
      match self {
         Self::Ok => StatusCode::OK,
         Self::Created => StatusCode::CREATED,
      }
   }
}

/// 成功レスポンス
#[derive(Debug, Clone, PartialEq)]
pub struct Success<P> {
   kind: SuccessKind,
   data: Option<P>,
}

impl<P> Success<P> {
   pub fn ok(data: P) -> Self {
      Self {
         kind: SuccessKind::Ok,
         data: Some(data),
      }
   }

   pub fn created(data: P) -> Self {
      Self {
         kind: SuccessKind::Created,
         data: Some(data),
      }
   }
}

impl Success<()> {
   /// データを持たない 200 OK
   pub fn empty() -> Self {
      Self {
         kind: SuccessKind::Ok,
         data: None,
      }
   }
}

impl<P: Serialize> IntoResponse for Success<P> {
   fn into_response(self) -> Response {
      (self.kind.status(), Json(SuccessEnvelope::new(self.data))).into_response()
   }
}

/// ハンドラの戻り値
pub type Reply<P> = Result<Success<P>, DomainError>;
