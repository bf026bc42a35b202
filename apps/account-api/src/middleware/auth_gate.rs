//! # 認証ゲート
//!
//! 保護されたルートの前段で `Authorization: Bearer <token>` を検証し、
//! 認証済みの識別情報をリクエストに付与する。
//!
//! ## 状態遷移
//!
//! ```text
//! Start ─→ HeaderChecked ─→ TokenParsed ─→ Authenticated
//!   │            │               │
//!   ▼            ▼               ▼
//! 50001        50002           50003
//! ヘッダなし   形式不正        トークン不正・期限切れ
//! ```
//!
//! 失敗した段階より後の処理は行わない。ヘッダがない・形式が不正な場合は
//! トークンの検証自体を呼び出さない。期限切れと署名不正はクライアントからは
//! 区別できず、違いは内部原因としてログにのみ残る。
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! Router::new()
//!     .route("/api/v1/users/me", get(get_me))
//!     .route_layer(from_fn_with_state(gate_state, require_auth))
//! ```

use std::sync::Arc;

use axum::{
   extract::{FromRequestParts, Request, State},
   http::{HeaderValue, header::AUTHORIZATION, request::Parts},
   middleware::Next,
   response::{IntoResponse, Response},
};

use crate::{error::DomainError, token::TokenVerifier};

/// 認証ゲートの状態
#[derive(Clone)]
pub struct AuthGateState {
   pub verifier: Arc<dyn TokenVerifier>,
}

/// 認証済みの識別情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
   pub subject_id:   String,
   pub display_name: String,
}

/// `Authorization` ヘッダを検証して識別情報を得る
pub fn authenticate(
   header: Option<&HeaderValue>,
   verifier: &dyn TokenVerifier,
) -> Result<Identity, DomainError> {
   let header = header
      .filter(|value| !value.is_empty())
      .ok_or(DomainError::MISSING_AUTHORIZATION_HEADER)?;

   let token = bearer_token(header).ok_or(DomainError::INVALID_AUTHORIZATION_HEADER)?;

   let claims = verifier
      .verify(token)
      .map_err(|e| DomainError::INVALID_TOKEN.wrap(e))?;

   Ok(Identity {
      subject_id:   claims.subject_id,
      display_name: claims.display_name,
   })
}

/// `Bearer <token>` からトークン部分を取り出す
///
/// 空白 1 つで区切ったちょうど 2 要素で、先頭が `Bearer` の場合のみ受け付ける。
fn bearer_token(header: &HeaderValue) -> Option<&str> {
   let mut parts = header.to_str().ok()?.split(' ');
   match (parts.next(), parts.next(), parts.next()) {
      (Some("Bearer"), Some(token), None) => Some(token),
      _ => None,
   }
}

/// 認証ミドルウェア
///
/// 成功時は [`Identity`] をリクエスト拡張に格納して次へ進む。
/// 失敗時は失敗エンベロープを返し、ハンドラは呼ばれない。
pub async fn require_auth(
   State(state): State<AuthGateState>,
   mut request: Request,
   next: Next,
) -> Response {
   match authenticate(
      request.headers().get(AUTHORIZATION),
      state.verifier.as_ref(),
   ) {
      Ok(identity) => {
         tracing::debug!(subject_id = %identity.subject_id, "認証に成功しました");
         request.extensions_mut().insert(identity);
         next.run(request).await
      }
      Err(error) => error.into_response(),
   }
}

/// ハンドラで識別情報を受け取るエクストラクタ
///
/// 認証ゲートを通っていないルートで使うと [`DomainError::IDENTITY_MISSING`] になる。
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
   S: Send + Sync,
{
   type Rejection = DomainError;

   async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
      match parts.extensions.get::<Identity>() {
         Some(identity) => Ok(Self(identity.clone())),
         None => {
            tracing::error!("認証ゲートを経由していないルートで識別情報が要求されました");
            Err(DomainError::IDENTITY_MISSING)
         }
      }
   }
}

#[cfg(test)]
mod tests {
   use std::sync::atomic::{AtomicUsize, Ordering};

   use axum::{
      Router,
      body::Body,
      http::{Request, StatusCode},
      middleware::from_fn_with_state,
      routing::get,
   };
   use pretty_assertions::assert_eq;
   use rstest::rstest;
   use tower::ServiceExt;

   use super::*;
   use crate::token::{Claims, TokenError};

   const VALID_TOKEN: &str = "valid-token";

   /// 呼び出し回数を数えるスタブ
   #[derive(Default)]
   struct CountingVerifier {
      calls:   AtomicUsize,
      expired: bool,
   }

   impl CountingVerifier {
      fn expired() -> Self {
         Self {
            expired: true,
            ..Default::default()
         }
      }

      fn calls(&self) -> usize {
         self.calls.load(Ordering::SeqCst)
      }
   }

   impl TokenVerifier for CountingVerifier {
      fn verify(&self, token: &str) -> Result<Claims, TokenError> {
         self.calls.fetch_add(1, Ordering::SeqCst);
         if self.expired {
            return Err(TokenError::Expired { expired_at: 0 });
         }
         if token != VALID_TOKEN {
            return Err(TokenError::Invalid(
               jsonwebtoken::errors::ErrorKind::InvalidSignature.into(),
            ));
         }
         Ok(Claims {
            subject_id:   "user-1".to_string(),
            display_name: "robin".to_string(),
            iat:          0,
            exp:          0,
            iss:          "test".to_string(),
         })
      }
   }

   fn header(value: &str) -> HeaderValue {
      HeaderValue::from_str(value).unwrap()
   }

   #[test]
   fn test_ヘッダがなければ検証を呼ばずに50001() {
      let verifier = CountingVerifier::default();

      let error = authenticate(None, &verifier).unwrap_err();

      assert_eq!(error, DomainError::MISSING_AUTHORIZATION_HEADER);
      assert_eq!(verifier.calls(), 0);
   }

   #[test]
   fn test_空のヘッダはヘッダなしとして扱う() {
      let verifier = CountingVerifier::default();

      let error = authenticate(Some(&header("")), &verifier).unwrap_err();

      assert_eq!(error, DomainError::MISSING_AUTHORIZATION_HEADER);
   }

   #[rstest]
   #[case("Token abc")]
   #[case("Bearer")]
   #[case("Bearer a b")]
   #[case("bearer valid-token")]
   #[case("Bearer  valid-token")]
   fn test_形式が不正なヘッダは検証を呼ばずに50002(#[case] value: &str) {
      let verifier = CountingVerifier::default();

      let error = authenticate(Some(&header(value)), &verifier).unwrap_err();

      assert_eq!(error, DomainError::INVALID_AUTHORIZATION_HEADER);
      assert_eq!(verifier.calls(), 0);
   }

   #[test]
   fn test_不正なトークンは50003() {
      let verifier = CountingVerifier::default();

      let error = authenticate(Some(&header("Bearer forged")), &verifier).unwrap_err();

      assert_eq!(error, DomainError::INVALID_TOKEN);
      assert_eq!(verifier.calls(), 1);
   }

   #[test]
   fn test_期限切れも50003で原因にのみ区別が残る() {
      let verifier = CountingVerifier::expired();

      let error = authenticate(Some(&header("Bearer valid-token")), &verifier).unwrap_err();

      assert_eq!(error, DomainError::INVALID_TOKEN);
      assert!(error.cause().unwrap().to_string().contains("有効期限"));
   }

   #[test]
   fn test_正しいトークンで識別情報を得る() {
      let verifier = CountingVerifier::default();

      let identity = authenticate(Some(&header("Bearer valid-token")), &verifier).unwrap();

      assert_eq!(
         identity,
         Identity {
            subject_id:   "user-1".to_string(),
            display_name: "robin".to_string(),
         }
      );
   }

   async fn whoami(CurrentIdentity(identity): CurrentIdentity) -> String {
      identity.display_name
   }

   fn app() -> Router {
      let state = AuthGateState {
         verifier: Arc::new(CountingVerifier::default()),
      };
      Router::new()
         .route("/protected", get(whoami))
         .route_layer(from_fn_with_state(state, require_auth))
         .route("/unprotected", get(whoami))
   }

   async fn call(uri: &str, authorization: Option<&str>) -> (StatusCode, String) {
      let mut builder = Request::builder().uri(uri);
      if let Some(value) = authorization {
         builder = builder.header(AUTHORIZATION, value);
      }
      let response = app()
         .oneshot(builder.body(Body::empty()).unwrap())
         .await
         .unwrap();
      let status = response.status();
      let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
         .await
         .unwrap();
      (status, String::from_utf8(bytes.to_vec()).unwrap())
   }

   #[tokio::test]
   async fn test_認証成功時はハンドラに識別情報が渡る() {
      let (status, body) = call("/protected", Some("Bearer valid-token")).await;

      assert_eq!(status, StatusCode::OK);
      assert_eq!(body, "robin");
   }

   #[tokio::test]
   async fn test_認証失敗時は失敗エンベロープを返しハンドラは呼ばれない() {
      let (status, body) = call("/protected", None).await;

      assert_eq!(status, StatusCode::UNAUTHORIZED);
      let json: serde_json::Value = serde_json::from_str(&body).unwrap();
      assert_eq!(json["status"], "error");
      assert_eq!(json["code"], 50001);
   }

   #[tokio::test]
   async fn test_ゲートを通らないルートで識別情報を要求すると50004() {
      let (status, body) = call("/unprotected", Some("Bearer valid-token")).await;

      assert_eq!(status, StatusCode::UNAUTHORIZED);
      let json: serde_json::Value = serde_json::from_str(&body).unwrap();
      assert_eq!(json["code"], 50004);
   }
}
