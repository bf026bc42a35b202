//! # トークンサービス
//!
//! HS256 で署名した JWT を発行・検証する。
//!
//! ## クレーム
//!
//! | JSON キー | 内容 |
//! |-----------|------|
//! | `userId` | 主体 ID（ユーザーの UUID） |
//! | `username` | 表示名 |
//! | `iat` / `exp` | 発行時刻 / 有効期限（UNIX 秒） |
//! | `iss` | 発行者（[`ISSUER`]） |
//!
//! ## 時刻
//!
//! 現在時刻は注入された [`Clock`] から取得する。有効期限の判定は
//! jsonwebtoken の組み込み検証を使わず、`now > exp` で自前で行う
//! （期限ちょうどの時刻はまだ有効）。

use std::sync::Arc;

use account_domain::clock::Clock;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// トークン発行者
pub const ISSUER: &str = "account-api-service";

/// トークンのクレーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
   #[serde(rename = "userId")]
   pub subject_id:   String,
   #[serde(rename = "username")]
   pub display_name: String,
   pub iat:          i64,
   pub exp:          i64,
   pub iss:          String,
}

/// 発行したトークン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
   pub token:      String,
   pub expires_at: DateTime<Utc>,
}

/// トークンの発行・検証エラー
#[derive(Debug, Error)]
pub enum TokenError {
   #[error("署名鍵が空です")]
   EmptySecret,

   #[error("トークン有効期間が不正です: {0} 時間")]
   InvalidTtl(i64),

   #[error("トークンの署名に失敗しました: {0}")]
   Signing(#[source] jsonwebtoken::errors::Error),

   #[error("トークンの有効期限が切れています（exp={expired_at}）")]
   Expired { expired_at: i64 },

   #[error("トークンを検証できません: {0}")]
   Invalid(#[source] jsonwebtoken::errors::Error),
}

impl TokenError {
   pub fn is_expired(&self) -> bool {
      matches!(self, Self::Expired { .. })
   }
}

/// トークン検証トレイト
///
/// 認証ゲートはこのトレイト経由でのみトークンを検証する。
pub trait TokenVerifier: Send + Sync {
   fn verify(&self, token: &str) -> Result<Claims, TokenError>;
}

/// JWT の発行・検証サービス
///
/// 起動時に 1 度だけ構築し、`Arc` で共有する。
pub struct TokenService {
   encoding_key: EncodingKey,
   decoding_key: DecodingKey,
   validation:   Validation,
   ttl:          Duration,
   issuer:       String,
   clock:        Arc<dyn Clock>,
}

impl TokenService {
   /// # Errors
   ///
   /// - 署名鍵が空の場合
   /// - 有効期間が 0 以下の場合
   pub fn new(
      secret: &str,
      ttl_hours: i64,
      issuer: impl Into<String>,
      clock: Arc<dyn Clock>,
   ) -> Result<Self, TokenError> {
      if secret.is_empty() {
         return Err(TokenError::EmptySecret);
      }
      if ttl_hours <= 0 {
         return Err(TokenError::InvalidTtl(ttl_hours));
      }

      let issuer = issuer.into();
      let mut validation = Validation::new(Algorithm::HS256);
      validation.validate_exp = false;
      validation.set_required_spec_claims(&["exp", "iat", "iss"]);
      validation.set_issuer(&[issuer.as_str()]);

      Ok(Self {
         encoding_key: EncodingKey::from_secret(secret.as_bytes()),
         decoding_key: DecodingKey::from_secret(secret.as_bytes()),
         validation,
         ttl: Duration::hours(ttl_hours),
         issuer,
         clock,
      })
   }

   /// トークンを発行する
   pub fn issue(&self, subject_id: &str, display_name: &str) -> Result<IssuedToken, TokenError> {
      let issued_at = self.clock.now();
      let expires_at = issued_at + self.ttl;
      let claims = Claims {
         subject_id:   subject_id.to_string(),
         display_name: display_name.to_string(),
         iat:          issued_at.timestamp(),
         exp:          expires_at.timestamp(),
         iss:          self.issuer.clone(),
      };

      let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
         .map_err(TokenError::Signing)?;

      tracing::debug!(subject_id, exp = claims.exp, "トークンを発行しました");
      Ok(IssuedToken { token, expires_at })
   }

   /// 指定時刻を基準にトークンを検証する
   pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
      let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
         .map_err(TokenError::Invalid)?
         .claims;

      if now.timestamp() > claims.exp {
         return Err(TokenError::Expired {
            expired_at: claims.exp,
         });
      }
      Ok(claims)
   }
}

impl TokenVerifier for TokenService {
   fn verify(&self, token: &str) -> Result<Claims, TokenError> {
      self.verify_at(token, self.clock.now())
   }
}
