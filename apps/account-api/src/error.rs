//! # エラーカタログ
//!
//! Account API が返しうる失敗をすべて定数として列挙し、
//! クライアント向けコード・メッセージ・HTTP ステータスへの対応を一箇所に固定する。
//!
//! ## コード体系
//!
//! | 帯 | HTTP ステータス | 用途 |
//! |----|----------------|------|
//! | 1xxxx | 500 | インフラ障害（メッセージは汎用の「混雑」に統一） |
//! | 2xxxx | 400 | 入力検証・業務ルール違反 |
//! | 3xxxx | 404 | リソースが存在しない |
//! | 4xxxx | 409 | 競合 |
//! | 5xxxx | 401 | 認証 |
//!
//! コードはワイヤ契約の一部であり、一度公開した値は変更しない。
//! 同じコードは常に同じメッセージ・ステータスを持つ（[`PartialEq`] もコードのみで比較する）。
//!
//! ## 内部原因
//!
//! 定数は共有される不変値であり、原因を付与するときは [`DomainError::wrap`] で
//! コピーを作る。内部原因はサーバーログにのみ出力し、レスポンスには含めない。

use std::{error::Error as StdError, fmt, sync::Arc};

use account_shared::FailureEnvelope;
use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};

/// 内部原因（ログ専用）
pub type Cause = Arc<dyn StdError + Send + Sync>;

/// インフラ障害時にクライアントへ返す汎用メッセージ
const SYSTEM_BUSY: &str = "システムが混み合っています。しばらくしてから再度お試しください";

/// ドメインエラー
///
/// `(code, message, status)` の三つ組に、任意の内部原因と詳細情報を付与したもの。
#[derive(Clone)]
pub struct DomainError {
   code:    u32,
   message: &'static str,
   status:  StatusCode,
   details: Option<serde_json::Value>,
   cause:   Option<Cause>,
}

impl DomainError {
   const fn define(code: u32, message: &'static str, status: StatusCode) -> Self {
      Self {
         code,
         message,
         status,
         details: None,
         cause: None,
      }
   }

   /// 内部原因を付与したコピーを返す
   ///
   /// `self` は変更しない。
   pub fn wrap(&self, cause: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
      Self {
         cause: Some(Arc::from(cause.into())),
         ..self.clone()
      }
   }

   /// クライアント向けの詳細情報を付与したコピーを返す
   ///
   /// 入力値そのものを入れてはならない。
   pub fn with_details(&self, details: serde_json::Value) -> Self {
      Self {
         details: Some(details),
         ..self.clone()
      }
   }

   pub fn code(&self) -> u32 {
      self.code
   }

   pub fn message(&self) -> &'static str {
      self.message
   }

   pub fn status(&self) -> StatusCode {
      self.status
   }

   pub fn details(&self) -> Option<&serde_json::Value> {
      self.details.as_ref()
   }

   pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
      self.cause.as_deref()
   }

   /// インフラ障害（5xx）かどうか
   pub fn is_infrastructure(&self) -> bool {
      self.status.is_server_error()
   }

   /// ワイヤ形式に変換する（内部原因は含めない）
   pub fn to_envelope(&self) -> FailureEnvelope {
      FailureEnvelope::new(self.code, self.message, self.details.clone())
   }
}

/// エラー定数と [`DomainError::catalog`] を同じ一覧から生成する
///
/// 定数を追加すると自動的にカタログにも含まれ、コードの一意性テストの対象になる。
macro_rules! define_catalog {
   (
      $(
         $(#[$meta:meta])*
         $name:ident = ($code:literal, $message:expr, $status:ident);
      )+
   ) => {
      impl DomainError {
         $(
            $(#[$meta])*
            pub const $name: Self = Self::define($code, $message, StatusCode::$status);
         )+

         /// カタログに定義された全エラー
         pub fn catalog() -> Vec<Self> {
            vec![$(Self::$name),+]
         }
      }
   };
}

define_catalog! {
   // ===== 500: インフラ障害 =====

   DATABASE_FAILED = (10001, SYSTEM_BUSY, INTERNAL_SERVER_ERROR);
   TOKEN_ISSUE_FAILED = (10002, SYSTEM_BUSY, INTERNAL_SERVER_ERROR);
   PASSWORD_HASH_FAILED = (10003, SYSTEM_BUSY, INTERNAL_SERVER_ERROR);

   // ===== 400: 入力検証・業務ルール =====

   INVALID_INPUT = (20001, "リクエストパラメータが不正です", BAD_REQUEST);
   WRONG_PASSWORD = (20002, "パスワードが間違っています", BAD_REQUEST);

   USERNAME_REQUIRED = (20101, "ユーザー名は必須です", BAD_REQUEST);
   USERNAME_TOO_SHORT = (20102, "ユーザー名は4文字以上で入力してください", BAD_REQUEST);
   USERNAME_TOO_LONG = (20103, "ユーザー名は16文字以内で入力してください", BAD_REQUEST);
   USERNAME_INVALID_FORMAT = (20104, "ユーザー名は英数字・アンダースコア・ハイフンで構成し、英数字で始めて英数字で終えてください（予約語は使用できません）", BAD_REQUEST);

   PASSWORD_REQUIRED = (20201, "パスワードは必須です", BAD_REQUEST);
   PASSWORD_TOO_SHORT = (20202, "パスワードは8文字以上で入力してください", BAD_REQUEST);
   PASSWORD_TOO_LONG = (20203, "パスワードは50文字以内で入力してください", BAD_REQUEST);
   PASSWORD_TOO_WEAK = (20204, "パスワードは英大文字・英小文字・数字・記号のうち3種類以上を含めてください", BAD_REQUEST);

   NICKNAME_TOO_SHORT = (20301, "ニックネームは2文字以上で入力してください", BAD_REQUEST);
   NICKNAME_TOO_LONG = (20302, "ニックネームは20文字以内で入力してください", BAD_REQUEST);

   AVATAR_INVALID_URL = (20401, "アバターの URL 形式が不正です", BAD_REQUEST);

   EMAIL_INVALID_FORMAT = (20501, "メールアドレスの形式が不正です", BAD_REQUEST);

   // ===== 404 =====

   USER_NOT_FOUND = (30001, "ユーザーが存在しません", NOT_FOUND);

   // ===== 409 =====

   USERNAME_CONFLICT = (40001, "このユーザー名は既に使用されています", CONFLICT);

   // ===== 401 =====

   MISSING_AUTHORIZATION_HEADER = (50001, "Authorization ヘッダがありません", UNAUTHORIZED);
   INVALID_AUTHORIZATION_HEADER = (50002, "Authorization ヘッダの形式が不正です", UNAUTHORIZED);
   INVALID_TOKEN = (50003, "トークンが無効です", UNAUTHORIZED);
   IDENTITY_MISSING = (50004, "認証情報を取得できません", UNAUTHORIZED);
}

impl PartialEq for DomainError {
   fn eq(&self, other: &Self) -> bool {
      self.code == other.code
   }
}

impl Eq for DomainError {}

impl fmt::Debug for DomainError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("DomainError")
         .field("code", &self.code)
         .field("status", &self.status.as_u16())
         .field("message", &self.message)
         .field("cause", &self.cause)
         .finish()
   }
}

impl fmt::Display for DomainError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "[{}] {}", self.code, self.message)
   }
}

impl StdError for DomainError {
   fn source(&self) -> Option<&(dyn StdError + 'static)> {
      self.cause
         .as_deref()
         .map(|cause| cause as &(dyn StdError + 'static))
   }
}

impl IntoResponse for DomainError {
   fn into_response(self) -> Response {
      match (&self.cause, self.is_infrastructure()) {
         (Some(cause), true) => {
            tracing::error!(code = self.code, cause = ?cause, "内部エラーが発生しました");
         }
         (None, true) => tracing::error!(code = self.code, "内部エラーが発生しました"),
         (Some(cause), false) => {
            tracing::warn!(code = self.code, cause = %cause, "リクエストを拒否しました");
         }
         (None, false) => tracing::info!(code = self.code, "リクエストを拒否しました"),
      }

      (self.status, Json(self.to_envelope())).into_response()
   }
}
