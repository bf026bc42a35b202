//! # インフラ層エラー定義
//!
//! 永続化やパスワードハッシュ処理で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! API 層ではこのエラーを内部原因として保持し、クライアントには汎用メッセージのみを返す。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// convenience constructor でエラーを生成すると、その時点のスパン情報が
/// 自動的にキャプチャされる。
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
   kind:       InfraErrorKind,
   span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
   /// 一意制約違反
   ///
   /// ユースケース層で事前確認した後でも、並行リクエストにより発生しうる。
   #[error("競合が発生しました: {entity}({key})")]
   Conflict {
      /// エンティティ名（例: "User"）
      entity: String,
      /// 競合したキー
      key:    String,
   },

   /// パスワードハッシュの生成・解析エラー
   #[error("パスワードハッシュエラー: {0}")]
   PasswordHash(String),

   /// 予期しないエラー
   #[error("予期しないエラー: {0}")]
   Unexpected(String),
}

impl InfraError {
   pub fn span_trace(&self) -> &SpanTrace {
      &self.span_trace
   }

   /// Conflict バリアントの場合、entity と key を返す
   pub fn as_conflict(&self) -> Option<(&str, &str)> {
      match &self.kind {
         InfraErrorKind::Conflict { entity, key } => Some((entity, key)),
         _ => None,
      }
   }

   // ===== Convenience constructors =====

   pub fn conflict(entity: impl Into<String>, key: impl Into<String>) -> Self {
      Self::from_kind(InfraErrorKind::Conflict {
         entity: entity.into(),
         key:    key.into(),
      })
   }

   pub fn password_hash(msg: impl Into<String>) -> Self {
      Self::from_kind(InfraErrorKind::PasswordHash(msg.into()))
   }

   pub fn unexpected(msg: impl Into<String>) -> Self {
      Self::from_kind(InfraErrorKind::Unexpected(msg.into()))
   }

   fn from_kind(kind: InfraErrorKind) -> Self {
      Self {
         kind,
         span_trace: SpanTrace::capture(),
      }
   }
}

impl fmt::Debug for InfraError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("InfraError")
         .field("kind", &self.kind)
         .field("span_trace", &self.span_trace)
         .finish()
   }
}

impl std::error::Error for InfraError {
   fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
      self.kind.source()
   }
}

#[cfg(test)]
mod tests {
   use tracing_subscriber::layer::SubscriberExt as _;

   use super::*;

   /// テスト用に ErrorLayer 付き subscriber を設定する
   fn with_error_layer(f: impl FnOnce()) {
      let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
      let _guard = tracing::subscriber::set_default(subscriber);
      f();
   }

   #[test]
   fn test_conflictでspan_traceがキャプチャされる() {
      with_error_layer(|| {
         let span = tracing::info_span!("insert_user", username = "robin");
         let _enter = span.enter();

         let error = InfraError::conflict("User", "robin");

         assert!(format!("{}", error.span_trace()).contains("insert_user"));
      });
   }

   #[test]
   fn test_as_conflictはconflict以外でnoneを返す() {
      let conflict = InfraError::conflict("User", "robin");
      let unexpected = InfraError::unexpected("boom");

      assert_eq!(conflict.as_conflict(), Some(("User", "robin")));
      assert_eq!(unexpected.as_conflict(), None);
   }

   #[test]
   fn test_displayは種別のメッセージを出力する() {
      let error = InfraError::password_hash("invalid salt");

      assert_eq!(error.to_string(), "パスワードハッシュエラー: invalid salt");
   }
}
