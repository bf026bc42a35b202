//! # レスポンスエンベロープ
//!
//! 全エンドポイントで共通のレスポンス形式を提供する。
//!
//! ## ワイヤ形式
//!
//! クライアントとの互換性のため、以下の形式を厳密に維持する:
//!
//! ```text
//! 成功: {"status":"success","code":0,"message":"ok","data":{...}}
//! 失敗: {"status":"error","code":<int>,"message":"<string>","details":<optional>}
//! ```
//!
//! HTTP ステータスはエンベロープに含めない（レスポンスのステータスラインで返す）。

use serde::{Deserialize, Serialize};

/// 成功レスポンスのコード
pub const SUCCESS_CODE: u32 = 0;

/// 成功レスポンスのメッセージ
pub const SUCCESS_MESSAGE: &str = "ok";

/// エンベロープの状態識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
   Success,
   Error,
}

/// 成功レスポンス
///
/// `data` が `None` の場合、JSON には `data` キー自体を出力しない。
///
/// ```
/// use account_shared::SuccessEnvelope;
///
/// let envelope = SuccessEnvelope::new(Some("hello"));
/// assert_eq!(envelope.code, 0);
/// assert_eq!(envelope.message, "ok");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
   pub status:  EnvelopeStatus,
   pub code:    u32,
   pub message: String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub data:    Option<T>,
}

impl<T> SuccessEnvelope<T> {
   /// 成功エンベロープを作成する
   pub fn new(data: Option<T>) -> Self {
      Self {
         status: EnvelopeStatus::Success,
         code: SUCCESS_CODE,
         message: SUCCESS_MESSAGE.to_string(),
         data,
      }
   }
}

/// 失敗レスポンス
///
/// `details` には入力値そのものを入れてはならない（フィールド名・ルール名のみ）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureEnvelope {
   pub status:  EnvelopeStatus,
   pub code:    u32,
   pub message: String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub details: Option<serde_json::Value>,
}

impl FailureEnvelope {
   /// 失敗エンベロープを作成する
   pub fn new(
      code: u32,
      message: impl Into<String>,
      details: Option<serde_json::Value>,
   ) -> Self {
      Self {
         status: EnvelopeStatus::Error,
         code,
         message: message.into(),
         details,
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use serde_json::json;

   use super::*;

   #[test]
   fn test_成功エンベロープが固定のワイヤ形式になる() {
      let envelope = SuccessEnvelope::new(Some(json!({ "username": "robin" })));

      let value = serde_json::to_value(&envelope).unwrap();

      assert_eq!(
         value,
         json!({
            "status": "success",
            "code": 0,
            "message": "ok",
            "data": { "username": "robin" }
         })
      );
   }

   #[test]
   fn test_dataがnoneの場合はキーを出力しない() {
      let envelope: SuccessEnvelope<()> = SuccessEnvelope::new(None);

      let value = serde_json::to_value(&envelope).unwrap();

      assert!(value.get("data").is_none());
      assert_eq!(value["status"], "success");
   }

   #[test]
   fn test_失敗エンベロープが固定のワイヤ形式になる() {
      let envelope = FailureEnvelope::new(
         20101,
         "ユーザー名は必須です",
         Some(json!({ "field": "username", "rule": "required" })),
      );

      let value = serde_json::to_value(&envelope).unwrap();

      assert_eq!(
         value,
         json!({
            "status": "error",
            "code": 20101,
            "message": "ユーザー名は必須です",
            "details": { "field": "username", "rule": "required" }
         })
      );
   }

   #[test]
   fn test_detailsがnoneの場合はキーを出力しない() {
      let envelope = FailureEnvelope::new(30001, "ユーザーが存在しません", None);

      let json = serde_json::to_string(&envelope).unwrap();

      assert_eq!(
         json,
         r#"{"status":"error","code":30001,"message":"ユーザーが存在しません"}"#
      );
   }

   #[test]
   fn test_失敗エンベロープをデシリアライズできる() {
      let json = r#"{"status":"error","code":40001,"message":"競合"}"#;

      let envelope: FailureEnvelope = serde_json::from_str(json).unwrap();

      assert_eq!(envelope.status, EnvelopeStatus::Error);
      assert_eq!(envelope.code, 40001);
      assert_eq!(envelope.details, None);
   }
}
