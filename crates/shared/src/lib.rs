//! # Account Service 共有ユーティリティ
//!
//! Account Service の各クレートから利用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, api）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum には依存しない（`IntoResponse` 変換はアプリ側の責務）

pub mod envelope;
pub mod observability;

pub use envelope::{EnvelopeStatus, FailureEnvelope, SuccessEnvelope};
