//! # Account Service インフラ層
//!
//! 外部システム（永続化・パスワードハッシュ）との接続を担当する。
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`error`] - インフラ層エラー定義
//! - [`password`] - Argon2id によるパスワードのハッシュ化・検証
//! - [`repository`] - ユーザーリポジトリ（トレイトとインメモリ実装）

pub mod error;
pub mod password;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
pub use password::{Argon2PasswordHasher, PasswordHasher};
