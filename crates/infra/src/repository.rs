//! # リポジトリ
//!
//! ユーザーの永続化インターフェースと実装を提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: ユースケース層はトレイトにのみ依存する
//! - **原子性**: 各操作は全体が成功するか、何も変更しないかのどちらか
//! - **テスタビリティ**: トレイト経由で差し替え可能

pub mod user_repository;

pub use user_repository::{InMemoryUserRepository, UserRepository};
