//! # Account Service ドメイン層
//!
//! ユーザーアカウントのドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層は HTTP やストレージに一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`clock`] - 時刻プロバイダ（テストでの時刻注入用）
//! - [`password`] - パスワード関連の値オブジェクト
//! - [`user`] - ユーザーエンティティと識別子

pub mod clock;
pub mod password;
pub mod user;
