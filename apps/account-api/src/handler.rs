//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックは usecase 層に委譲
//! - 入力は [`Typed`](crate::pipeline::Typed) で受け取り、[`Reply`](crate::pipeline::Reply) を返す
//!
//! ## ハンドラ一覧
//!
//! - `health`: 疎通確認
//! - `user`: ユーザー登録・取得・更新
//! - `session`: ログイン（トークン発行）

pub mod health;
pub mod session;
pub mod user;

pub use health::ping;
pub use session::login;
pub use user::{UserState, get_me, get_user, modify_me, register};
