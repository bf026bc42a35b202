//! # Account API ライブラリ
//!
//! ユーザーアカウントサービス（登録・ログイン・プロフィール取得/更新）のコアモジュール。
//!
//! ## モジュール構成
//!
//! - `app_builder`: DI とルーター構築
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラーカタログ（コード・メッセージ・HTTP ステータス）
//! - `handler`: HTTP ハンドラ
//! - `middleware`: 認証ゲート
//! - `pipeline`: 型付きリクエストのデコード・検証・ログとレスポンスのエンベロープ化
//! - `redact`: ログ出力前の秘匿化
//! - `token`: JWT の発行・検証
//! - `usecase`: ビジネスロジック
//! - `validation`: 検証ルールとエラー変換表

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod pipeline;
pub mod redact;
pub mod token;
pub mod usecase;
pub mod validation;
