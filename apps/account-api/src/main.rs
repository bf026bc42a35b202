//! # Account API サーバー
//!
//! ユーザーアカウントの登録・ログイン・プロフィール管理を提供する API サーバー。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `ACCOUNT_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `ACCOUNT_PORT` | No | ポート番号（デフォルト: `8080`） |
//! | `JWT_SECRET` | **Yes** | トークン署名鍵 |
//! | `JWT_TTL_HOURS` | No | トークン有効期間（時間、デフォルト: `24`） |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログフィルタ（デフォルト: `info,account=debug`） |
//!
//! ## 起動方法
//!
//! ```bash
//! JWT_SECRET=change-me cargo run -p account-api
//! ```

use std::{net::SocketAddr, sync::Arc};

use account_api::{
   app_builder::{AppDeps, build_app},
   config::AccountConfig,
   token::TokenService,
};
use account_domain::clock::{Clock, SystemClock};
use account_infra::{Argon2PasswordHasher, repository::InMemoryUserRepository};
use account_shared::observability::{TracingConfig, init_tracing};
use anyhow::Context as _;
use tokio::net::TcpListener;

/// Account API サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   // トレーシング初期化
   let tracing_config = TracingConfig::from_env("account-api");
   init_tracing(&tracing_config);
   let _tracing_guard = tracing::info_span!("app", service = "account-api").entered();

   // 設定読み込み
   let config = AccountConfig::from_env().context("設定の読み込みに失敗しました")?;
   tracing::info!(?config, "Account API サーバーを起動します");

   // 依存コンポーネントを初期化
   let clock: Arc<dyn Clock> = Arc::new(SystemClock);
   let token_service = TokenService::new(
      &config.jwt.secret,
      config.jwt.ttl_hours,
      config.jwt.issuer.as_str(),
      clock.clone(),
   )
   .context("トークンサービスの初期化に失敗しました")?;

   let app = build_app(AppDeps {
      user_repository: Arc::new(InMemoryUserRepository::new()),
      password_hasher: Arc::new(Argon2PasswordHasher::new()),
      token_service: Arc::new(token_service),
      clock,
   });

   let addr: SocketAddr = format!("{}:{}", config.host, config.port)
      .parse()
      .context("アドレスのパースに失敗しました")?;

   let listener = TcpListener::bind(addr).await?;
   tracing::info!("Account API サーバーが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}
