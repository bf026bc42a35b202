//! # Account API アプリケーション構築
//!
//! 依存コンポーネント（リポジトリ・ハッシャ・トークンサービス・時計）を受け取り、
//! ユースケース → State → Router の順に組み立てる。
//! `main.rs` は設定読み込みとサーバー起動に集中する。

use std::sync::Arc;

use account_domain::clock::Clock;
use account_infra::{PasswordHasher, repository::UserRepository};
use account_shared::observability::make_request_span;
use axum::{
   Router,
   body::Body,
   middleware::from_fn_with_state,
   routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
   handler::{UserState, get_me, get_user, login, modify_me, ping, register},
   middleware::{AuthGateState, require_auth},
   token::TokenService,
   usecase::UserUseCaseImpl,
   validation::ValidationRuleTable,
};

/// ルーター構築に必要な依存
pub struct AppDeps {
   pub user_repository: Arc<dyn UserRepository>,
   pub password_hasher: Arc<dyn PasswordHasher>,
   pub token_service:   Arc<TokenService>,
   pub clock:           Arc<dyn Clock>,
}

/// DI の構築とルーター定義を行う
///
/// 検証変換表はここで 1 度だけ構築し、全リクエストで共有する。
pub fn build_app(deps: AppDeps) -> Router {
   let usecase = Arc::new(UserUseCaseImpl::new(
      deps.user_repository,
      deps.password_hasher,
      deps.token_service.clone(),
      deps.clock,
   ));

   let user_state = UserState {
      usecase,
      rule_table: Arc::new(ValidationRuleTable::standard()),
   };

   // 認証ゲートは TokenService を検証器としてのみ参照する
   let gate_state = AuthGateState {
      verifier: deps.token_service,
   };

   // 要認証ルート
   let protected = Router::new()
      .route("/api/v1/users/me", get(get_me).patch(modify_me))
      .route("/api/v1/users/{uuid}", get(get_user))
      .route_layer(from_fn_with_state(gate_state, require_auth));

   Router::new()
      .route("/ping", get(ping))
      .route("/api/v1/users", post(register))
      .route("/api/v1/sessions", post(login))
      .merge(protected)
      .with_state(user_state)
      .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
}
