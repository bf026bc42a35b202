//! 統合テスト共通のセットアップ
//!
//! インメモリリポジトリ・低コストの Argon2 パラメータ・手動時計で
//! アプリケーション全体を組み立て、`oneshot` でリクエストを送る。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use std::sync::Arc;

use account_api::{
   app_builder::{AppDeps, build_app},
   token::{ISSUER, TokenService},
};
use account_domain::clock::ManualClock;
use account_infra::{Argon2PasswordHasher, repository::InMemoryUserRepository};
use argon2::Params;
use axum::{
   Router,
   body::Body,
   http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

pub const PASSWORD: &str = "Abcdef12!";

/// テスト対象のアプリケーション
pub struct TestApp {
   router:    Router,
   pub clock: Arc<ManualClock>,
}

/// レスポンス（ステータスとボディ）
pub struct TestResponse {
   pub status: StatusCode,
   pub body:   String,
}

impl TestResponse {
   pub fn json(&self) -> Value {
      serde_json::from_str(&self.body).unwrap()
   }
}

pub fn started_at() -> DateTime<Utc> {
   DateTime::from_timestamp(1_763_913_236, 0).unwrap()
}

impl TestApp {
   pub fn new() -> Self {
      let clock = Arc::new(ManualClock::new(started_at()));
      let token_service =
         TokenService::new("integration-test-secret", 24, ISSUER, clock.clone()).unwrap();
      let router = build_app(AppDeps {
         user_repository: Arc::new(InMemoryUserRepository::new()),
         password_hasher: Arc::new(Argon2PasswordHasher::with_params(
            Params::new(1024, 1, 1, None).unwrap(),
         )),
         token_service:   Arc::new(token_service),
         clock:           clock.clone(),
      });
      Self { router, clock }
   }

   pub fn router(&self) -> Router {
      self.router.clone()
   }

   pub async fn send(
      &self,
      method: Method,
      uri: &str,
      body: Option<Value>,
      bearer: Option<&str>,
   ) -> TestResponse {
      let mut builder = Request::builder()
         .method(method)
         .uri(uri)
         .header(header::CONTENT_TYPE, "application/json");
      if let Some(token) = bearer {
         builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
      }
      let request = builder
         .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
         .unwrap();

      let response = self.router.clone().oneshot(request).await.unwrap();
      let status = response.status();
      let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
         .await
         .unwrap();
      TestResponse {
         status,
         body: String::from_utf8(bytes.to_vec()).unwrap(),
      }
   }

   pub async fn register(&self, username: &str, password: &str) -> TestResponse {
      self
         .send(
            Method::POST,
            "/api/v1/users",
            Some(serde_json::json!({ "username": username, "password": password })),
            None,
         )
         .await
   }

   pub async fn login(&self, username: &str, password: &str) -> TestResponse {
      self
         .send(
            Method::POST,
            "/api/v1/sessions",
            Some(serde_json::json!({ "username": username, "password": password })),
            None,
         )
         .await
   }

   /// 登録してログインし、トークンを返す
   pub async fn sign_in(&self, username: &str) -> String {
      assert_eq!(self.register(username, PASSWORD).await.status, StatusCode::CREATED);
      let response = self.login(username, PASSWORD).await;
      assert_eq!(response.status, StatusCode::CREATED);
      response.json()["data"]["token"]
         .as_str()
         .unwrap()
         .to_string()
   }
}
