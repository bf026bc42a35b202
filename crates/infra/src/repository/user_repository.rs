//! # UserRepository
//!
//! ユーザー情報の永続化を担当するリポジトリ。
//!
//! 現在の実装はプロセス内メモリに保持する [`InMemoryUserRepository`] のみ。
//! スキーマ設計と SQL はこのサービスの対象外であり、トレイトを実装すれば
//! 任意のストレージに差し替えられる。

use std::{
   collections::HashMap,
   sync::{Mutex, MutexGuard},
};

use account_domain::user::{User, UserId, UserPatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::InfraError;

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
   /// ユーザー名でユーザーを検索
   ///
   /// # 戻り値
   ///
   /// - `Ok(Some(user))`: ユーザーが見つかった場合
   /// - `Ok(None)`: ユーザーが見つからない場合
   /// - `Err(_)`: ストレージエラー
   async fn find_by_username(&self, username: &str) -> Result<Option<User>, InfraError>;

   /// ID でユーザーを検索
   async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError>;

   /// ユーザーを作成する
   ///
   /// ユーザー名が既に存在する場合は `InfraErrorKind::Conflict` を返し、何も書き込まない。
   async fn insert(&self, user: &User) -> Result<(), InfraError>;

   /// ユーザーを部分更新し、更新後のユーザーを返す
   ///
   /// 対象が存在しない場合は `Ok(None)`。
   async fn update(
      &self,
      id: &UserId,
      patch: UserPatch,
      now: DateTime<Utc>,
   ) -> Result<Option<User>, InfraError>;
}

#[derive(Debug, Default)]
struct Store {
   users:       HashMap<UserId, User>,
   by_username: HashMap<String, UserId>,
}

/// インメモリ実装の UserRepository
///
/// 単一の Mutex でユーザー本体とユーザー名索引を保護し、
/// 「存在確認 → 挿入」を不可分に行う。
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
   store: Mutex<Store>,
}

impl InMemoryUserRepository {
   pub fn new() -> Self {
      Self::default()
   }

   fn lock(&self) -> Result<MutexGuard<'_, Store>, InfraError> {
      self
         .store
         .lock()
         .map_err(|_| InfraError::unexpected("ユーザーストアのロックが破損しています"))
   }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
   async fn find_by_username(&self, username: &str) -> Result<Option<User>, InfraError> {
      let store = self.lock()?;
      Ok(store
         .by_username
         .get(username)
         .and_then(|id| store.users.get(id))
         .cloned())
   }

   async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
      Ok(self.lock()?.users.get(id).cloned())
   }

   #[tracing::instrument(skip_all, fields(username = %user.username()))]
   async fn insert(&self, user: &User) -> Result<(), InfraError> {
      let mut store = self.lock()?;

      if store.by_username.contains_key(user.username()) {
         return Err(InfraError::conflict("User", user.username()));
      }
      if store.users.contains_key(user.id()) {
         return Err(InfraError::conflict("User", user.id().to_string()));
      }

      store
         .by_username
         .insert(user.username().to_string(), *user.id());
      store.users.insert(*user.id(), user.clone());
      Ok(())
   }

   async fn update(
      &self,
      id: &UserId,
      patch: UserPatch,
      now: DateTime<Utc>,
   ) -> Result<Option<User>, InfraError> {
      let mut store = self.lock()?;
      let Some(user) = store.users.get_mut(id) else {
         return Ok(None);
      };

      user.apply(patch, now);
      Ok(Some(user.clone()))
   }
}
