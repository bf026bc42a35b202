//! # ユーザー
//!
//! ユーザーエンティティとそれに関連する値オブジェクトを定義する。
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: [`UserId`] は UUID をラップし、外部に公開する安定した識別子とする
//!   （連番の内部 ID はクライアントに出さない）
//! - **不変性**: フィールドは getter 経由で公開し、変更は [`User::apply`] に集約する
//! - **入力検証はここでは行わない**: 形式チェックは API 層のリクエスト検証の責務
//!
//! ## 使用例
//!
//! ```rust
//! use account_domain::{
//!     password::PasswordHash,
//!     user::{User, UserId, UserPatch},
//! };
//!
//! let now = chrono::Utc::now();
//! let mut user = User::new(UserId::new(), "robin", PasswordHash::new("$argon2id$..."), now);
//!
//! user.apply(
//!     UserPatch {
//!         nickname: Some("ロビン".to_string()),
//!         ..Default::default()
//!     },
//!     now,
//! );
//! assert_eq!(user.nickname(), Some("ロビン"));
//! ```

use std::str::FromStr;

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::password::PasswordHash;

/// ユーザー ID（外部公開用の一意識別子）
///
/// トークンの subject としても使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct UserId(Uuid);

impl UserId {
   /// 新しいユーザー ID を生成する
   pub fn new() -> Self {
      Self(Uuid::new_v4())
   }
}

impl Default for UserId {
   fn default() -> Self {
      Self::new()
   }
}

impl FromStr for UserId {
   type Err = uuid::Error;

   fn from_str(s: &str) -> Result<Self, Self::Err> {
      Uuid::parse_str(s).map(Self)
   }
}

/// ユーザーエンティティ
///
/// # 不変条件
///
/// - `username` はシステム全体で一意（リポジトリが保証する）
/// - `id` は作成後に変わらない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
   id:            UserId,
   username:      String,
   password_hash: PasswordHash,
   nickname:      Option<String>,
   avatar:        Option<String>,
   email:         Option<String>,
   created_at:    DateTime<Utc>,
   updated_at:    DateTime<Utc>,
}

impl User {
   /// 新規ユーザーを作成する
   pub fn new(
      id: UserId,
      username: impl Into<String>,
      password_hash: PasswordHash,
      now: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         username: username.into(),
         password_hash,
         nickname: None,
         avatar: None,
         email: None,
         created_at: now,
         updated_at: now,
      }
   }

   /// プロフィール項目を設定する（作成時のみ使う）
   pub fn with_profile(
      mut self,
      nickname: Option<String>,
      avatar: Option<String>,
      email: Option<String>,
   ) -> Self {
      self.nickname = nickname;
      self.avatar = avatar;
      self.email = email;
      self
   }

   /// 部分更新を適用する
   ///
   /// `None` の項目は変更しない。何か変更があった場合のみ `updated_at` を進める。
   pub fn apply(&mut self, patch: UserPatch, now: DateTime<Utc>) {
      if patch.is_empty() {
         return;
      }
      if let Some(nickname) = patch.nickname {
         self.nickname = Some(nickname);
      }
      if let Some(avatar) = patch.avatar {
         self.avatar = Some(avatar);
      }
      if let Some(email) = patch.email {
         self.email = Some(email);
      }
      if let Some(hash) = patch.password_hash {
         self.password_hash = hash;
      }
      self.updated_at = now;
   }

   pub fn id(&self) -> &UserId {
      &self.id
   }

   pub fn username(&self) -> &str {
      &self.username
   }

   pub fn password_hash(&self) -> &PasswordHash {
      &self.password_hash
   }

   pub fn nickname(&self) -> Option<&str> {
      self.nickname.as_deref()
   }

   pub fn avatar(&self) -> Option<&str> {
      self.avatar.as_deref()
   }

   pub fn email(&self) -> Option<&str> {
      self.email.as_deref()
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   pub fn updated_at(&self) -> DateTime<Utc> {
      self.updated_at
   }
}

/// ユーザーの部分更新内容
///
/// パスワードはハッシュ化済みの値で受け取る。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
   pub nickname:      Option<String>,
   pub avatar:        Option<String>,
   pub email:         Option<String>,
   pub password_hash: Option<PasswordHash>,
}

impl UserPatch {
   pub fn is_empty(&self) -> bool {
      self.nickname.is_none()
         && self.avatar.is_none()
         && self.email.is_none()
         && self.password_hash.is_none()
   }
}
