//! # ユーザーユースケース
//!
//! 登録・ログイン・取得・更新を実装する。
//!
//! ## タイミング攻撃対策
//!
//! ログイン時にユーザーが存在しない場合も、入力されたパスワードのハッシュ化を
//! 1 回実行してから失敗を返し、処理時間を均一化する。

use std::sync::Arc;

use account_domain::{
   clock::Clock,
   password::PlainPassword,
   user::{User, UserId, UserPatch},
};
use account_infra::{InfraError, PasswordHasher, repository::UserRepository};

use crate::{
   error::DomainError,
   token::{IssuedToken, TokenService},
};

/// 登録の入力
#[derive(Debug, Clone)]
pub struct RegisterInput {
   pub username: String,
   pub password: PlainPassword,
   pub nickname: Option<String>,
   pub avatar:   Option<String>,
   pub email:    Option<String>,
}

/// ログインの入力
#[derive(Debug, Clone)]
pub struct LoginInput {
   pub username: String,
   pub password: PlainPassword,
}

/// プロフィール更新の入力
#[derive(Debug, Clone, Default)]
pub struct ModifyInput {
   pub nickname: Option<String>,
   pub avatar:   Option<String>,
   pub email:    Option<String>,
   pub password: Option<PlainPassword>,
}

/// ユーザーユースケースの実装
pub struct UserUseCaseImpl {
   user_repository: Arc<dyn UserRepository>,
   password_hasher: Arc<dyn PasswordHasher>,
   token_service:   Arc<TokenService>,
   clock:           Arc<dyn Clock>,
}

impl UserUseCaseImpl {
   /// 新しいユースケースインスタンスを作成
   pub fn new(
      user_repository: Arc<dyn UserRepository>,
      password_hasher: Arc<dyn PasswordHasher>,
      token_service: Arc<TokenService>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         user_repository,
         password_hasher,
         token_service,
         clock,
      }
   }

   pub async fn register(&self, input: RegisterInput) -> Result<User, DomainError> {
      let existing = self
         .user_repository
         .find_by_username(&input.username)
         .await
         .map_err(database_failed)?;
      if existing.is_some() {
         return Err(DomainError::USERNAME_CONFLICT);
      }

      let password_hash = self
         .password_hasher
         .hash(&input.password)
         .map_err(|e| DomainError::PASSWORD_HASH_FAILED.wrap(e))?;

      let user = User::new(
         UserId::new(),
         input.username,
         password_hash,
         self.clock.now(),
      )
      .with_profile(input.nickname, input.avatar, input.email);

      // 事前確認と挿入の間に同名ユーザーが作られた場合もここで競合になる
      self
         .user_repository
         .insert(&user)
         .await
         .map_err(|e| {
            if e.as_conflict().is_some() {
               DomainError::USERNAME_CONFLICT.wrap(e)
            } else {
               database_failed(e)
            }
         })?;

      tracing::info!(user_id = %user.id(), "ユーザーを登録しました");
      Ok(user)
   }

   pub async fn login(&self, input: LoginInput) -> Result<IssuedToken, DomainError> {
      let user = self
         .user_repository
         .find_by_username(&input.username)
         .await
         .map_err(database_failed)?;

      let Some(user) = user else {
         self.dummy_verification(&input.password);
         return Err(DomainError::USER_NOT_FOUND);
      };

      let verified = self
         .password_hasher
         .verify(&input.password, user.password_hash())
         .map_err(|e| DomainError::PASSWORD_HASH_FAILED.wrap(e))?;
      if !verified.is_match() {
         return Err(DomainError::WRONG_PASSWORD);
      }

      self
         .token_service
         .issue(&user.id().to_string(), user.username())
         .map_err(|e| DomainError::TOKEN_ISSUE_FAILED.wrap(e))
   }

   pub async fn get_user(&self, id: &str) -> Result<User, DomainError> {
      let id = parse_user_id(id)?;

      self
         .user_repository
         .find_by_id(&id)
         .await
         .map_err(database_failed)?
         .ok_or(DomainError::USER_NOT_FOUND)
   }

   pub async fn modify_user(&self, id: &str, input: ModifyInput) -> Result<User, DomainError> {
      let id = parse_user_id(id)?;

      let password_hash = input
         .password
         .as_ref()
         .map(|password| self.password_hasher.hash(password))
         .transpose()
         .map_err(|e| DomainError::PASSWORD_HASH_FAILED.wrap(e))?;

      let patch = UserPatch {
         nickname: input.nickname,
         avatar: input.avatar,
         email: input.email,
         password_hash,
      };

      self
         .user_repository
         .update(&id, patch, self.clock.now())
         .await
         .map_err(database_failed)?
         .ok_or(DomainError::USER_NOT_FOUND)
   }

   /// 処理時間を均一化するためのダミーハッシュ化
   fn dummy_verification(&self, password: &PlainPassword) {
      let _ = self.password_hasher.hash(password);
   }
}

fn database_failed(error: InfraError) -> DomainError {
   DomainError::DATABASE_FAILED.wrap(error)
}

fn parse_user_id(id: &str) -> Result<UserId, DomainError> {
   id.parse().map_err(|e| DomainError::USER_NOT_FOUND.wrap(e))
}
