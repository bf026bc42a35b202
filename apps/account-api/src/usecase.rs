//! # ユースケース層
//!
//! Account API のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **トレイトベースの設計**: ハンドラのテストではスタブに差し替える
//! - **依存性注入**: リポジトリ・パスワードハッシャ・トークンサービス・時計を外部から注入
//! - **エラーはカタログの値で返す**: インフラ層のエラーは内部原因として包む

pub mod user;

use account_domain::user::User;
use async_trait::async_trait;
pub use user::{LoginInput, ModifyInput, RegisterInput, UserUseCaseImpl};

use crate::{error::DomainError, token::IssuedToken};

/// ユーザーユースケーストレイト
#[async_trait]
pub trait UserUseCase: Send + Sync {
   /// ユーザーを登録する
   ///
   /// ## 戻り値
   ///
   /// - `Ok(User)`: 作成したユーザー
   /// - `Err(USERNAME_CONFLICT)`: ユーザー名が使用済み
   async fn register(&self, input: RegisterInput) -> Result<User, DomainError>;

   /// パスワードを検証してトークンを発行する
   ///
   /// ## 戻り値
   ///
   /// - `Ok(IssuedToken)`: 発行したトークン
   /// - `Err(USER_NOT_FOUND)`: ユーザーが存在しない
   /// - `Err(WRONG_PASSWORD)`: パスワード不一致
   async fn login(&self, input: LoginInput) -> Result<IssuedToken, DomainError>;

   /// ユーザーを取得する
   ///
   /// `id` が UUID として解釈できない場合も `USER_NOT_FOUND`。
   async fn get_user(&self, id: &str) -> Result<User, DomainError>;

   /// ユーザーのプロフィールを部分更新する
   async fn modify_user(&self, id: &str, input: ModifyInput) -> Result<User, DomainError>;
}

#[async_trait]
impl UserUseCase for UserUseCaseImpl {
   async fn register(&self, input: RegisterInput) -> Result<User, DomainError> {
      self.register(input).await
   }

   async fn login(&self, input: LoginInput) -> Result<IssuedToken, DomainError> {
      self.login(input).await
   }

   async fn get_user(&self, id: &str) -> Result<User, DomainError> {
      self.get_user(id).await
   }

   async fn modify_user(&self, id: &str, input: ModifyInput) -> Result<User, DomainError> {
      self.modify_user(id, input).await
   }
}
