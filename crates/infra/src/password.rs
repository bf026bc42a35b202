//! # パスワードハッシュ
//!
//! Argon2id によるパスワードのハッシュ化と検証を提供する。
//! ハッシュは PHC 文字列形式（`$argon2id$v=19$...`）で永続化する。

use account_domain::password::{PasswordHash, PasswordVerifyResult, PlainPassword};
use argon2::{
   Argon2,
   Params,
   PasswordHasher as _,
   PasswordVerifier as _,
   password_hash::{PasswordHash as PhcHash, SaltString},
};
use rand::RngCore as _;

use crate::InfraError;

/// ソルト長（バイト）
const SALT_LEN: usize = 16;

/// パスワードのハッシュ化・検証を担当するトレイト
pub trait PasswordHasher: Send + Sync {
   /// 平文パスワードをハッシュ化する
   ///
   /// # Errors
   ///
   /// - ソルトの生成・エンコードに失敗した場合
   fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError>;

   /// パスワードを検証する
   ///
   /// # Errors
   ///
   /// - 不正なハッシュ形式の場合（不一致はエラーではなく `Mismatch`）
   fn verify(
      &self,
      password: &PlainPassword,
      hash: &PasswordHash,
   ) -> Result<PasswordVerifyResult, InfraError>;
}

/// Argon2id による実装
///
/// デフォルトは argon2 クレートの推奨パラメータ（m=19 MiB, t=2, p=1）。
pub struct Argon2PasswordHasher {
   argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
   pub fn new() -> Self {
      Self {
         argon2: Argon2::default(),
      }
   }

   /// パラメータを指定して作成する（テストでのコスト削減用）
   pub fn with_params(params: Params) -> Self {
      Self {
         argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
      }
   }
}

impl Default for Argon2PasswordHasher {
   fn default() -> Self {
      Self::new()
   }
}

impl PasswordHasher for Argon2PasswordHasher {
   fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
      let mut salt = [0u8; SALT_LEN];
      rand::rng().fill_bytes(&mut salt);
      let salt = SaltString::encode_b64(&salt)
         .map_err(|e| InfraError::password_hash(format!("ソルトのエンコードに失敗: {e}")))?;

      let hash = self
         .argon2
         .hash_password(password.expose().as_bytes(), &salt)
         .map_err(|e| InfraError::password_hash(format!("ハッシュ化に失敗: {e}")))?;

      Ok(PasswordHash::new(hash.to_string()))
   }

   fn verify(
      &self,
      password: &PlainPassword,
      hash: &PasswordHash,
   ) -> Result<PasswordVerifyResult, InfraError> {
      let parsed = PhcHash::new(hash.as_str())
         .map_err(|e| InfraError::password_hash(format!("不正なハッシュ形式: {e}")))?;

      let matched = self
         .argon2
         .verify_password(password.expose().as_bytes(), &parsed)
         .is_ok();

      Ok(PasswordVerifyResult::from(matched))
   }
}
