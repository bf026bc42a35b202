//! # パスワード
//!
//! パスワード関連の値オブジェクトを定義する。
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`PlainPassword`] | 平文パスワード | 登録・ログイン・変更時の入力値 |
//! | [`PasswordHash`] | パスワードハッシュ | 永続化用のハッシュ値 |
//! | [`PasswordVerifyResult`] | 検証結果 | パスワード検証の成否 |
//!
//! どちらの文字列型も `Debug` 出力では [`MASK`] に置き換える。

use std::fmt;

/// 秘匿値の代わりに出力する固定文字列
///
/// ログ・エラー応答で秘匿フィールドを置き換える際の共通値。
pub const MASK: &str = "******";

/// 平文パスワード
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(String);

impl fmt::Debug for PlainPassword {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_tuple("PlainPassword").field(&MASK).finish()
   }
}

impl PlainPassword {
   pub fn new(value: impl Into<String>) -> Self {
      Self(value.into())
   }

   /// 文字列参照を取得する
   ///
   /// ハッシュ化・検証以外の用途で使ってはならない。
   pub fn expose(&self) -> &str {
      &self.0
   }
}

/// パスワードハッシュ（PHC 文字列形式）
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl fmt::Debug for PasswordHash {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_tuple("PasswordHash").field(&MASK).finish()
   }
}

impl PasswordHash {
   /// ハッシュ文字列からインスタンスを作成する
   pub fn new(hash: impl Into<String>) -> Self {
      Self(hash.into())
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// パスワード検証結果
///
/// bool ではなく専用の型を使うことで、呼び出し側の分岐の意図を明確にする。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVerifyResult {
   Match,
   Mismatch,
}

impl PasswordVerifyResult {
   pub fn is_match(&self) -> bool {
      matches!(self, Self::Match)
   }
}

impl From<bool> for PasswordVerifyResult {
   fn from(matched: bool) -> Self {
      if matched { Self::Match } else { Self::Mismatch }
   }
}
