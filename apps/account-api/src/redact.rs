//! # 秘匿化
//!
//! ログに出力する前にリクエストの秘密項目を固定値で上書きする。
//!
//! 秘匿化は常にコピーに対して行う。ハンドラに渡る値は変更しない。
//! 秘密項目を持たない型も [`Redact`] を明示的に実装する（中身はそのままの複製）。

pub use account_domain::password::MASK;

/// 秘匿化済みのコピーを作るトレイト
pub trait Redact: Clone {
   fn redact(&self) -> Self;
}

/// 値があれば固定値に置き換える
///
/// 空文字列はそのまま返す（隠すべき内容がない）。
pub fn mask(value: &str) -> String {
   if value.is_empty() {
      String::new()
   } else {
      MASK.to_string()
   }
}

pub fn mask_opt(value: Option<&str>) -> Option<String> {
   value.map(mask)
}
