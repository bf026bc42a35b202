//! # 入力検証とエラー変換
//!
//! リクエスト型ごとに宣言した検証ルールを評価し、
//! 検証失敗を [`DomainError`] に変換する。
//!
//! ## 設計方針
//!
//! - **ルールはデータとして宣言する**: 各リクエスト型は [`Validate::RULES`] に
//!   `(フィールド名, ルール名, 判定関数)` を宣言順に並べる
//! - **フィールドごとに最初の違反のみ**: 同じフィールドで `required` に違反したら
//!   後続の `min` などは評価しない
//! - **変換表は起動時に構築して共有する**: [`ValidationRuleTable`] は不変であり、
//!   `Arc` で全リクエストから参照する
//! - **入力値を漏らさない**: 変換結果の詳細情報と内部原因にはフィールド名・ルール名・
//!   解析位置のみを含め、リクエストボディの値は含めない

use std::{collections::HashMap, fmt};

use serde_json::json;
use thiserror::Error;

use crate::error::DomainError;

/// 検証ルール
pub struct Rule<T> {
   /// ワイヤ上のフィールド名（JSON キー）
   pub field: &'static str,
   /// ルール名（`required` / `min` / `max` / `email` など）
   pub rule:  &'static str,
   check:     fn(&T) -> bool,
}

impl<T> Rule<T> {
   pub const fn new(field: &'static str, rule: &'static str, check: fn(&T) -> bool) -> Self {
      Self { field, rule, check }
   }

   pub fn is_satisfied_by(&self, value: &T) -> bool {
      (self.check)(value)
   }
}

/// 検証ルールを宣言するトレイト
pub trait Validate: Sized + 'static {
   /// 評価順に並べた検証ルール
   const RULES: &'static [Rule<Self>];

   /// 全ルールを宣言順に評価する
   ///
   /// 違反したフィールドの残りのルールはスキップする。
   fn validate(&self) -> Result<(), ValidationErrors> {
      let mut violations: Vec<Violation> = Vec::new();

      for rule in Self::RULES {
         if violations.iter().any(|v| v.field == rule.field) {
            continue;
         }
         if !rule.is_satisfied_by(self) {
            violations.push(Violation {
               field: rule.field,
               rule:  rule.rule,
            });
         }
      }

      ValidationErrors::from_violations(violations).map_or(Ok(()), Err)
   }
}

/// 単一の検証違反
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
   pub field: &'static str,
   pub rule:  &'static str,
}

impl fmt::Display for Violation {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "{}:{}", self.field, self.rule)
   }
}

/// 検証違反の一覧（1 件以上）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<Violation>);

impl fmt::Display for ValidationErrors {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "入力検証に失敗しました（{} 件、先頭: {}）", self.0.len(), self.first())
   }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
   /// 違反が 1 件以上ある場合のみ作成する
   pub fn from_violations(violations: Vec<Violation>) -> Option<Self> {
      if violations.is_empty() {
         None
      } else {
         Some(Self(violations))
      }
   }

   /// 先頭の違反
   pub fn first(&self) -> &Violation {
      &self.0[0]
   }

   pub fn violations(&self) -> &[Violation] {
      &self.0
   }
}

/// リクエストのバインド失敗
#[derive(Debug, Error)]
pub enum BindError {
   /// ボディを型付きリクエストとして解釈できない
   ///
   /// 保持するのは解析エラーの分類と位置のみ。
   #[error("リクエストボディを解析できません: {0}")]
   Malformed(String),

   /// 検証ルール違反
   #[error(transparent)]
   Invalid(#[from] ValidationErrors),
}

impl BindError {
   /// JSON 解析エラーから作成する
   ///
   /// serde_json のメッセージは入力値の断片を含みうるため使わない。
   pub fn malformed(error: &serde_json::Error) -> Self {
      Self::Malformed(format!(
         "{:?} (line {}, column {})",
         error.classify(),
         error.line(),
         error.column()
      ))
   }
}

/// 検証違反 → ドメインエラーの変換表
///
/// キーはワイヤ上のフィールド名とルール名。
#[derive(Debug, Clone, Default)]
pub struct ValidationRuleTable {
   entries: HashMap<&'static str, HashMap<&'static str, DomainError>>,
}

impl ValidationRuleTable {
   /// 空の変換表（すべての違反が [`DomainError::INVALID_INPUT`] になる）
   pub fn empty() -> Self {
      Self::default()
   }

   /// Account API の標準変換表
   pub fn standard() -> Self {
      Self::empty()
         .with_entry("username", "required", DomainError::USERNAME_REQUIRED)
         .with_entry("username", "min", DomainError::USERNAME_TOO_SHORT)
         .with_entry("username", "max", DomainError::USERNAME_TOO_LONG)
         .with_entry("username", "username", DomainError::USERNAME_INVALID_FORMAT)
         .with_entry("password", "required", DomainError::PASSWORD_REQUIRED)
         .with_entry("password", "min", DomainError::PASSWORD_TOO_SHORT)
         .with_entry("password", "max", DomainError::PASSWORD_TOO_LONG)
         .with_entry("password", "password", DomainError::PASSWORD_TOO_WEAK)
         .with_entry("nickname", "min", DomainError::NICKNAME_TOO_SHORT)
         .with_entry("nickname", "max", DomainError::NICKNAME_TOO_LONG)
         .with_entry("avatar", "url", DomainError::AVATAR_INVALID_URL)
         .with_entry("email", "email", DomainError::EMAIL_INVALID_FORMAT)
   }

   pub fn with_entry(
      mut self,
      field: &'static str,
      rule: &'static str,
      error: DomainError,
   ) -> Self {
      self.entries.entry(field).or_default().insert(rule, error);
      self
   }

   pub fn lookup(&self, field: &str, rule: &str) -> Option<&DomainError> {
      self.entries.get(field)?.get(rule)
   }

   /// バインド失敗をドメインエラーに変換する
   ///
   /// 検証違反は先頭の 1 件のみを変換し、詳細情報にフィールド名とルール名を付与する。
   /// 変換表にない違反と解析エラーは [`DomainError::INVALID_INPUT`] になる。
   pub fn translate(&self, error: BindError) -> DomainError {
      match error {
         BindError::Invalid(errors) => {
            let first = *errors.first();
            self
               .lookup(first.field, first.rule)
               .cloned()
               .unwrap_or(DomainError::INVALID_INPUT)
               .with_details(json!({ "field": first.field, "rule": first.rule }))
               .wrap(errors)
         }
         malformed @ BindError::Malformed(_) => DomainError::INVALID_INPUT.wrap(malformed),
      }
   }
}

/// 検証ルールで使う判定関数
pub mod checks {
   use std::sync::LazyLock;

   use regex::Regex;
   use validator::ValidateEmail as _;

   /// 予約済みで登録できないユーザー名
   const RESERVED_USERNAMES: [&str; 3] = ["admin", "root", "test"];

   static USERNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
      Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_-]{2,14}[a-zA-Z0-9]$")
         .expect("ユーザー名パターンは有効な正規表現")
   });

   pub fn required(value: &str) -> bool {
      !value.is_empty()
   }

   /// 文字数（バイト数ではない）が `min` 以上
   pub fn min_chars(value: &str, min: usize) -> bool {
      value.chars().count() >= min
   }

   pub fn max_chars(value: &str, max: usize) -> bool {
      value.chars().count() <= max
   }

   /// 英数字で始まり英数字で終わる 4〜16 文字（`_` `-` を含められる）、かつ予約語でない
   pub fn username(value: &str) -> bool {
      USERNAME_PATTERN.is_match(value)
         && !RESERVED_USERNAMES
            .iter()
            .any(|reserved| value.eq_ignore_ascii_case(reserved))
   }

   /// 英大文字・英小文字・数字・記号のうち 3 種類以上を含む
   pub fn password_strength(value: &str) -> bool {
      let classes = [
         value.chars().any(|c| c.is_ascii_uppercase()),
         value.chars().any(|c| c.is_ascii_lowercase()),
         value.chars().any(|c| c.is_ascii_digit()),
         value.chars().any(|c| !c.is_ascii_alphanumeric()),
      ];
      classes.into_iter().filter(|&present| present).count() >= 3
   }

   /// ホストを持つ http / https の URL
   pub fn http_url(value: &str) -> bool {
      url::Url::parse(value)
         .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
   }

   /// HTML5 仕様相当のメールアドレス形式（ドメインは英数字とハイフンのラベルのみ）
   pub fn email(value: &str) -> bool {
      value.validate_email()
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::{checks::*, *};

   #[derive(Debug)]
   struct Sample {
      name: String,
      mail: Option<String>,
   }

   impl Validate for Sample {
      const RULES: &'static [Rule<Self>] = &[
         Rule::new("name", "required", |s: &Self| required(&s.name)),
         Rule::new("name", "min", |s: &Self| min_chars(&s.name, 3)),
         Rule::new("mail", "email", |s: &Self| s.mail.as_deref().is_none_or(email)),
      ];
   }

   fn sample(name: &str, mail: Option<&str>) -> Sample {
      Sample {
         name: name.to_string(),
         mail: mail.map(str::to_string),
      }
   }

   #[test]
   fn test_全ルールを満たせば検証成功() {
      assert!(sample("robin", Some("robin@example.com")).validate().is_ok());
      assert!(sample("robin", None).validate().is_ok());
   }

   #[test]
   fn test_同じフィールドは最初の違反のみ記録される() {
      let errors = sample("", None).validate().unwrap_err();

      assert_eq!(
         errors.violations(),
         &[Violation {
            field: "name",
            rule:  "required",
         }]
      );
   }

   #[test]
   fn test_違反は宣言順に並ぶ() {
      let errors = sample("ab", Some("not-an-email")).validate().unwrap_err();

      assert_eq!(
         errors.violations(),
         &[
            Violation {
               field: "name",
               rule:  "min",
            },
            Violation {
               field: "mail",
               rule:  "email",
            },
         ]
      );
   }

   #[test]
   fn test_変換表にある違反は対応するエラーと詳細情報になる() {
      // Given
      let table = ValidationRuleTable::standard();
      let errors = ValidationErrors::from_violations(vec![
         Violation {
            field: "password",
            rule:  "min",
         },
         Violation {
            field: "email",
            rule:  "email",
         },
      ])
      .unwrap();

      // When
      let error = table.translate(BindError::Invalid(errors));

      // Then
      assert_eq!(error, DomainError::PASSWORD_TOO_SHORT);
      assert_eq!(
         error.details(),
         Some(&json!({ "field": "password", "rule": "min" }))
      );
      assert!(error.cause().is_some());
   }

   #[test]
   fn test_複数の違反があっても先頭の違反のみ変換される() {
      // Given
      let errors = ValidationErrors::from_violations(vec![
         Violation {
            field: "password",
            rule:  "required",
         },
         Violation {
            field: "email",
            rule:  "email",
         },
      ])
      .unwrap();

      // When
      let error = ValidationRuleTable::standard().translate(BindError::Invalid(errors));

      // Then
      assert_eq!(error, DomainError::PASSWORD_REQUIRED);
      assert_eq!(
         error.details(),
         Some(&json!({ "field": "password", "rule": "required" }))
      );
   }

   #[test]
   fn test_変換表にない違反は汎用の入力エラーになる() {
      let table = ValidationRuleTable::empty();
      let errors = ValidationErrors::from_violations(vec![Violation {
         field: "username",
         rule:  "required",
      }])
      .unwrap();

      let error = table.translate(BindError::Invalid(errors));

      assert_eq!(error, DomainError::INVALID_INPUT);
   }

   #[test]
   fn test_解析エラーは汎用の入力エラーで原因に入力値を含まない() {
      // Given
      let parse_error =
         serde_json::from_str::<serde_json::Value>(r#"{"password": "Secret123!""#).unwrap_err();

      // When
      let error = ValidationRuleTable::standard().translate(BindError::malformed(&parse_error));

      // Then
      assert_eq!(error, DomainError::INVALID_INPUT);
      assert!(error.details().is_none());
      let cause = error.cause().unwrap().to_string();
      assert!(cause.contains("Eof"));
      assert!(!cause.contains("Secret123!"));
   }

   #[test]
   fn test_標準変換表は全エントリで400系エラーを返す() {
      let table = ValidationRuleTable::standard();

      for (field, rules) in &table.entries {
         for (rule, error) in rules {
            assert_eq!(
               error.status(),
               axum::http::StatusCode::BAD_REQUEST,
               "{field}:{rule}"
            );
         }
      }
   }

   #[rstest]
   #[case("robin", true)]
   #[case("a_b-c", true)]
   #[case("r0b", false)]
   #[case("_robin", false)]
   #[case("robin-", false)]
   #[case("robin.smith", false)]
   #[case("abcdefghijklmnopq", false)]
   #[case("admin", false)]
   #[case("Root", false)]
   fn test_ユーザー名形式(#[case] input: &str, #[case] expected: bool) {
      assert_eq!(username(input), expected);
   }

   #[rstest]
   #[case("Abcdef12!", true)]
   #[case("abcdef12!", true)]
   #[case("ABCDEFG1", false)]
   #[case("abcdefgh", false)]
   #[case("12345678", false)]
   fn test_パスワード強度(#[case] input: &str, #[case] expected: bool) {
      assert_eq!(password_strength(input), expected);
   }

   #[rstest]
   #[case("https://cdn.example.com/a.png", true)]
   #[case("http://example.com", true)]
   #[case("ftp://example.com/a.png", false)]
   #[case("example.com/a.png", false)]
   fn test_アバターurl(#[case] input: &str, #[case] expected: bool) {
      assert_eq!(http_url(input), expected);
   }

   #[rstest]
   #[case("robin@example.com", true)]
   #[case("robin@mail.example.co.jp", true)]
   #[case("robin@-.-", false)]
   #[case("robin@exa_mple.c_m", false)]
   #[case("robin example@example.com", false)]
   #[case("@example.com", false)]
   fn test_メールアドレス形式(#[case] input: &str, #[case] expected: bool) {
      assert_eq!(email(input), expected);
   }

   #[test]
   fn test_文字数はバイト数ではなく文字単位で数える() {
      assert!(min_chars("ロビ", 2));
      assert!(max_chars("ロビン", 3));
      assert!(!max_chars("ロビンソン", 4));
   }
}
