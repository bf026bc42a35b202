//! # Account API 設定
//!
//! 環境変数から Account API サーバーの設定を読み込む。

use std::{env, fmt};

use thiserror::Error;

use crate::token::ISSUER;

/// トークン有効期間のデフォルト（時間）
const DEFAULT_JWT_TTL_HOURS: i64 = 24;

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
   #[error("{0} が設定されていません")]
   Missing(&'static str),

   #[error("{name} の値が不正です: {value}")]
   Invalid { name: &'static str, value: String },
}

/// Account API サーバーの設定
#[derive(Debug, Clone)]
pub struct AccountConfig {
   /// バインドアドレス
   pub host: String,
   /// ポート番号
   pub port: u16,
   /// トークン設定
   pub jwt:  JwtConfig,
}

/// トークン設定
#[derive(Clone)]
pub struct JwtConfig {
   /// 署名鍵
   pub secret:    String,
   /// 有効期間（時間）
   pub ttl_hours: i64,
   /// 発行者
   pub issuer:    String,
}

impl fmt::Debug for JwtConfig {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("JwtConfig")
         .field("secret", &crate::redact::MASK)
         .field("ttl_hours", &self.ttl_hours)
         .field("issuer", &self.issuer)
         .finish()
   }
}

impl AccountConfig {
   /// 環境変数から設定を読み込む
   ///
   /// | 変数名 | 必須 | デフォルト |
   /// |--------|------|-----------|
   /// | `ACCOUNT_HOST` | No | `0.0.0.0` |
   /// | `ACCOUNT_PORT` | No | `8080` |
   /// | `JWT_SECRET` | **Yes** | - |
   /// | `JWT_TTL_HOURS` | No | `24` |
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|name| env::var(name).ok())
   }

   /// 任意の参照関数から設定を読み込む
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let port = match lookup("ACCOUNT_PORT") {
         Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name: "ACCOUNT_PORT",
            value,
         })?,
         None => 8080,
      };

      let secret = lookup("JWT_SECRET")
         .filter(|secret| !secret.is_empty())
         .ok_or(ConfigError::Missing("JWT_SECRET"))?;

      let ttl_hours = match lookup("JWT_TTL_HOURS") {
         Some(value) => match value.parse::<i64>() {
            Ok(hours) if hours > 0 => hours,
            _ => {
               return Err(ConfigError::Invalid {
                  name: "JWT_TTL_HOURS",
                  value,
               });
            }
         },
         None => DEFAULT_JWT_TTL_HOURS,
      };

      Ok(Self {
         host: lookup("ACCOUNT_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
         port,
         jwt: JwtConfig {
            secret,
            ttl_hours,
            issuer: ISSUER.to_string(),
         },
      })
   }
}
