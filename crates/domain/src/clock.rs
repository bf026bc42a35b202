//! # Clock（時刻プロバイダ）
//!
//! トークンの発行・検証やユースケースでの `Utc::now()` 直接呼び出しを置き換え、
//! テストで時刻を注入・前進させるための抽象化。

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;
}

/// 実際のシステム時刻を返す実装
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 手動で進める時計（テスト用）
///
/// 生成時の時刻で止まっており、[`advance`](ManualClock::advance) で明示的に進める。
/// トークン期限切れのような時間依存の振る舞いを決定的に検証するために使う。
#[derive(Debug)]
pub struct ManualClock {
   now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self {
         now: RwLock::new(now),
      }
   }

   /// 時刻を `duration` だけ進める
   pub fn advance(&self, duration: Duration) {
      let mut now = self.now.write().unwrap_or_else(PoisonError::into_inner);
      *now += duration;
   }

   /// 時刻を指定値に設定する
   pub fn set(&self, value: DateTime<Utc>) {
      *self.now.write().unwrap_or_else(PoisonError::into_inner) = value;
   }
}

impl Clock for ManualClock {
   fn now(&self) -> DateTime<Utc> {
      *self.now.read().unwrap_or_else(PoisonError::into_inner)
   }
}
