//! # ミドルウェア
//!
//! Account API 用のミドルウェアを提供する。

mod auth_gate;

pub use auth_gate::{AuthGateState, CurrentIdentity, Identity, authenticate, require_auth};
