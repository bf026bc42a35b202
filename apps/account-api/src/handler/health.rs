//! # 疎通確認ハンドラ

use serde::Serialize;

use crate::pipeline::{EmptyRequest, Reply, Success, Typed};

/// 疎通確認レスポンス
#[derive(Debug, Serialize)]
pub struct PingResponse {
   pub message: &'static str,
}

/// GET /ping
pub async fn ping(Typed(_): Typed<EmptyRequest>) -> Reply<PingResponse> {
   Ok(Success::ok(PingResponse { message: "pong" }))
}
