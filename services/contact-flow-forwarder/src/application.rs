// アプリケーション層モジュール
pub mod event_forwarder;

// 再エクスポート
pub use event_forwarder::{EventForwarder, ForwardError};
