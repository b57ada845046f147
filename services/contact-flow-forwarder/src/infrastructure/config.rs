/// Event Forwarder設定
///
/// 転送先Kinesisストリーム名を環境変数から読み込む。
/// AWS認証情報とリージョンはaws-configのデフォルトチェーンで解決する。
use thiserror::Error;

/// 転送先ストリーム名の環境変数
pub const STREAM_NAME_ENV: &str = "STREAM_NAME";

/// 設定のエラー型
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForwarderConfigError {
    #[error("環境変数が設定されていません: {0}")]
    MissingEnvVar(String),
    #[error("環境変数が空です: {0}")]
    EmptyEnvVar(String),
}

/// Event Forwarder設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwarderConfig {
    /// 転送先Kinesisストリーム名
    stream_name: String,
}

impl ForwarderConfig {
    /// 明示的な値で設定を作成
    pub fn new(stream_name: impl Into<String>) -> Self {
        Self {
            stream_name: stream_name.into(),
        }
    }

    /// 環境変数から設定を読み込む
    ///
    /// # 環境変数
    /// - `STREAM_NAME`: 転送先Kinesisストリーム名（必須）
    ///
    /// # エラー
    /// 未設定または空文字の場合はエラーを返す
    pub fn from_env() -> Result<Self, ForwarderConfigError> {
        let stream_name = std::env::var(STREAM_NAME_ENV)
            .map_err(|_| ForwarderConfigError::MissingEnvVar(STREAM_NAME_ENV.to_string()))?;

        if stream_name.trim().is_empty() {
            return Err(ForwarderConfigError::EmptyEnvVar(STREAM_NAME_ENV.to_string()));
        }

        Ok(Self { stream_name })
    }

    /// 転送先ストリーム名を取得
    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }
}
