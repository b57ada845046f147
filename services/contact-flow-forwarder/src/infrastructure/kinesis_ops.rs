//! Kinesis Data Streams操作モジュール
//!
//! ストリームレコードをPutRecordで1件送信する機能を提供する。
//! SDKの自動再試行は無効化し、1回の呼び出しにつきリクエストは1回のみ。
//! 失敗はサービスのエラーコードを保持したまま呼び出し元に返す。

use async_trait::async_trait;
use aws_sdk_kinesis::Client as KinesisClient;
use aws_sdk_kinesis::config::Builder as KinesisConfigBuilder;
use aws_sdk_kinesis::config::retry::RetryConfig;
use aws_sdk_kinesis::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_kinesis::primitives::Blob;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::StreamRecord;

/// Kinesis操作のエラー型
#[derive(Debug, Error)]
pub enum KinesisOpsError {
    /// AWS SDK エラー（ネットワーク、認可、スロットリング、ストリーム未存在など）
    #[error("AWS Kinesis APIエラー: {message}")]
    AwsSdkError {
        /// サービスのエラーコード（例: `ResourceNotFoundException`）。通信エラー時は`None`
        code: Option<String>,
        /// エラー詳細
        message: String,
    },
}

impl KinesisOpsError {
    /// エラーコードなしのエラーを作成
    pub fn sdk(message: impl Into<String>) -> Self {
        Self::AwsSdkError {
            code: None,
            message: message.into(),
        }
    }

    /// サービスのエラーコードを取得
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::AwsSdkError { code, .. } => code.as_deref(),
        }
    }
}

/// PutRecordの応答
///
/// Lambdaの戻り値としてそのまま返すため、Kinesis APIと同じフィールド名で
/// シリアライズする。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRecordResult {
    /// 書き込まれたシャードID
    pub shard_id: String,
    /// 割り当てられたシーケンス番号
    pub sequence_number: String,
    /// サーバーサイド暗号化の種別（`NONE` / `KMS`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_type: Option<String>,
}

/// Kinesis操作トレイト（テスト用の抽象化）
#[async_trait]
pub trait KinesisOps: Send + Sync {
    /// レコードを1件ストリームに送信する
    ///
    /// # 引数
    /// * `record` - 送信するストリームレコード
    ///
    /// # 戻り値
    /// * `Ok(PutRecordResult)` - 送信結果
    /// * `Err(KinesisOpsError)` - エラー
    async fn put_record(&self, record: &StreamRecord) -> Result<PutRecordResult, KinesisOpsError>;
}

/// 実際のAWS Kinesis SDKを使用したKinesis操作実装
#[derive(Debug, Clone)]
pub struct AwsKinesisOps {
    client: KinesisClient,
}

impl AwsKinesisOps {
    /// 新しいAwsKinesisOpsを作成
    pub fn new(client: KinesisClient) -> Self {
        Self { client }
    }

    /// AWS設定からデフォルトのクライアントを作成
    pub async fn from_config() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = KinesisClient::new(&config);
        Self::new(client)
    }
}

#[async_trait]
impl KinesisOps for AwsKinesisOps {
    async fn put_record(&self, record: &StreamRecord) -> Result<PutRecordResult, KinesisOpsError> {
        let result = self
            .client
            .put_record()
            .stream_name(record.stream_name())
            .partition_key(record.partition_key())
            .data(Blob::new(record.data().as_bytes().to_vec()))
            .customize()
            .config_override(
                KinesisConfigBuilder::default().retry_config(RetryConfig::disabled()),
            )
            .send()
            .await;

        match result {
            Ok(output) => {
                let result = PutRecordResult {
                    shard_id: output.shard_id().to_string(),
                    sequence_number: output.sequence_number().to_string(),
                    encryption_type: output.encryption_type().map(|e| e.as_str().to_string()),
                };

                info!(
                    stream_name = %record.stream_name(),
                    shard_id = %result.shard_id,
                    sequence_number = %result.sequence_number,
                    "Kinesis PutRecord成功"
                );

                Ok(result)
            }
            Err(err) => {
                let code = err.code().map(str::to_string);
                let message = DisplayErrorContext(&err).to_string();
                warn!(
                    stream_name = %record.stream_name(),
                    error_code = code.as_deref().unwrap_or("(none)"),
                    error = %message,
                    "Kinesis PutRecordエラー"
                );
                Err(KinesisOpsError::AwsSdkError { code, message })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_kinesis::error::ErrorMetadata;
    use aws_sdk_kinesis::operation::put_record::{PutRecordError, PutRecordOutput};
    use aws_sdk_kinesis::types::EncryptionType;
    use aws_sdk_kinesis::types::error::{
        ProvisionedThroughputExceededException, ResourceNotFoundException,
    };
    use aws_smithy_mocks::{mock, mock_client};
    use serde_json::json;

    const SEQUENCE_NUMBER: &str = "49590338271490256608559692538361571095921575989136588898";
    const CONTACT_DATA: &[u8] = br#"{"contactId":"abc123"}"#;

    fn contact_record() -> StreamRecord {
        StreamRecord::from_event(&json!({"contactId": "abc123"}), "my-stream").unwrap()
    }

    #[test]
    fn test_kinesis_ops_error_display() {
        let error = KinesisOpsError::AwsSdkError {
            code: Some("ResourceNotFoundException".to_string()),
            message: "Stream my-stream not found".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "AWS Kinesis APIエラー: Stream my-stream not found"
        );
        assert_eq!(error.code(), Some("ResourceNotFoundException"));

        let error = KinesisOpsError::sdk("dispatch failure");
        assert_eq!(error.to_string(), "AWS Kinesis APIエラー: dispatch failure");
        assert_eq!(error.code(), None);
    }

    #[test]
    fn test_put_record_result_serializes_like_kinesis_response() {
        let result = PutRecordResult {
            shard_id: "shardId-000000000000".to_string(),
            sequence_number: SEQUENCE_NUMBER.to_string(),
            encryption_type: Some("KMS".to_string()),
        };

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "ShardId": "shardId-000000000000",
                "SequenceNumber": SEQUENCE_NUMBER,
                "EncryptionType": "KMS"
            })
        );
    }

    #[test]
    fn test_put_record_result_omits_missing_encryption_type() {
        let result = PutRecordResult {
            shard_id: "shardId-000000000000".to_string(),
            sequence_number: "1".to_string(),
            encryption_type: None,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("EncryptionType").is_none());

        let decoded: PutRecordResult = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, result);
    }

    #[tokio::test]
    async fn test_aws_put_record_maps_request_and_response() {
        let rule = mock!(KinesisClient::put_record)
            .match_requests(|req| {
                req.stream_name() == Some("my-stream")
                    && req.partition_key() == Some("SendContactFlowEventKey")
                    && req.data().is_some_and(|d| AsRef::<[u8]>::as_ref(d) == CONTACT_DATA)
            })
            .then_output(|| {
                PutRecordOutput::builder()
                    .shard_id("shardId-000000000000")
                    .sequence_number(SEQUENCE_NUMBER)
                    .encryption_type(EncryptionType::Kms)
                    .build()
                    .unwrap()
            });
        let ops = AwsKinesisOps::new(mock_client!(aws_sdk_kinesis, [&rule]));

        let result = ops.put_record(&contact_record()).await.unwrap();

        assert_eq!(rule.num_calls(), 1);
        assert_eq!(
            result,
            PutRecordResult {
                shard_id: "shardId-000000000000".to_string(),
                sequence_number: SEQUENCE_NUMBER.to_string(),
                encryption_type: Some("KMS".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_aws_put_record_service_error_keeps_code() {
        let rule = mock!(KinesisClient::put_record).then_error(|| {
            PutRecordError::ResourceNotFoundException(
                ResourceNotFoundException::builder()
                    .message("Stream my-stream not found")
                    .meta(
                        ErrorMetadata::builder()
                            .code("ResourceNotFoundException")
                            .message("Stream my-stream not found")
                            .build(),
                    )
                    .build(),
            )
        });
        let ops = AwsKinesisOps::new(mock_client!(aws_sdk_kinesis, [&rule]));

        let result = ops.put_record(&contact_record()).await;

        assert_eq!(rule.num_calls(), 1);
        match result {
            Err(error @ KinesisOpsError::AwsSdkError { .. }) => {
                assert_eq!(error.code(), Some("ResourceNotFoundException"));
                assert!(!error.to_string().is_empty());
            }
            other => panic!("Expected AwsSdkError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_aws_put_record_throttling_is_not_retried() {
        let rule = mock!(KinesisClient::put_record).then_error(|| {
            PutRecordError::ProvisionedThroughputExceededException(
                ProvisionedThroughputExceededException::builder()
                    .message("Rate exceeded for shard shardId-000000000000")
                    .meta(
                        ErrorMetadata::builder()
                            .code("ProvisionedThroughputExceededException")
                            .build(),
                    )
                    .build(),
            )
        });
        let ops = AwsKinesisOps::new(mock_client!(aws_sdk_kinesis, [&rule]));

        let result = ops.put_record(&contact_record()).await;

        assert_eq!(rule.num_calls(), 1);
        assert_eq!(
            result.unwrap_err().code(),
            Some("ProvisionedThroughputExceededException")
        );
    }
}
