/// イベント転送ハンドラー
///
/// 受信したイベントをJSON文字列化し、固定パーティションキーで
/// Kinesisストリームに1件送信する。
/// 検証・変換・再試行は行わず、失敗はそのまま呼び出し元に返す。
/// 失敗のログは発生箇所で1度だけ出力する（送信失敗はKinesis操作側）。
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{ContactFlowSummary, StreamRecord, StreamRecordError};
use crate::infrastructure::{ForwarderConfig, KinesisOps, KinesisOpsError, PutRecordResult};

/// イベント転送のエラー型
#[derive(Debug, Error)]
pub enum ForwardError {
    /// イベントをシリアライズできない（送信は行われていない）
    #[error(transparent)]
    Serialize(#[from] StreamRecordError),
    /// PutRecordの呼び出しに失敗
    #[error(transparent)]
    Publish(#[from] KinesisOpsError),
}

/// イベントをKinesisストリームに転送するハンドラー
///
/// クライアントと設定はプロセス起動時に1度だけ作成し、
/// 以降の呼び出しで使い回す。
pub struct EventForwarder<K>
where
    K: KinesisOps,
{
    /// Kinesis操作
    kinesis: K,
    /// 設定
    config: ForwarderConfig,
}

impl<K> EventForwarder<K>
where
    K: KinesisOps,
{
    /// 新しいEventForwarderを作成
    pub fn new(kinesis: K, config: ForwarderConfig) -> Self {
        Self { kinesis, config }
    }

    /// 転送先ストリーム名を取得
    pub fn stream_name(&self) -> &str {
        self.config.stream_name()
    }

    /// 任意のシリアライズ可能な値を転送する
    ///
    /// # 処理フロー
    /// 1. イベントをJSON文字列にシリアライズ
    /// 2. 固定パーティションキーと設定済みストリーム名でレコードを作成
    /// 3. PutRecordを1回呼び出し、応答を待つ
    ///
    /// # 戻り値
    /// * `Ok(PutRecordResult)` - Kinesisの応答（シャードID、シーケンス番号）
    /// * `Err(ForwardError)` - シリアライズ失敗、またはPutRecord失敗
    pub async fn forward<T>(&self, event: &T) -> Result<PutRecordResult, ForwardError>
    where
        T: Serialize + ?Sized,
    {
        let record = StreamRecord::from_event(event, self.config.stream_name())
            .inspect_err(|err| warn!(error = %err, "イベントのシリアライズに失敗"))?;

        debug!(
            stream_name = %record.stream_name(),
            partition_key = %record.partition_key(),
            data_len = record.data_len(),
            "PutRecord送信"
        );

        Ok(self.kinesis.put_record(&record).await?)
    }

    /// Lambdaから受け取ったイベントを転送する
    ///
    /// `forward`にコンタクトフローイベントの要約ログを加えたもの。
    /// 要約はログ用のみで、送信内容には影響しない。
    pub async fn forward_event(&self, event: &Value) -> Result<PutRecordResult, ForwardError> {
        let summary = ContactFlowSummary::from_event(event);

        info!(
            stream_name = %self.config.stream_name(),
            contact_id = summary.contact_id.as_deref().unwrap_or("(unknown)"),
            video_stream_name = summary.video_stream_name.as_deref().unwrap_or("(none)"),
            start_timestamp = ?summary.start_timestamp,
            "コンタクトフローイベントを受信"
        );

        // 下流の受信側はStreamARNの無いレコードを読み飛ばす
        if !summary.has_audio_stream() {
            debug!(
                contact_id = summary.contact_id.as_deref().unwrap_or("(unknown)"),
                "音声ストリームARNが含まれていません（そのまま転送）"
            );
        }

        let result = self.forward(event).await?;

        info!(
            contact_id = summary.contact_id.as_deref().unwrap_or("(unknown)"),
            shard_id = %result.shard_id,
            sequence_number = %result.sequence_number,
            "イベント転送完了"
        );

        Ok(result)
    }
}
