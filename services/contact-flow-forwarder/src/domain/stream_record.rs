/// Kinesisストリームレコード
///
/// 受信したイベントをJSON文字列化し、固定パーティションキーと
/// 送信先ストリーム名を組み合わせたPutRecordの送信単位を表す。
use serde::Serialize;
use thiserror::Error;

/// 全レコード共通のパーティションキー
///
/// シャード数が1固定であることを前提とした固定値。
/// ストリームをリシャードしても全レコードが同一シャードに送られる。
pub const PARTITION_KEY: &str = "SendContactFlowEventKey";

/// ストリームレコード生成のエラー型
#[derive(Debug, Error)]
pub enum StreamRecordError {
    /// イベントをJSONに変換できない
    #[error("イベントのJSONシリアライズに失敗しました: {0}")]
    SerializeError(String),
}

/// PutRecordで送信する1件分のレコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    /// シリアライズ済みイベント（JSON文字列）
    data: String,
    /// パーティションキー（常に`PARTITION_KEY`）
    partition_key: &'static str,
    /// 送信先ストリーム名
    stream_name: String,
}

impl StreamRecord {
    /// イベントをシリアライズしてレコードを作成する
    ///
    /// # 引数
    /// * `event` - 任意のシリアライズ可能な値
    /// * `stream_name` - 送信先ストリーム名
    ///
    /// # 戻り値
    /// * `Ok(StreamRecord)` - 作成されたレコード
    /// * `Err(StreamRecordError)` - シリアライズ失敗
    pub fn from_event<T: Serialize + ?Sized>(
        event: &T,
        stream_name: impl Into<String>,
    ) -> Result<Self, StreamRecordError> {
        let data = serde_json::to_string(event)
            .map_err(|e| StreamRecordError::SerializeError(e.to_string()))?;

        Ok(Self {
            data,
            partition_key: PARTITION_KEY,
            stream_name: stream_name.into(),
        })
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn partition_key(&self) -> &str {
        self.partition_key
    }

    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    /// データ部のバイト長
    pub fn data_len(&self) -> usize {
        self.data.len()
    }
}
