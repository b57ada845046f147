/// Amazon Connect コンタクトフローイベントの要約
///
/// 転送対象イベントからログ用のコンテキスト情報を取り出す。
/// 取り出しはベストエフォートで、欠落している項目は`None`となる。
/// イベント本体の検証や変換は行わない。
use chrono::{DateTime, Utc};
use serde_json::Value;

/// ログ出力用のコンタクトフローイベント要約
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFlowSummary {
    /// コンタクトID
    pub contact_id: Option<String>,
    /// 顧客音声のKinesis Video StreamsストリームARN
    pub audio_stream_arn: Option<String>,
    /// ストリームARNから取り出したKinesis Video Streamsストリーム名
    pub video_stream_name: Option<String>,
    /// 音声ストリームの開始時刻
    pub start_timestamp: Option<DateTime<Utc>>,
}

impl ContactFlowSummary {
    /// イベントJSONから要約を作成する
    ///
    /// 参照するパス:
    /// - `Details.ContactData.ContactId`（無ければトップレベルの`contactId`）
    /// - `Details.ContactData.MediaStreams.Customer.Audio.StreamARN`
    /// - `Details.ContactData.MediaStreams.Customer.Audio.StartTimestamp`（エポックミリ秒）
    pub fn from_event(event: &Value) -> Self {
        let contact_data = event.pointer("/Details/ContactData");

        let contact_id = contact_data
            .and_then(|data| data.get("ContactId"))
            .or_else(|| event.get("contactId"))
            .and_then(non_empty_str)
            .map(str::to_string);

        let audio = event.pointer("/Details/ContactData/MediaStreams/Customer/Audio");

        let audio_stream_arn = audio
            .and_then(|a| a.get("StreamARN"))
            .and_then(non_empty_str)
            .map(str::to_string);

        let video_stream_name = audio_stream_arn
            .as_deref()
            .and_then(video_stream_name_from_arn)
            .map(str::to_string);

        let start_timestamp = audio
            .and_then(|a| a.get("StartTimestamp"))
            .and_then(epoch_millis)
            .and_then(DateTime::<Utc>::from_timestamp_millis);

        Self {
            contact_id,
            audio_stream_arn,
            video_stream_name,
            start_timestamp,
        }
    }

    /// 音声ストリーム情報を含むかどうか
    pub fn has_audio_stream(&self) -> bool {
        self.audio_stream_arn.is_some()
    }
}

/// Kinesis Video StreamsのARNからストリーム名を取り出す
///
/// ARNの書式: `arn:aws:kinesisvideo:region:account-id:stream/stream-name/code`
/// スラッシュ区切りの2番目の要素がストリーム名。
pub fn video_stream_name_from_arn(arn: &str) -> Option<&str> {
    arn.split('/').nth(1).filter(|name| !name.is_empty())
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

// Connectは数値と数値文字列のどちらでも送ってくる
fn epoch_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
