/// SendContactFlowEvent Lambda関数
///
/// Amazon Connectのコンタクトフローから呼び出され、受け取ったイベントを
/// そのままJSON文字列化してKinesis Data Streamsに1件送信する。
///
/// 環境変数:
/// - STREAM_NAME: 送信先Kinesisストリーム名（必須）
/// - RUST_LOG: ログレベル（省略時info）
use contact_flow_forwarder::application::EventForwarder;
use contact_flow_forwarder::infrastructure::{
    AwsKinesisOps, ForwarderConfig, PutRecordResult, init_logging,
};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{Instrument, error, info, info_span};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    // 設定とクライアントはコールドスタート時に1度だけ作成する
    let config = ForwarderConfig::from_env().inspect_err(|err| {
        error!(error = %err, "設定読み込み失敗");
    })?;
    let kinesis = AwsKinesisOps::from_config().await;

    info!(stream_name = config.stream_name(), "SendContactFlowEvent初期化完了");

    let forwarder = EventForwarder::new(kinesis, config);
    let forwarder = &forwarder;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(forwarder, event).await
    }))
    .await
}

/// Lambda関数のメインハンドラー
///
/// 失敗時はエラーを返し、呼び出し全体を失敗させる（再試行はランタイム側の設定に任せる）。
async fn handler(
    forwarder: &EventForwarder<AwsKinesisOps>,
    event: LambdaEvent<Value>,
) -> Result<PutRecordResult, Error> {
    let (payload, context) = event.into_parts();
    let span = info_span!("send_contact_flow_event", request_id = %context.request_id);

    let result = forwarder.forward_event(&payload).instrument(span).await?;
    Ok(result)
}
