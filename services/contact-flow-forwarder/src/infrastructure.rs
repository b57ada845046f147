// Infrastructure layer modules
pub mod config;
pub mod kinesis_ops;
pub mod logging;

// Re-exports
pub use config::{ForwarderConfig, ForwarderConfigError, STREAM_NAME_ENV};
pub use kinesis_ops::{AwsKinesisOps, KinesisOps, KinesisOpsError, PutRecordResult};
pub use logging::init_logging;
#[cfg(test)]
pub use logging::init_test_logging;
