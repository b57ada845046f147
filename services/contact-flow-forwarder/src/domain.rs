// Domain layer modules
pub mod contact_flow_event;
pub mod stream_record;

// Re-exports
pub use contact_flow_event::{ContactFlowSummary, video_stream_name_from_arn};
pub use stream_record::{PARTITION_KEY, StreamRecord, StreamRecordError};
