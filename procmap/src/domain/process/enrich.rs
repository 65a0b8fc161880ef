//! Process identity enrichment
//!
//! Copies process identity from resource attributes onto an emitted data
//! point. Zero or empty source values are never written.

use opentelemetry_proto::tonic::common::v1::KeyValue;

use crate::utils::otlp::{get_int, get_str, put_int, put_str};

/// Resource attribute keys read, and the data point keys they are written to
pub mod keys {
    pub const RESOURCE_PARENT_PID: &str = "process.parent_pid";
    pub const RESOURCE_OWNER: &str = "process.owner";
    pub const RESOURCE_EXECUTABLE_PATH: &str = "process.executable.path";
    pub const RESOURCE_EXECUTABLE_NAME: &str = "process.executable.name";

    pub const PARENT_PID: &str = "process.parent.pid";
    pub const USER_NAME: &str = "user.name";
    pub const EXECUTABLE: &str = "process.executable";
    pub const NAME: &str = "process.name";
}

const STRING_MAPPINGS: [(&str, &str); 3] = [
    (keys::RESOURCE_OWNER, keys::USER_NAME),
    (keys::RESOURCE_EXECUTABLE_PATH, keys::EXECUTABLE),
    (keys::RESOURCE_EXECUTABLE_NAME, keys::NAME),
];

/// Copy process identity attributes from `resource` onto `target`
pub fn enrich_process_attributes(resource: &[KeyValue], target: &mut Vec<KeyValue>) {
    if let Some(ppid) = get_int(resource, keys::RESOURCE_PARENT_PID)
        && ppid != 0
    {
        put_int(target, keys::PARENT_PID, ppid);
    }

    for (source, dest) in STRING_MAPPINGS {
        if let Some(value) = get_str(resource, source)
            && !value.is_empty()
        {
            put_str(target, dest, value);
        }
    }
}
