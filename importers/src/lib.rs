pub mod linkedin_csv;

pub use linkedin_csv::{
    parse_connections, validate_upload, ConnectionRecord, FORWARD_FILENAME, MAX_UPLOAD_BYTES,
};
