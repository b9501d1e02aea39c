pub mod record_writer;

pub use record_writer::{output_path_for, RecordWriter, WriteSummary, WriterOptions};
