pub mod document_writer;
pub mod llm_service;
pub mod run_log;

pub use document_writer::DocumentWriter;
pub use llm_service::LlmService;
pub use run_log::RunLog;
