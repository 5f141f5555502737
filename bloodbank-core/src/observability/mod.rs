pub mod logging;
pub mod trace_context;

pub use logging::init_tracing;
pub use trace_context::{inject_trace_headers, REQUEST_ID_HEADER};
