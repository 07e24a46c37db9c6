// Pipeline monitoring module
// Stage tracing for conversion runs

pub mod trace;

pub use trace::{
    read_trace_file, summarize_notes, ConversionStage, TraceBuilder, TraceEntry, TraceError,
    TraceResult, TraceWriter,
};
