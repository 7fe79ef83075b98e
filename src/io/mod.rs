/*!
# IO utilities

Reading raw corpora ([source]) and writing aligned prompt/text streams ([sink]).
!*/
mod lines;
pub mod sink;
pub mod source;

pub use lines::count_lines;
pub use sink::{Entry, JsonlSink, MemorySink, Sink, SinkPair};
pub use source::RecordSource;
