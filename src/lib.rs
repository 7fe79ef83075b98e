/*! # corpus-pairs

Conversion of raw, heterogeneous JSON-lines corpora into two aligned streams,
prompts and texts, ready for language model training.

A corpus is picked by name in a [corpora::Registry], its records are read by an
[io::RecordSource], turned into pairs by an [extraction::ExtractionRule] in a pool of workers,
and written to a [io::SinkPair] by a single aggregator (see [pipeline]).
!*/
pub mod check;
pub mod corpora;
pub mod error;
pub mod extraction;
pub mod io;
pub mod pipeline;
pub mod progress;
pub mod sample;
pub mod tokenizer;
