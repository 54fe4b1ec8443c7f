//! Bidi Guard Benchmarks
//!
//! Tokenizer, scanner and end-to-end throughput.
//! Run with: cargo bench -p bidi-benchmarks

// Cargo needs a lib target; the benchmarks live in benches/.
