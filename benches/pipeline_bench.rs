use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use corpus_pairs::corpora::CorpusDescriptor;
use corpus_pairs::extraction::{ExtractionRule, Zhidao};
use corpus_pairs::io::{MemorySink, SinkPair};
use corpus_pairs::pipeline::{Conversion, PipelineConfigBuilder};
use corpus_pairs::progress::NoProgress;
use serde_json::json;

const NB_RECORDS: usize = 5_000;
// bench protocol:
//
// One file of NB_RECORDS zhidao records (1 best answer + 2 long answers each),
// converted with an increasing number of workers.

fn write_corpus(path: &std::path::Path) {
    let lines: Vec<String> = (0..NB_RECORDS)
        .map(|id| {
            json!({
                "title": format!("question {}", id),
                "content": "context ".repeat(30),
                "best_answer": {"content": format!("best answer to question {}", id)},
                "other_answers": [
                    {"content": "long answer ".repeat(20)},
                    {"content": "another long answer ".repeat(10)},
                ],
            })
            .to_string()
        })
        .collect();
    std::fs::write(path, lines.join("\n")).unwrap();
}

fn convert(descriptor: &CorpusDescriptor, workers: usize) {
    let config = PipelineConfigBuilder::default()
        .workers(workers)
        .build()
        .unwrap();
    let mut sinks = SinkPair::new(MemorySink::default(), MemorySink::default());
    Conversion::new(descriptor.clone(), config)
        .run_with(&mut sinks, &NoProgress)
        .unwrap();
}

fn bench_workers(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zhidao.jsonl");
    write_corpus(&path);
    let descriptor = CorpusDescriptor::new(&path, ExtractionRule::Zhidao(Zhidao::default()));

    let mut group = c.benchmark_group("Conversion");
    for workers in [1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::new("workers", workers), &workers, |b, w| {
            b.iter(|| convert(&descriptor, *w))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_workers);
criterion_main!(benches);
