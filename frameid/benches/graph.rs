//! グラフ処理のベンチマーク
//!
//! 全ノード対のパス計算と、文脈ベクトルの抽出速度を計測します。

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use frameid::corpus::Corpus;
use frameid::embedding::EmbeddingStore;
use frameid::lexicon::Lexicon;
use frameid::mapper::{FeatureMapper, MapperKind};

const PARSES: &str = include_str!("../src/tests/resources/toy.all.lemma.tags");
const FRAME_ELEMENTS: &str = include_str!("../src/tests/resources/toy.frame.elements");
const EMBEDDINGS: &str = include_str!("../src/tests/resources/toy_embeddings");

fn bench_graph(c: &mut Criterion) {
    let corpus = Corpus::from_readers(PARSES.as_bytes(), FRAME_ELEMENTS.as_bytes(), "toy")
        .expect("Failed to load the corpus");
    let lexicon = Lexicon::load_from_training_graphs(corpus.iter());
    let embeddings = EmbeddingStore::from_reader(EMBEDDINGS.as_bytes(), "toy")
        .expect("Failed to load the embeddings");

    let mut group = c.benchmark_group("graph");
    group.throughput(Throughput::Elements(corpus.len() as u64));

    group.bench_function("path_map", |b| {
        b.iter(|| {
            for g in corpus.iter() {
                criterion::black_box(g.path_map());
            }
        });
    });

    for kind in [MapperKind::SentenceContext, MapperKind::DependentsContext] {
        let mapper = FeatureMapper::new(kind, &embeddings, &lexicon);
        group.bench_function(BenchmarkId::new("get_matrix", kind), |b| {
            b.iter(|| criterion::black_box(mapper.get_matrix(corpus.iter())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_graph);
criterion_main!(benches);
