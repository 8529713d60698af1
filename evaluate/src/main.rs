//! フレーム同定の精度を評価するユーティリティ
//!
//! このバイナリは、一つの実験設定で学習コーパスから分類器を学習し、
//! 評価コーパスごとに予測結果と正解率の集計を報告ファイルに書き出します。
//! 集計は全インスタンス、動詞のみ、辞書にある lemma のみの三通りです。

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use thiserror::Error;

use frameid::classifier::{Classifier, ClassifierKind};
use frameid::config::ExperimentConfig;
use frameid::corpus::Corpus;
use frameid::embedding::EmbeddingStore;
use frameid::errors::FrameIdError;
use frameid::evaluation::Score;
use frameid::lexicon::Lexicon;
use frameid::mapper::{FeatureMapper, MapperKind};
use frameid::report::{self, ResultReporter, SummaryReporter};
use frameid::resources::ResourceLayout;

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "evaluate", about = "Train a frame identifier and evaluate its accuracy")]
struct Args {
    /// Resource root containing `srl_data/` and `out/`.
    #[clap(short = 'r', long)]
    root: PathBuf,

    /// Training corpus name under `srl_data/corpora/`.
    #[clap(short = 't', long)]
    train: String,

    /// Test corpus names under `srl_data/corpora/`.
    ///
    /// Specify comma-separated names.
    #[clap(short = 'e', long, value_delimiter(','), required = true)]
    test: Vec<String>,

    /// Classifier: lemma-baseline, lexicon-baseline, ranking or feedforward.
    #[clap(short = 'c', long)]
    classifier: ClassifierKind,

    /// Feature mapper: dummy, sentence or dependents.
    #[clap(short = 'f', long, default_value = "dummy")]
    mapper: MapperKind,

    /// Lexicon list under `srl_data/lexicons/`. If omitted, the lexicon is built from the
    /// training corpus.
    #[clap(short = 'l', long)]
    lexicon: Option<String>,

    /// Embeddings under `srl_data/embeddings/`. Required unless the mapper is dummy.
    #[clap(short = 'v', long)]
    embeddings: Option<String>,

    /// Average the embeddings of all predicate words instead of using the head word.
    #[clap(long)]
    multiword_averaging: bool,

    /// Treat every lemma as unknown to the lexicon.
    #[clap(long)]
    all_unknown: bool,

    /// Number of latent components of the ranking model.
    #[clap(long)]
    num_components: Option<usize>,

    /// Maximum number of negative samples per positive of the ranking model.
    #[clap(long)]
    max_sampled: Option<usize>,

    /// Number of training epochs.
    #[clap(long)]
    num_epochs: Option<usize>,

    /// Random seed.
    #[clap(long, default_value = "4")]
    seed: u64,

    /// Report directory. Defaults to `out/` under the resource root.
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,
}

/// 評価中に発生する可能性のあるエラー
#[derive(Debug, Error)]
enum EvaluateError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 読み込み、学習、予測のエラー
    #[error(transparent)]
    FrameId(#[from] FrameIdError),

    /// 埋め込みが指定されていない
    #[error("the {0} mapper needs embeddings (--embeddings)")]
    MissingEmbeddings(MapperKind),
}

/// 引数から実験設定を作成する
fn experiment_config(args: &Args) -> ExperimentConfig {
    let mut config = ExperimentConfig::new(args.classifier, args.mapper)
        .lexicon(args.lexicon.clone())
        .embeddings(args.embeddings.clone())
        .multiword_averaging(args.multiword_averaging)
        .all_unknown(args.all_unknown)
        .seed(args.seed);
    if let Some(n) = args.num_components {
        config = config.num_components(n);
    }
    if let Some(n) = args.max_sampled {
        config = config.max_sampled(n);
    }
    if let Some(n) = args.num_epochs {
        config = config.num_epochs(n);
    }
    config
}

fn create(dir: &Path, name: &str) -> Result<BufWriter<File>, EvaluateError> {
    Ok(BufWriter::new(File::create(dir.join(name))?))
}

fn load_corpus(layout: &ResourceLayout, name: &str) -> Result<Corpus, EvaluateError> {
    let (parses, frame_elements) = layout.corpus(name);
    Ok(Corpus::from_paths(parses, frame_elements)?)
}

/// 同じ設定の三通りの集計
struct Summaries {
    all: SummaryReporter<BufWriter<File>>,
    verbs: SummaryReporter<BufWriter<File>>,
    known: SummaryReporter<BufWriter<File>>,
}

impl Summaries {
    fn create(dir: &Path) -> Result<Self, EvaluateError> {
        Ok(Self {
            all: SummaryReporter::new(create(dir, "summary")?)?,
            verbs: SummaryReporter::new(create(dir, "summary_v")?)?,
            known: SummaryReporter::new(create(dir, "summary_known")?)?,
        })
    }

    fn finish(self) -> Result<(), EvaluateError> {
        for reporter in [self.all, self.verbs, self.known] {
            reporter.into_inner().flush()?;
        }
        Ok(())
    }
}

/// 評価コーパス一つ分の予測と報告を行う
#[allow(clippy::too_many_arguments)]
fn evaluate(
    args: &Args,
    config: &ExperimentConfig,
    layout: &ResourceLayout,
    out: &Path,
    clf: &Classifier,
    mapper: &FeatureMapper,
    lexicon: &Lexicon,
    test: &str,
    summaries: &mut Summaries,
) -> Result<(), EvaluateError> {
    let start = Instant::now();
    let corpus = load_corpus(layout, test)?;
    let mut wtr = create(out, &format!("{test}.conll"))?;
    report::write_corpus(&mut wtr, corpus.iter())?;
    wtr.flush()?;
    let matrix = mapper.get_matrix(corpus.iter());

    let mut results = ResultReporter::new(create(
        out,
        &format!("results_{}_{test}_{config}", args.train),
    )?)?;
    let mut score = Score::new();
    let mut score_verbs = Score::new();
    let mut score_known = Score::new();
    let graphs = corpus.iter().filter(|g| g.predicate().is_some());
    for (i, graph) in graphs.enumerate() {
        let lemmapos = matrix.lemmapos[i].as_str();
        let gold = matrix.labels[i];
        let predicted = clf.predict(&matrix.rows[i], lemmapos)?;
        let correct = Some(predicted) == gold;
        let ambiguous = lexicon.is_ambiguous(lemmapos);
        let unknown = lexicon.is_unknown(lemmapos);

        score.consume(correct, ambiguous, unknown, gold);
        if lemmapos.ends_with(".v") {
            score_verbs.consume(correct, ambiguous, unknown, gold);
        }
        if !unknown {
            score_known.consume(correct, ambiguous, unknown, gold);
        }
        results.report(graph, lemmapos, predicted, gold, lexicon)?;
    }
    results.into_inner().flush()?;

    let elapsed = start.elapsed();
    summaries.all.report(&args.train, test, config, &score, elapsed)?;
    summaries.verbs.report(&args.train, test, config, &score_verbs, elapsed)?;
    summaries.known.report(&args.train, test, config, &score_known, elapsed)?;
    tracing::info!(
        test,
        total = score.total,
        accuracy = score.accuracy(),
        ambiguous_accuracy = score.ambiguous_accuracy(),
        unknown_accuracy = score.unknown_accuracy(),
        "evaluated"
    );
    Ok(())
}

/// ログ出力を初期化する
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// メイン関数
///
/// 学習コーパスから辞書、素性、分類器を準備し、評価コーパスごとに予測して
/// 報告ファイルを書き出します。
///
/// # 戻り値
///
/// 実行が成功した場合は `Ok(())`、エラーが発生した場合はエラー情報
fn main() -> Result<(), EvaluateError> {
    init_logging();
    let args = Args::parse();

    let config = experiment_config(&args);
    let layout = ResourceLayout::new(&args.root);
    let out = args.out.clone().unwrap_or_else(|| layout.out());
    fs::create_dir_all(&out)?;
    tracing::info!(%config, out = %out.display(), "starting");

    let train = load_corpus(&layout, &args.train)?;
    let mut wtr = create(&out, "train.conll")?;
    report::write_corpus(&mut wtr, train.iter())?;
    wtr.flush()?;

    let lexicon = match layout.lexicon(config.lexicon_name()) {
        Some(path) => Lexicon::load_from_list_file(path)?,
        None => Lexicon::load_from_training_graphs(train.iter()),
    };
    let mut wtr = create(&out, &format!("lexicon_{}", config.lexicon_name().unwrap_or("NA")))?;
    report::write_lexicon(&mut wtr, &lexicon)?;
    wtr.flush()?;

    let embeddings = match layout.embeddings(config.embeddings_name()) {
        Some(path) => EmbeddingStore::from_path(path)?,
        None if config.mapper_kind() == MapperKind::Dummy => EmbeddingStore::empty(),
        None => return Err(EvaluateError::MissingEmbeddings(config.mapper_kind())),
    };
    let mapper = FeatureMapper::new(config.mapper_kind(), &embeddings, &lexicon)
        .multiword_averaging(config.is_multiword_averaging());

    let matrix = mapper.get_matrix(train.iter());
    let mut clf = Classifier::new(&lexicon, config.classifier_config());
    clf.train(&matrix.rows, &matrix.labels, &matrix.lemmapos)?;

    let mut summaries = Summaries::create(&out)?;
    for test in &args.test {
        evaluate(
            &args,
            &config,
            &layout,
            &out,
            &clf,
            &mapper,
            &lexicon,
            test,
            &mut summaries,
        )?;
    }
    summaries.finish()?;

    Ok(())
}
