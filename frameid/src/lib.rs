//! # frameid
//!
//! 係り受けグラフ上のフレーム同定（frame identification）の実装です。
//!
//! ## 概要
//!
//! 係り受け解析済みの文と述語（lemma.pos）が与えられたとき、その述語が喚起する
//! 意味フレームを固定のフレーム集合から予測します。予測には lemma から候補フレームへの
//! 辞書と、必要に応じて事前学習済みの単語埋め込みを使います。
//!
//! ## 主な機能
//!
//! - **係り受けグラフ**: 述語項構造の付与、最短経路による関係の問い合わせ
//! - **辞書**: 外部リストまたは学習グラフからの構築、曖昧性と未知語の判定
//! - **素性抽出**: 文全体または述語の係り先と親の平均埋め込み
//! - **分類器**: 頻度ベースライン、ランキング埋め込み、フィードフォワードネットワーク。
//!   辞書にない lemma や曖昧でない lemma では共通の規則で辞書にフォールバックします。
//! - **評価と報告**: 正解率の集計とタブ区切りの報告
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use frameid::classifier::{Classifier, ClassifierConfig, ClassifierKind};
//! use frameid::corpus::Corpus;
//! use frameid::embedding::EmbeddingStore;
//! use frameid::lexicon::Lexicon;
//! use frameid::mapper::{FeatureMapper, MapperKind};
//!
//! let parses = "\
//! 2\tJohn\twalks\tNNP\tVBZ\tnsubj\troot\t2\t0\t_\t_\tjohn\twalk
//! 2\tMary\truns\tNNP\tVBZ\tnsubj\troot\t2\t0\t_\t_\tmary\trun
//! ";
//! let frame_elements = "\
//! 1\t0.5\t0\tSelf_motion\twalk.v\t1\twalks\t0\tSelf_mover\t0
//! 1\t0.5\t0\tSelf_motion\trun.v\t1\truns\t1\tSelf_mover\t0
//! ";
//! let corpus = Corpus::from_readers(parses.as_bytes(), frame_elements.as_bytes(), "toy")?;
//! assert_eq!(corpus.len(), 2);
//!
//! let lexicon = Lexicon::load_from_training_graphs(corpus.iter());
//! let embeddings = EmbeddingStore::empty();
//! let mapper = FeatureMapper::new(MapperKind::Dummy, &embeddings, &lexicon);
//! let matrix = mapper.get_matrix(corpus.iter());
//!
//! let config = ClassifierConfig::new(ClassifierKind::FrequencyBaselineByLemma);
//! let mut clf = Classifier::new(&lexicon, config);
//! clf.train(&matrix.rows, &matrix.labels, &matrix.lemmapos)?;
//!
//! let predicted = clf.predict(&matrix.rows[0], "walk.v")?;
//! assert_eq!(lexicon.frame(predicted), Some("Self_motion"));
//! # Ok(())
//! # }
//! ```

/// 分類器
pub mod classifier;

/// 実験設定
pub mod config;

/// コーパスの読み込み
pub mod corpus;

/// 単語埋め込み
pub mod embedding;

/// エラー型の定義
pub mod errors;

/// 予測結果の集計
pub mod evaluation;

/// 係り受けグラフ
pub mod graph;

/// フレーム辞書
pub mod lexicon;

/// 素性抽出
pub mod mapper;

/// 数値ベクトルのユーティリティ
pub mod num;

/// タブ区切りの報告
pub mod report;

/// 資源ディレクトリの配置
pub mod resources;

/// 内部ユーティリティ関数
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-exports
pub use classifier::{Classifier, ClassifierConfig, ClassifierKind};
pub use corpus::Corpus;
pub use embedding::EmbeddingStore;
pub use graph::DependencyGraph;
pub use lexicon::{FrameId, Lexicon};
pub use mapper::{FeatureMapper, MapperKind};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
