//! 実験設定
//!
//! 一回の学習と評価に使う分類器、素性抽出器、資源、ハイパーパラメータをまとめた
//! 値オブジェクトです。`Display` は報告ファイル名に使う安定した実験名を返します。

use std::fmt;

use crate::classifier::{ClassifierConfig, ClassifierKind};
use crate::mapper::MapperKind;

const NA: &str = "NA";

/// 実験設定
///
/// # 例
///
/// ```
/// use frameid::classifier::ClassifierKind;
/// use frameid::config::ExperimentConfig;
/// use frameid::mapper::MapperKind;
///
/// let config = ExperimentConfig::new(ClassifierKind::FrequencyBaselineByLexicon, MapperKind::Dummy)
///     .lexicon(Some("fn1.5_lexicon".to_string()));
/// assert_eq!(
///     config.to_string(),
///     "c_LexiconMajorityBaseline__f_DummyMapper__l_fn1.5_lexicon__vsm_NA__MWA_False__unk_False__comp_NA__samp_NA__ep_NA",
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentConfig {
    classifier: ClassifierKind,
    mapper: MapperKind,
    lexicon: Option<String>,
    embeddings: Option<String>,
    multiword_averaging: bool,
    all_unknown: bool,
    num_components: Option<usize>,
    max_sampled: Option<usize>,
    num_epochs: Option<usize>,
    seed: u64,
}

impl ExperimentConfig {
    /// 新しい実験設定を作成します。
    ///
    /// ランキングモデルでは潜在次元数 1500、負例数 10、エポック数 500 が設定されます。
    /// それ以外の分類器ではこれらは未設定です。
    pub fn new(classifier: ClassifierKind, mapper: MapperKind) -> Self {
        let ranking = classifier.is_ranking();
        Self {
            classifier,
            mapper,
            lexicon: None,
            embeddings: None,
            multiword_averaging: false,
            all_unknown: false,
            num_components: ranking.then_some(1500),
            max_sampled: ranking.then_some(10),
            num_epochs: ranking.then_some(500),
            seed: 4,
        }
    }

    /// 辞書リストの名前を指定します。`None` の場合は学習データから辞書を作ります。
    pub fn lexicon(mut self, name: Option<String>) -> Self {
        self.lexicon = name;
        self
    }

    /// 埋め込みファイルの名前を指定します。
    pub fn embeddings(mut self, name: Option<String>) -> Self {
        self.embeddings = name;
        self
    }

    /// 複数語述語で全述語ノードの平均を使うかどうかを指定します。
    pub fn multiword_averaging(mut self, yes: bool) -> Self {
        self.multiword_averaging = yes;
        self
    }

    /// すべての lemma.pos を未知語として扱うかどうかを指定します。
    pub fn all_unknown(mut self, yes: bool) -> Self {
        self.all_unknown = yes;
        self
    }

    /// 潜在次元数を指定します。
    pub fn num_components(mut self, n: usize) -> Self {
        self.num_components = Some(n);
        self
    }

    /// 負例の最大サンプル数を指定します。
    pub fn max_sampled(mut self, n: usize) -> Self {
        self.max_sampled = Some(n);
        self
    }

    /// エポック数を指定します。
    pub fn num_epochs(mut self, n: usize) -> Self {
        self.num_epochs = Some(n);
        self
    }

    /// 乱数シードを指定します。
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// 分類器の種類
    pub fn classifier_kind(&self) -> ClassifierKind {
        self.classifier
    }

    /// 素性抽出器の種類
    pub fn mapper_kind(&self) -> MapperKind {
        self.mapper
    }

    /// 辞書リストの名前
    pub fn lexicon_name(&self) -> Option<&str> {
        self.lexicon.as_deref()
    }

    /// 埋め込みファイルの名前
    pub fn embeddings_name(&self) -> Option<&str> {
        self.embeddings.as_deref()
    }

    /// 複数語述語の平均を使うかどうか
    pub fn is_multiword_averaging(&self) -> bool {
        self.multiword_averaging
    }

    /// すべての lemma.pos を未知語として扱うかどうか
    pub fn is_all_unknown(&self) -> bool {
        self.all_unknown
    }

    /// 潜在次元数
    pub fn get_num_components(&self) -> Option<usize> {
        self.num_components
    }

    /// 負例の最大サンプル数
    pub fn get_max_sampled(&self) -> Option<usize> {
        self.max_sampled
    }

    /// エポック数
    pub fn get_num_epochs(&self) -> Option<usize> {
        self.num_epochs
    }

    /// 乱数シード
    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    /// 分類器に渡す設定を作成します。
    ///
    /// # パニック
    ///
    /// 潜在次元数、負例数、エポック数に 0 が指定されている場合、パニックします。
    pub fn classifier_config(&self) -> ClassifierConfig {
        let mut config = ClassifierConfig::new(self.classifier)
            .all_unknown(self.all_unknown)
            .seed(self.seed);
        if let Some(n) = self.num_components {
            config = config.num_components(n);
        }
        if let Some(n) = self.max_sampled {
            config = config.max_sampled(n);
        }
        if let Some(n) = self.num_epochs {
            config = config.num_epochs(n);
        }
        config
    }
}

/// 真偽値を実験名の表記で返します。
pub(crate) fn flag(yes: bool) -> &'static str {
    if yes {
        "True"
    } else {
        "False"
    }
}

/// 値があればその文字列表現を、なければ `NA` を返します。
pub(crate) fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NA.to_string(), |v| v.to_string())
}

impl fmt::Display for ExperimentConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "c_{}__f_{}__l_{}__vsm_{}__MWA_{}__unk_{}__comp_{}__samp_{}__ep_{}",
            self.classifier,
            self.mapper,
            self.lexicon.as_deref().unwrap_or(NA),
            self.embeddings.as_deref().unwrap_or(NA),
            flag(self.multiword_averaging),
            flag(self.all_unknown),
            or_na(self.num_components),
            or_na(self.max_sampled),
            or_na(self.num_epochs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_name() {
        let config =
            ExperimentConfig::new(ClassifierKind::RankingEmbedding, MapperKind::SentenceContext)
                .lexicon(Some("lex".to_string()))
                .embeddings(Some("deps.words".to_string()))
                .all_unknown(true);
        assert_eq!(
            "c_WsabieClassifier__f_SentenceBowMapper__l_lex__vsm_deps.words__MWA_False__unk_True__comp_1500__samp_10__ep_500",
            config.to_string()
        );
    }

    #[test]
    fn test_classifier_config() {
        let config =
            ExperimentConfig::new(ClassifierKind::RankingEmbedding, MapperKind::DependentsContext)
                .num_components(32)
                .num_epochs(7)
                .all_unknown(true)
                .seed(11)
                .classifier_config();
        assert_eq!(ClassifierKind::RankingEmbedding, config.kind());
        assert_eq!(32, config.get_num_components());
        assert_eq!(10, config.get_max_sampled());
        assert_eq!(7, config.effective_num_epochs());
        assert!(config.is_all_unknown());
        assert_eq!(11, config.get_seed());
    }

    #[test]
    fn test_feedforward_uses_default_epochs() {
        let config =
            ExperimentConfig::new(ClassifierKind::FeedForward, MapperKind::SentenceContext);
        assert_eq!(None, config.get_num_epochs());
        assert_eq!(100, config.classifier_config().effective_num_epochs());
    }
}
