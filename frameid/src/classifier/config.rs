use crate::classifier::ClassifierKind;

/// 分類器の設定
///
/// 乱数シードを含むすべての設定を明示的に保持します。プロセス全体の状態には依存しません。
///
/// # 例
///
/// ```
/// use frameid::classifier::{ClassifierConfig, ClassifierKind};
///
/// let config = ClassifierConfig::new(ClassifierKind::RankingEmbedding)
///     .num_components(64)
///     .max_sampled(5)
///     .num_epochs(20)
///     .seed(7);
/// assert_eq!(config.effective_num_epochs(), 20);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifierConfig {
    kind: ClassifierKind,
    all_unknown: bool,
    num_components: usize,
    max_sampled: usize,
    num_epochs: Option<usize>,
    learning_rate: Option<f32>,
    seed: u64,
}

impl ClassifierConfig {
    /// デフォルト値で設定を作成します。
    pub fn new(kind: ClassifierKind) -> Self {
        Self {
            kind,
            all_unknown: false,
            num_components: 1500,
            max_sampled: 10,
            num_epochs: None,
            learning_rate: None,
            seed: 4,
        }
    }

    /// すべての lemma.pos を未知語として扱うかどうかを指定します。
    ///
    /// 有効にすると、予測は常にフレーム全体から行われます（辞書なし設定）。
    pub fn all_unknown(mut self, yes: bool) -> Self {
        self.all_unknown = yes;
        self
    }

    /// ランキングモデルの潜在次元数を変更します。
    ///
    /// デフォルト値は 1500 です。
    ///
    /// # パニック
    ///
    /// 値が1未満の場合、パニックします。
    pub fn num_components(mut self, n: usize) -> Self {
        assert!(n >= 1);
        self.num_components = n;
        self
    }

    /// ランキングモデルの学習で一つの正例あたりに試す負例の最大数を変更します。
    ///
    /// デフォルト値は 10 です。
    ///
    /// # パニック
    ///
    /// 値が1未満の場合、パニックします。
    pub fn max_sampled(mut self, n: usize) -> Self {
        assert!(n >= 1);
        self.max_sampled = n;
        self
    }

    /// 学習のエポック数を変更します。
    ///
    /// 指定しない場合、ランキングモデルは 500、フィードフォワードネットワークは 100 です。
    ///
    /// # パニック
    ///
    /// 値が1未満の場合、パニックします。
    pub fn num_epochs(mut self, n: usize) -> Self {
        assert!(n >= 1);
        self.num_epochs = Some(n);
        self
    }

    /// 学習率を変更します。
    ///
    /// 指定しない場合、ランキングモデルは 0.05、フィードフォワードネットワークは 0.01 です。
    ///
    /// # パニック
    ///
    /// 値が正でない場合、パニックします。
    pub fn learning_rate(mut self, rate: f32) -> Self {
        assert!(rate > 0.0);
        self.learning_rate = Some(rate);
        self
    }

    /// 重みの初期化とサンプリングに使う乱数シードを変更します。
    ///
    /// デフォルト値は 4 です。
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// 分類器の種類
    pub fn kind(&self) -> ClassifierKind {
        self.kind
    }

    /// すべての lemma.pos を未知語として扱うかどうか
    pub fn is_all_unknown(&self) -> bool {
        self.all_unknown
    }

    /// 潜在次元数
    pub fn get_num_components(&self) -> usize {
        self.num_components
    }

    /// 負例の最大サンプル数
    pub fn get_max_sampled(&self) -> usize {
        self.max_sampled
    }

    /// 明示的に指定されたエポック数
    pub fn get_num_epochs(&self) -> Option<usize> {
        self.num_epochs
    }

    /// 分類器の種類に応じた実際のエポック数
    pub fn effective_num_epochs(&self) -> usize {
        self.num_epochs.unwrap_or(match self.kind {
            ClassifierKind::RankingEmbedding => 500,
            ClassifierKind::FeedForward => 100,
            ClassifierKind::FrequencyBaselineByLemma
            | ClassifierKind::FrequencyBaselineByLexicon => 0,
        })
    }

    /// 分類器の種類に応じた実際の学習率
    pub fn effective_learning_rate(&self) -> f32 {
        self.learning_rate.unwrap_or(match self.kind {
            ClassifierKind::RankingEmbedding => 0.05,
            _ => 0.01,
        })
    }

    /// 乱数シード
    pub fn get_seed(&self) -> u64 {
        self.seed
    }
}
