//! フレーム分類器を提供するモジュール
//!
//! すべての分類器は「素性ベクトルと lemma.pos からフレームIDを返す」という
//! 共通の契約と、辞書に基づく共通の候補決定規則を持ちます。
//!
//! - すべて未知語扱いの設定、または辞書にない lemma.pos では、全フレームが候補です。
//! - 辞書にあり曖昧でない lemma.pos では、モデルを参照せずにその唯一のフレームを返します。
//!   学習データにその lemma.pos が一度も現れなくても同じです。
//! - 辞書にあり曖昧な lemma.pos では、モデルのスコアをその lemma.pos の候補に制限して
//!   最大のものを選びます。同点の場合は候補の格納順で最初のものを選びます。
//!
//! # 例
//!
//! ```
//! use frameid::classifier::{Classifier, ClassifierConfig, ClassifierKind};
//! use frameid::lexicon::{Lexicon, LexiconSource};
//!
//! let lexicon = Lexicon::from_pairs([("Motion", "run.v")], LexiconSource::TrainingData);
//! let clf = Classifier::new(&lexicon, ClassifierConfig::new(ClassifierKind::FeedForward));
//!
//! // Unambiguous lemmas never reach the (untrained) model.
//! let motion = lexicon.frame_id("Motion").unwrap();
//! assert_eq!(clf.predict(&[42.0, -1.0], "run.v")?, motion);
//! # Ok::<(), frameid::errors::FrameIdError>(())
//! ```

mod baseline;
mod config;
mod feedforward;
mod ranking;

use std::fmt;
use std::str::FromStr;

use crate::errors::{FrameIdError, Result};
use crate::lexicon::{FrameId, Lexicon};
use crate::num;

use crate::classifier::baseline::{LemmaFrequency, LexiconFrequency};
use crate::classifier::feedforward::FeedForwardNet;
use crate::classifier::ranking::RankingModel;

pub use crate::classifier::config::ClassifierConfig;

/// 分類器の種類
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassifierKind {
    /// lemma.pos ごとの最頻フレーム
    FrequencyBaselineByLemma,

    /// 辞書の候補に制限した最頻フレーム
    FrequencyBaselineByLexicon,

    /// 文脈とフレームの同時埋め込みによるランキング
    RankingEmbedding,

    /// フィードフォワードネットワーク
    FeedForward,
}

impl ClassifierKind {
    /// 実験名に使う名前
    pub fn name(self) -> &'static str {
        match self {
            Self::FrequencyBaselineByLemma => "DataMajorityBaseline",
            Self::FrequencyBaselineByLexicon => "LexiconMajorityBaseline",
            Self::RankingEmbedding => "WsabieClassifier",
            Self::FeedForward => "SharingDNNClassifier",
        }
    }

    /// ランキングモデルのハイパーパラメータを使うかどうか
    pub fn is_ranking(self) -> bool {
        self == Self::RankingEmbedding
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ClassifierKind {
    type Err = &'static str;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "lemma-baseline" => Ok(Self::FrequencyBaselineByLemma),
            "lexicon-baseline" => Ok(Self::FrequencyBaselineByLexicon),
            "ranking" => Ok(Self::RankingEmbedding),
            "feedforward" => Ok(Self::FeedForward),
            _ => Err("Could not parse a classifier"),
        }
    }
}

/// 学習インスタンス
#[derive(Clone, Copy, Debug)]
pub(crate) struct Instance<'a> {
    pub features: &'a [f32],
    pub label: FrameId,
    pub lemmapos: &'a str,
}

/// 候補決定の結果
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Candidates {
    /// モデルを参照せずに決まるフレーム
    Fixed(FrameId),

    /// モデルのスコアで選ぶ候補（格納順）
    Choose(Vec<FrameId>),
}

enum Model {
    ByLemma(LemmaFrequency),
    ByLexicon(LexiconFrequency),
    Ranking(RankingModel),
    FeedForward(FeedForwardNet),
}

/// フレーム分類器
pub struct Classifier<'a> {
    lexicon: &'a Lexicon,
    config: ClassifierConfig,
    model: Option<Model>,
}

impl<'a> Classifier<'a> {
    /// 新しい分類器を作成します。
    pub fn new(lexicon: &'a Lexicon, config: ClassifierConfig) -> Self {
        Self {
            lexicon,
            config,
            model: None,
        }
    }

    /// 分類器の設定
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// 学習済みかどうか
    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// 分類器を学習します。
    ///
    /// 正解フレームが辞書にない（`None`）インスタンスは使いません。
    /// 再学習した場合は以前のモデルを置き換えます。
    ///
    /// # 引数
    ///
    /// * `features` - 素性ベクトル
    /// * `labels` - 正解フレームのID
    /// * `lemmapos` - 述語の lemma.pos
    ///
    /// # エラー
    ///
    /// 以下の場合に [`FrameIdError`] が返されます：
    ///
    /// - 三つの列の長さが異なる場合
    /// - 素性ベクトルの次元がそろっていない場合
    /// - 使えるインスタンスが一つもない場合 ([`FrameIdError::EmptyTrainingSet`])
    pub fn train<V, S>(
        &mut self,
        features: &[V],
        labels: &[Option<FrameId>],
        lemmapos: &[S],
    ) -> Result<()>
    where
        V: AsRef<[f32]>,
        S: AsRef<str>,
    {
        if features.len() != labels.len() || features.len() != lemmapos.len() {
            return Err(FrameIdError::invalid_argument(
                "features",
                "features, labels and lemmapos must have the same length",
            ));
        }
        let instances: Vec<Instance> = features
            .iter()
            .zip(labels)
            .zip(lemmapos)
            .filter_map(|((x, y), l)| {
                y.map(|label| Instance {
                    features: x.as_ref(),
                    label,
                    lemmapos: l.as_ref(),
                })
            })
            .collect();
        let skipped = features.len() - instances.len();
        if skipped != 0 {
            tracing::warn!(skipped, "training instances with unknown frames are ignored");
        }
        let Some(first) = instances.first() else {
            return Err(FrameIdError::EmptyTrainingSet);
        };
        let input_dim = first.features.len();
        if instances.iter().any(|i| i.features.len() != input_dim) {
            return Err(FrameIdError::invalid_argument(
                "features",
                "all feature vectors must have the same dimension",
            ));
        }

        let num_frames = self.lexicon.num_frames();
        let model = match self.config.kind() {
            ClassifierKind::FrequencyBaselineByLemma => {
                Model::ByLemma(LemmaFrequency::train(&instances, num_frames))
            }
            ClassifierKind::FrequencyBaselineByLexicon => {
                Model::ByLexicon(LexiconFrequency::train(&instances, num_frames))
            }
            ClassifierKind::RankingEmbedding => {
                Model::Ranking(RankingModel::train(&instances, num_frames, &self.config)?)
            }
            ClassifierKind::FeedForward => {
                Model::FeedForward(FeedForwardNet::train(&instances, num_frames, &self.config)?)
            }
        };
        tracing::info!(
            classifier = %self.config.kind(),
            instances = instances.len(),
            frames = num_frames,
            "classifier trained"
        );
        self.model = Some(model);
        Ok(())
    }

    /// lemma.pos の候補を決定します。
    pub fn candidates(&self, lemmapos: &str) -> Candidates {
        if self.config.is_all_unknown() || self.lexicon.is_unknown(lemmapos) {
            return Candidates::Choose(self.lexicon.all_frame_ids());
        }
        let available = self.lexicon.available_frame_ids(lemmapos);
        if !self.lexicon.is_ambiguous(lemmapos) {
            if let Some(&only) = available.first() {
                return Candidates::Fixed(only);
            }
        }
        Candidates::Choose(available)
    }

    /// フレームを予測します。
    ///
    /// # 引数
    ///
    /// * `features` - 素性ベクトル
    /// * `lemmapos` - 述語の lemma.pos
    ///
    /// # エラー
    ///
    /// 以下の場合に [`FrameIdError`] が返されます：
    ///
    /// - モデルが必要なのに学習されていない場合 ([`FrameIdError::NotTrained`])
    /// - モデルが必要なのに素性ベクトルの次元が学習時と異なる場合
    /// - 候補が一つもない場合
    pub fn predict(&self, features: &[f32], lemmapos: &str) -> Result<FrameId> {
        let candidates = match self.candidates(lemmapos) {
            Candidates::Fixed(frame) => return Ok(frame),
            Candidates::Choose(candidates) => candidates,
        };
        let scores = self.scores(features, lemmapos)?;
        num::argmax_among(candidates.iter().map(|c| c.index()), &scores)
            .and_then(|i| candidates.iter().copied().find(|c| c.index() == i))
            .ok_or_else(|| {
                FrameIdError::invalid_state(
                    "no candidate frame",
                    format!("lexicon has no frame for `{lemmapos}`"),
                )
            })
    }

    /// 全フレームに対するモデルのスコアを返します。
    ///
    /// # エラー
    ///
    /// 以下の場合に [`FrameIdError`] が返されます：
    ///
    /// - 学習されていない場合 ([`FrameIdError::NotTrained`])
    /// - 素性ベクトルの次元が学習時と異なる場合
    pub fn scores(&self, features: &[f32], lemmapos: &str) -> Result<Vec<f32>> {
        let model = self.model.as_ref().ok_or(FrameIdError::NotTrained)?;
        let input_dim = match model {
            Model::Ranking(m) => Some(m.input_dim()),
            Model::FeedForward(m) => Some(m.input_dim()),
            Model::ByLemma(_) | Model::ByLexicon(_) => None,
        };
        if let Some(input_dim) = input_dim {
            if features.len() != input_dim {
                let msg = format!(
                    "expected a {input_dim}-dimensional feature vector, got {}",
                    features.len()
                );
                return Err(FrameIdError::invalid_argument("features", msg));
            }
        }
        Ok(match model {
            Model::ByLemma(m) => {
                let lemmapos = (!self.config.is_all_unknown()).then_some(lemmapos);
                m.scores(lemmapos)
            }
            Model::ByLexicon(m) => m.scores(),
            Model::Ranking(m) => m.scores(features),
            Model::FeedForward(m) => m.scores(features),
        })
    }
}
