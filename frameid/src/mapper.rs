//! グラフを素性ベクトルに変換するモジュール
//!
//! 述語インスタンス（述語項構造を持つグラフ）ごとに固定長の数値ベクトルを作ります。
//! 文脈側の語の集め方（文全体か、述語の直接の係り先と親か）と、複数語述語の
//! 扱い（主辞の語か、全述語ノードの平均か）が変種によって異なります。

use std::fmt;
use std::str::FromStr;

use crate::embedding::EmbeddingStore;
use crate::graph::{DependencyGraph, ROOT_WORD};
use crate::lexicon::{FrameId, Lexicon};
use crate::num;

/// 素性抽出器の種類
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapperKind {
    /// 常にゼロベクトルを返します。素性を使わないベースライン用です。
    Dummy,

    /// 文全体の平均埋め込みと述語の平均埋め込みの連結
    SentenceContext,

    /// 述語の直接の係り先と親の平均埋め込みと、述語の平均埋め込みの連結
    DependentsContext,
}

impl MapperKind {
    /// 実験名に使う名前
    pub fn name(self) -> &'static str {
        match self {
            Self::Dummy => "DummyMapper",
            Self::SentenceContext => "SentenceBowMapper",
            Self::DependentsContext => "DependentsBowMapper",
        }
    }
}

impl fmt::Display for MapperKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MapperKind {
    type Err = &'static str;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "dummy" => Ok(Self::Dummy),
            "sentence" => Ok(Self::SentenceContext),
            "dependents" => Ok(Self::DependentsContext),
            _ => Err("Could not parse a feature mapper"),
        }
    }
}

/// 単語列の平均埋め込みを計算します。
///
/// 単語は小文字化して検索し、語彙にない単語はゼロベクトルとして平均に含めます。
/// 単語列が空の場合はゼロベクトルを返します。
///
/// # 例
///
/// ```
/// use frameid::embedding::EmbeddingStore;
/// use frameid::mapper::average_embedding;
///
/// let store = EmbeddingStore::from_reader("cat 1.0 2.0\ndog 3.0 4.0\n".as_bytes(), "toy")?;
/// assert_eq!(average_embedding(&["Cat", "dog"], &store), vec![2.0, 3.0]);
/// assert_eq!(average_embedding(&["cat", "bird"], &store), vec![0.5, 1.0]);
/// assert_eq!(average_embedding::<&str>(&[], &store), vec![0.0, 0.0]);
/// # Ok::<(), frameid::errors::FrameIdError>(())
/// ```
pub fn average_embedding<S>(words: &[S], embeddings: &EmbeddingStore) -> Vec<f32>
where
    S: AsRef<str>,
{
    num::mean(
        words.iter().map(|w| embeddings.get(w.as_ref())),
        embeddings.dim(),
    )
}

/// 素性行列
///
/// すべての列は位置で対応します。
#[derive(Clone, Debug, Default)]
pub struct FeatureMatrix {
    /// 素性ベクトル
    pub rows: Vec<Vec<f32>>,

    /// 正解フレームのID。辞書にないフレームは `None`。
    pub labels: Vec<Option<FrameId>>,

    /// 述語の lemma.pos
    pub lemmapos: Vec<String>,

    /// 元のグラフのgid
    pub gids: Vec<Option<usize>>,
}

impl FeatureMatrix {
    /// 行数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 行がないかどうか
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 素性抽出器
pub struct FeatureMapper<'a> {
    kind: MapperKind,
    embeddings: &'a EmbeddingStore,
    lexicon: &'a Lexicon,
    multiword_averaging: bool,
}

impl<'a> FeatureMapper<'a> {
    /// 新しい素性抽出器を作成します。
    ///
    /// 複数語述語の平均はデフォルトで無効です。
    pub fn new(kind: MapperKind, embeddings: &'a EmbeddingStore, lexicon: &'a Lexicon) -> Self {
        Self {
            kind,
            embeddings,
            lexicon,
            multiword_averaging: false,
        }
    }

    /// 複数語述語で全述語ノードの平均を使うかどうかを指定します。
    ///
    /// 無効の場合は述語主辞の語だけを使います。
    pub fn multiword_averaging(mut self, yes: bool) -> Self {
        self.multiword_averaging = yes;
        self
    }

    /// 素性抽出器の種類
    pub fn kind(&self) -> MapperKind {
        self.kind
    }

    /// 出力ベクトルの次元数
    pub fn dim(&self) -> usize {
        match self.kind {
            MapperKind::Dummy => self.embeddings.dim(),
            MapperKind::SentenceContext | MapperKind::DependentsContext => {
                2 * self.embeddings.dim()
            }
        }
    }

    /// グラフの素性ベクトルを返します。
    ///
    /// 述語項構造を持たないグラフでは、述語側と係り先側の平均はゼロベクトルです。
    pub fn get_repr(&self, graph: &DependencyGraph) -> Vec<f32> {
        let context: Vec<String> = match self.kind {
            MapperKind::Dummy => return vec![0.0; self.dim()],
            MapperKind::SentenceContext => graph
                .sentence()
                .split(' ')
                .map(str::to_lowercase)
                .collect(),
            MapperKind::DependentsContext => self.dependent_words(graph),
        };
        let mut repr = average_embedding(&context, self.embeddings);
        repr.extend(average_embedding(&self.target_words(graph), self.embeddings));
        repr
    }

    fn target_words(&self, graph: &DependencyGraph) -> Vec<String> {
        if self.multiword_averaging {
            graph.predicate_node_words()
        } else {
            graph
                .predicate_head()
                .map(|n| vec![n.word().to_lowercase()])
                .unwrap_or_default()
        }
    }

    fn dependent_words(&self, graph: &DependencyGraph) -> Vec<String> {
        let Some(head) = graph.predicate().map(|p| p.head()) else {
            return vec![];
        };
        graph
            .direct_dependents(head)
            .chain(graph.parent(head))
            .map(|id| {
                graph
                    .node(id)
                    .map_or(ROOT_WORD, |n| n.word())
                    .to_lowercase()
            })
            .collect()
    }

    /// グラフ列の素性行列を返します。
    ///
    /// 述語項構造を持たないグラフは警告を出力して除外します。
    pub fn get_matrix<'g, I>(&self, graphs: I) -> FeatureMatrix
    where
        I: IntoIterator<Item = &'g DependencyGraph>,
    {
        let mut matrix = FeatureMatrix::default();
        for graph in graphs {
            let Some(predicate) = graph.predicate() else {
                tracing::warn!(gid = ?graph.gid(), "graph has no predicate, skipping");
                continue;
            };
            matrix.rows.push(self.get_repr(graph));
            matrix.labels.push(self.lexicon.frame_id(predicate.frame()));
            matrix.lemmapos.push(predicate.lemmapos().to_string());
            matrix.gids.push(graph.gid());
        }
        matrix
    }
}
