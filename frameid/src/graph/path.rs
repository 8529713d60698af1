//! 係り受けパスの表現

use std::fmt;

use hashbrown::{HashMap, HashSet};

use crate::graph::NodeId;

/// 直接の親へのパスの文字列表現
pub const PARENT_PATH: &str = "-1";

const ARROW: &str = "->";
const UPWARD: char = '^';

/// パス上の一歩
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathStep {
    label: String,
    upward: bool,
}

impl PathStep {
    pub(crate) fn new<S>(label: S, upward: bool) -> Self
    where
        S: Into<String>,
    {
        Self {
            label: label.into(),
            upward,
        }
    }

    /// 辿った辺のラベル
    pub fn label(&self) -> &str {
        &self.label
    }

    /// 係り先から係り元（親）の方向に辿ったかどうか
    pub fn is_upward(&self) -> bool {
        self.upward
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.upward {
            write!(f, "{UPWARD}")?;
        }
        write!(f, "{}", self.label)
    }
}

/// 二つのノード間の係り受けパス
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RelationPath {
    /// 終点が始点の直接の親（ROOT を除く）
    Parent,

    /// 辺ラベルの列
    Chain(Vec<PathStep>),
}

impl fmt::Display for RelationPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Parent => write!(f, "{PARENT_PATH}"),
            Self::Chain(steps) => {
                for (i, step) in steps.iter().enumerate() {
                    if i != 0 {
                        write!(f, "{ARROW}")?;
                    }
                    write!(f, "{step}")?;
                }
                Ok(())
            }
        }
    }
}

/// グラフ内の全ノード対のパスを文字列として保持するマップ
///
/// [`DependencyGraph::path_map`](crate::graph::DependencyGraph::path_map) で構築します。
#[derive(Clone, Debug, Default)]
pub struct PathMap {
    // Targets are kept in ascending id order per source.
    paths: HashMap<NodeId, Vec<(NodeId, String)>>,
    distinct: HashSet<String>,
}

impl PathMap {
    pub(crate) fn insert(&mut self, src: NodeId, tgt: NodeId, path: String) {
        self.distinct.insert(path.clone());
        self.paths.entry(src).or_default().push((tgt, path));
    }

    /// `src` から `tgt` へのパスを返します。
    pub fn get(&self, src: NodeId, tgt: NodeId) -> Option<&str> {
        self.paths
            .get(&src)?
            .iter()
            .find(|(t, _)| *t == tgt)
            .map(|(_, p)| p.as_str())
    }

    /// グラフ内に出現するパスかどうか
    pub fn contains_path(&self, path: &str) -> bool {
        self.distinct.contains(path)
    }

    /// グラフ内に出現する異なるパスの数
    pub fn num_distinct_paths(&self) -> usize {
        self.distinct.len()
    }

    /// `src` から指定のパスで到達するノードを返します。
    ///
    /// # 引数
    ///
    /// * `src` - 始点ノード
    /// * `path` - パスの文字列表現。空文字列は始点自身を表します。
    ///
    /// # 戻り値
    ///
    /// 到達するノードをID順に返します。一つもない場合は `None`。
    pub fn find_nodes(&self, src: NodeId, path: &str) -> Option<Vec<NodeId>> {
        if path.is_empty() {
            return Some(vec![src]);
        }
        if !self.contains_path(path) {
            return None;
        }
        let found: Vec<NodeId> = self
            .paths
            .get(&src)?
            .iter()
            .filter(|(_, p)| p == path)
            .map(|&(t, _)| t)
            .collect();
        (!found.is_empty()).then_some(found)
    }
}
