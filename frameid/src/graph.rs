//! 係り受けグラフを提供するモジュール
//!
//! 一文の係り受け解析結果を、整数IDで索引されるノードのアリーナと
//! ノードごとの隣接リスト（係り先と関係ラベル）、および親ポインタで表現します。
//! 一つのグラフはちょうど一つの述語項構造（述語ノード群、フレーム、lemma.pos、
//! 意味役割）を保持します。
//!
//! # 例
//!
//! ```
//! use frameid::graph::{DependencyGraph, RelationPath};
//!
//! let mut g = DependencyGraph::new(
//!     [(1, "John"), (2, "walks")],
//!     [(0, 2, "root"), (2, 1, "nsubj")],
//! )?;
//! g.attach_predicate_and_roles(&[2], "Self_motion", "walk.v", [(1, "Self_mover")])?;
//!
//! assert_eq!(g.sentence(), "John walks");
//! assert_eq!(g.get_path(1, 2)?, Some(RelationPath::Parent));
//! assert_eq!(g.get_path(2, 1)?.unwrap().to_string(), "nsubj");
//! assert_eq!(g.predicate_head().unwrap().word(), "walks");
//! # Ok::<(), frameid::errors::FrameIdError>(())
//! ```

mod path;

use std::collections::VecDeque;
use std::fmt::Write as _;

use crate::errors::{FrameIdError, Result};

pub use crate::graph::path::{PathMap, PathStep, RelationPath, PARENT_PATH};

/// ノードID。0 は暗黙の ROOT に予約されています。
pub type NodeId = usize;

/// 暗黙の ROOT ノードのID
pub const ROOT: NodeId = 0;

/// ROOT ノードの表層形
pub const ROOT_WORD: &str = "ROOT";

/// 前置詞の係り受けラベル。このラベルは前置詞の語を付加して細分化されます。
const PREP_LABEL: &str = "prep";

/// グラフのノード
///
/// 表層形に加えて、係り元（親）と入力辺のラベル、述語項構造の注釈を保持します。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    word: String,
    head: Option<NodeId>,
    deprel: Option<String>,
    frame: Option<String>,
    lemmapos: Option<String>,
    role: Option<String>,
}

impl Node {
    fn new<S>(word: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            word: word.into(),
            head: None,
            deprel: None,
            frame: None,
            lemmapos: None,
            role: None,
        }
    }

    /// 表層形
    pub fn word(&self) -> &str {
        &self.word
    }

    /// 親ノードのID。ROOT や孤立ノードでは `None`。
    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    /// 親からこのノードへの辺のラベル
    pub fn deprel(&self) -> Option<&str> {
        self.deprel.as_deref()
    }

    /// 述語ノードに付与されたフレーム
    pub fn frame(&self) -> Option<&str> {
        self.frame.as_deref()
    }

    /// 述語ノードに付与された lemma.pos
    pub fn lemmapos(&self) -> Option<&str> {
        self.lemmapos.as_deref()
    }

    /// 役割の主辞ノードに付与された意味役割
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

/// グラフに付与された述語項構造
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predicate {
    nodes: Vec<NodeId>,
    frame: String,
    lemmapos: String,
    roles: Vec<NodeId>,
}

impl Predicate {
    /// 述語の主辞（最初の述語ノード）
    pub fn head(&self) -> NodeId {
        self.nodes[0]
    }

    /// 述語を構成するノード（複数語述語では複数）
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// 述語が喚起するフレーム
    pub fn frame(&self) -> &str {
        &self.frame
    }

    /// 述語の lemma.pos
    pub fn lemmapos(&self) -> &str {
        &self.lemmapos
    }

    /// 意味役割を持つ主辞ノード
    pub fn roles(&self) -> &[NodeId] {
        &self.roles
    }
}

/// 一文の係り受けグラフ
///
/// 文中の述語項構造ごとに一つのインスタンスが作られます。同じ文に述語が二つあれば、
/// ノードと辺が同一で注釈だけが異なる二つのグラフになります。
#[derive(Clone, Debug)]
pub struct DependencyGraph {
    nodes: Vec<Option<Node>>,
    children: Vec<Vec<(NodeId, String)>>,
    sentence: String,
    predicate: Option<Predicate>,
    gid: Option<usize>,
}

impl DependencyGraph {
    /// ノードと辺のリストから新しいグラフを構築します。
    ///
    /// ROOT（ID 0）は暗黙に追加されます。`prep` ラベルの辺は係り先の語を小文字化して
    /// 付加したラベル（例: `prep_in`）に書き換えられます。同じ (係り元, 係り先) の辺が
    /// 複数ある場合は後のものがラベルを上書きします。
    ///
    /// # 引数
    ///
    /// * `nodes` - `(ノードID, 表層形)` の列
    /// * `edges` - `(係り元, 係り先, ラベル)` の列
    ///
    /// # 戻り値
    ///
    /// 構築されたグラフ
    ///
    /// # エラー
    ///
    /// 以下の場合に [`FrameIdError`] が返されます：
    ///
    /// - ノードIDとして 0 が指定された場合
    /// - 辺が存在しないノードを参照している場合
    /// - ROOT に係る辺がある場合
    pub fn new<N, S, E, L>(nodes: N, edges: E) -> Result<Self>
    where
        N: IntoIterator<Item = (NodeId, S)>,
        S: Into<String>,
        E: IntoIterator<Item = (NodeId, NodeId, L)>,
        L: AsRef<str>,
    {
        let mut words: Vec<(NodeId, String)> =
            nodes.into_iter().map(|(id, w)| (id, w.into())).collect();
        words.sort_by_key(|&(id, _)| id);
        if words.first().is_some_and(|&(id, _)| id == ROOT) {
            return Err(FrameIdError::invalid_argument(
                "nodes",
                "node id 0 is reserved for ROOT",
            ));
        }

        let len = words.last().map_or(0, |&(id, _)| id) + 1;
        let mut arena = vec![None; len];
        arena[ROOT] = Some(Node::new(ROOT_WORD));
        for (id, word) in words {
            arena[id] = Some(Node::new(word));
        }
        let sentence = arena
            .iter()
            .skip(1)
            .flatten()
            .map(|n| n.word.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let mut children: Vec<Vec<(NodeId, String)>> = vec![vec![]; len];
        for (src, tgt, label) in edges {
            if arena.get(src).map_or(true, Option::is_none) {
                return Err(FrameIdError::UnknownNode(src));
            }
            let Some(Some(dependent)) = arena.get_mut(tgt) else {
                return Err(FrameIdError::UnknownNode(tgt));
            };
            if tgt == ROOT {
                return Err(FrameIdError::invalid_argument(
                    "edges",
                    "ROOT cannot be a dependent",
                ));
            }
            let label = match label.as_ref() {
                PREP_LABEL => format!("{PREP_LABEL}_{}", dependent.word.to_lowercase()),
                label => label.to_string(),
            };
            match dependent.head {
                None => {
                    dependent.head = Some(src);
                    dependent.deprel = Some(label.clone());
                }
                Some(head) if head == src => dependent.deprel = Some(label.clone()),
                Some(head) => {
                    tracing::warn!(
                        node = tgt,
                        kept = head,
                        ignored = src,
                        "node has more than one head, keeping the first"
                    );
                    continue;
                }
            }
            if let Some(edge) = children[src].iter_mut().find(|(t, _)| *t == tgt) {
                edge.1 = label;
            } else {
                children[src].push((tgt, label));
            }
        }

        Ok(Self {
            nodes: arena,
            children,
            sentence,
            predicate: None,
            gid: None,
        })
    }

    /// 述語項構造を付与します。
    ///
    /// グラフごとに一度だけ呼び出せます。同じ役割ラベルを持つノードはまとめられ、
    /// その主辞（[`get_head`](Self::get_head)）だけが役割ラベルを持ちます。
    /// 失敗した場合、グラフは変更されません。
    ///
    /// # 引数
    ///
    /// * `predicate_nodes` - 述語ノード。最初のノードが述語の主辞になります。
    /// * `frame` - 述語が喚起するフレーム
    /// * `lemmapos` - 述語の lemma.pos
    /// * `roles` - `(ノードID, 役割ラベル)` の列
    ///
    /// # エラー
    ///
    /// 以下の場合に [`FrameIdError`] が返されます：
    ///
    /// - すでに述語項構造が付与されている場合 ([`FrameIdError::DuplicateAnnotation`])
    /// - 述語ノードが空の場合
    /// - 存在しないノードが指定された場合
    /// - 役割の主辞が見つからない場合 ([`FrameIdError::NoHeadFound`])
    pub fn attach_predicate_and_roles<R, S>(
        &mut self,
        predicate_nodes: &[NodeId],
        frame: &str,
        lemmapos: &str,
        roles: R,
    ) -> Result<()>
    where
        R: IntoIterator<Item = (NodeId, S)>,
        S: Into<String>,
    {
        if self.predicate.is_some() {
            return Err(FrameIdError::DuplicateAnnotation {
                gid: self.gid_label(),
            });
        }
        if predicate_nodes.is_empty() {
            return Err(FrameIdError::invalid_argument(
                "predicate_nodes",
                "a predicate needs at least one node",
            ));
        }
        for &id in predicate_nodes {
            self.node(id).ok_or(FrameIdError::UnknownNode(id))?;
        }

        let mut groups: Vec<(String, Vec<NodeId>)> = vec![];
        for (id, role) in roles {
            self.node(id).ok_or(FrameIdError::UnknownNode(id))?;
            let role = role.into();
            match groups.iter_mut().find(|(r, _)| *r == role) {
                Some((_, group)) => group.push(id),
                None => groups.push((role, vec![id])),
            }
        }
        let mut heads = Vec::with_capacity(groups.len());
        for (role, group) in groups {
            heads.push((self.get_head(&group)?, role));
        }

        for &id in predicate_nodes {
            if let Some(node) = self.node_mut(id) {
                node.frame = Some(frame.to_string());
                node.lemmapos = Some(lemmapos.to_string());
            }
        }
        let mut role_nodes = vec![];
        for (head, role) in heads {
            if let Some(node) = self.node_mut(head) {
                if let Some(previous) = node.role.replace(role) {
                    tracing::warn!(node = head, previous, "two roles share one head node");
                }
            }
            if !role_nodes.contains(&head) {
                role_nodes.push(head);
            }
        }
        self.predicate = Some(Predicate {
            nodes: predicate_nodes.to_vec(),
            frame: frame.to_string(),
            lemmapos: lemmapos.to_string(),
            roles: role_nodes,
        });
        Ok(())
    }

    /// ノード群の主辞を返します。
    ///
    /// 一ノードだけのグループはそのノードが主辞です。それ以外は与えられた順に走査し、
    /// 親がグループの外にある（または親を持たない）最初のノードを主辞とします。
    ///
    /// # エラー
    ///
    /// グループが空の場合、またはすべてのノードの親がグループ内にある場合は
    /// [`FrameIdError::NoHeadFound`] が返されます。
    pub fn get_head(&self, group: &[NodeId]) -> Result<NodeId> {
        match group {
            [only] => Ok(*only),
            _ => group
                .iter()
                .copied()
                .find(|&id| self.parent(id).map_or(true, |p| !group.contains(&p)))
                .ok_or_else(|| FrameIdError::NoHeadFound {
                    nodes: group.to_vec(),
                }),
        }
    }

    /// `src` から `tgt` への係り受けパスを返します。
    ///
    /// `tgt` が `src` の直接の親で ROOT でない場合は [`RelationPath::Parent`]
    /// （文字列表現 `"-1"`）を返します。それ以外は木を無向に辿った最短経路を、
    /// 辿った各辺のラベルの列として返します。親方向に辿った辺は `^` 付きで表されます。
    ///
    /// # 戻り値
    ///
    /// 経路がない場合は `Ok(None)`。`src == tgt` の場合は空の経路。
    ///
    /// # エラー
    ///
    /// どちらかのノードが存在しない場合、[`FrameIdError::UnknownNode`] が返されます。
    pub fn get_path(&self, src: NodeId, tgt: NodeId) -> Result<Option<RelationPath>> {
        self.node(src).ok_or(FrameIdError::UnknownNode(src))?;
        self.node(tgt).ok_or(FrameIdError::UnknownNode(tgt))?;
        if tgt != ROOT && self.parent(src) == Some(tgt) {
            return Ok(Some(RelationPath::Parent));
        }
        Ok(self.shortest_path(src, tgt).map(RelationPath::Chain))
    }

    fn shortest_path(&self, src: NodeId, tgt: NodeId) -> Option<Vec<PathStep>> {
        if src == tgt {
            return Some(vec![]);
        }
        // (previous node, whether the step went to the previous node's parent)
        let mut prev: Vec<Option<(NodeId, bool)>> = vec![None; self.nodes.len()];
        let mut visited = vec![false; self.nodes.len()];
        visited[src] = true;
        let mut queue = VecDeque::from([src]);
        while let Some(cur) = queue.pop_front() {
            let down = self.children[cur].iter().map(|&(t, _)| (t, false));
            let up = self.parent(cur).map(|p| (p, true));
            for (next, upward) in down.chain(up) {
                if visited[next] {
                    continue;
                }
                visited[next] = true;
                prev[next] = Some((cur, upward));
                if next == tgt {
                    return Some(self.collect_steps(&prev, src, tgt));
                }
                queue.push_back(next);
            }
        }
        None
    }

    fn collect_steps(
        &self,
        prev: &[Option<(NodeId, bool)>],
        src: NodeId,
        tgt: NodeId,
    ) -> Vec<PathStep> {
        let mut steps = vec![];
        let mut cur = tgt;
        while cur != src {
            let Some((from, upward)) = prev[cur] else {
                break;
            };
            let (head, dependent) = if upward { (cur, from) } else { (from, cur) };
            let label = self.edge_label(head, dependent).unwrap_or_default();
            steps.push(PathStep::new(label, upward));
            cur = from;
        }
        steps.reverse();
        steps
    }

    /// グラフ内のすべての異なるノード対についてパスを事前計算します。
    pub fn path_map(&self) -> PathMap {
        let ids: Vec<NodeId> = self.nodes().map(|(id, _)| id).collect();
        let mut map = PathMap::default();
        for &src in &ids {
            for &tgt in &ids {
                if src == tgt {
                    continue;
                }
                if let Ok(Some(path)) = self.get_path(src, tgt) {
                    map.insert(src, tgt, path.to_string());
                }
            }
        }
        map
    }

    /// ノードのラベル（表層形）を返します。
    ///
    /// ノードへの入力辺が前置詞系（`prep` で始まる）の場合は、前置詞が支配する
    /// 最初の係り先（前置詞の目的語）の表層形を返します。
    ///
    /// # エラー
    ///
    /// - ノードが存在しない場合は [`FrameIdError::UnknownNode`]
    /// - 前置詞に係り先がない場合は [`FrameIdError::DanglingPreposition`]
    pub fn get_node_label(&self, id: NodeId) -> Result<&str> {
        let node = self.node(id).ok_or(FrameIdError::UnknownNode(id))?;
        if node.deprel().is_some_and(|l| l.starts_with(PREP_LABEL)) {
            let &(pobj, _) = self.children[id]
                .first()
                .ok_or(FrameIdError::DanglingPreposition(id))?;
            return self
                .node(pobj)
                .map(Node::word)
                .ok_or(FrameIdError::UnknownNode(pobj));
        }
        Ok(node.word())
    }

    /// ノードの直接の係り先を辺の追加順に返します。
    pub fn direct_dependents(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children
            .get(id)
            .into_iter()
            .flatten()
            .map(|&(t, _)| t)
    }

    /// ノードの親を返します。
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.head
    }

    /// `head` から `dependent` への辺のラベルを返します。
    pub fn edge_label(&self, head: NodeId, dependent: NodeId) -> Option<&str> {
        self.children
            .get(head)?
            .iter()
            .find(|(t, _)| *t == dependent)
            .map(|(_, l)| l.as_str())
    }

    /// ノードを返します。
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)?.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)?.as_mut()
    }

    /// ROOT を含むすべてのノードをID順に返します。
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, n)| n.as_ref().map(|n| (id, n)))
    }

    /// ROOT を除いたノード数
    pub fn num_tokens(&self) -> usize {
        self.nodes().count() - 1
    }

    /// 付与された述語項構造
    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    /// 述語の主辞ノード
    pub fn predicate_head(&self) -> Option<&Node> {
        self.node(self.predicate.as_ref()?.head())
    }

    /// 述語ノードの表層形（小文字化済み）
    pub fn predicate_node_words(&self) -> Vec<String> {
        self.predicate
            .iter()
            .flat_map(|p| p.nodes())
            .filter_map(|&id| self.node(id))
            .map(|n| n.word.to_lowercase())
            .collect()
    }

    /// 構築時に生成された文字列（ノードID順の表層形を空白で連結したもの）
    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    /// 報告用の通し番号
    pub fn gid(&self) -> Option<usize> {
        self.gid
    }

    /// 報告用の通し番号を設定します。
    ///
    /// gid は同一性や等価性には使われません。
    pub fn set_gid(&mut self, gid: usize) {
        self.gid = Some(gid);
    }

    fn gid_label(&self) -> String {
        self.gid
            .map_or_else(|| "NOID".to_string(), |gid| gid.to_string())
    }

    /// 診断用の多列テキストを出力します。
    ///
    /// ROOT 以外の各ノードについて、gid、ノードID、表層形、親ID、係り受けラベル、
    /// 役割、フレームをタブ区切りで一行ずつ出力します。値がない列は `_` です。
    pub fn pretty(&self) -> String {
        let gid = self.gid_label();
        let mut s = String::new();
        for (id, node) in self.nodes().filter(|&(id, _)| id != ROOT) {
            let head = node
                .head
                .map_or_else(|| "_".to_string(), |h| h.to_string());
            // Writing to a String cannot fail.
            let _ = writeln!(
                s,
                "{gid}\t{id}\t{}\t{head}\t{}\t{}\t{}",
                node.word,
                node.deprel().unwrap_or("_"),
                node.role().unwrap_or("_"),
                node.frame().unwrap_or("_"),
            );
        }
        s
    }
}
