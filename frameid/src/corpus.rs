//! コーパスを読み込んでグラフを構築するモジュール
//!
//! 構文解析ファイルとフレーム要素ファイルを突き合わせ、述語項構造ごとに一つの
//! [`DependencyGraph`] を作ります。不正な構文解析行や付与に失敗した述語項構造は
//! 警告を出力して除外し、残りの処理を続けます。

mod frame_elements;
mod parse;

use std::fs::File;
use std::io::Read;
use std::ops::Deref;
use std::path::Path;

use crate::errors::{FrameIdError, Result};
use crate::graph::DependencyGraph;
use crate::utils;

pub use crate::corpus::frame_elements::{
    fix_offsets, read_frame_elements, PredicateAnnotation, SrlData,
};
pub use crate::corpus::parse::{read_parses, ParsedSentence, ParsedToken};

/// 一つのコーパスから構築されたグラフの列
///
/// グラフには読み込み順に 0 から gid が割り当てられます。
pub struct Corpus {
    name: String,
    graphs: Vec<DependencyGraph>,
}

impl Corpus {
    /// 構文解析データとフレーム要素データからコーパスを構築します。
    ///
    /// 文は文ID順、述語はトークンID列の順、同じ述語の述語項構造はファイル中の順に
    /// 処理されます。
    ///
    /// # 引数
    ///
    /// * `parses` - 構文解析ファイルのリーダー
    /// * `frame_elements` - フレーム要素ファイルのリーダー
    /// * `name` - 報告用のコーパス名
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合やフレーム要素ファイルの形式が不正な場合、
    /// [`FrameIdError`] が返されます。
    pub fn from_readers<P, F>(parses: P, frame_elements: F, name: &str) -> Result<Self>
    where
        P: Read,
        F: Read,
    {
        let srl = read_frame_elements(frame_elements)?;
        let sentences = read_parses(parses)?;
        let mut graphs = vec![];
        for (sid, predicates) in &srl {
            let Some(Some(sentence)) = sentences.get(*sid) else {
                continue;
            };
            for (predicate, annotations) in predicates {
                for annotation in annotations {
                    match Self::build_graph(sentence, predicate, annotation) {
                        Ok(graph) => graphs.push(graph),
                        Err(e) => {
                            tracing::warn!(sid, ?predicate, error = %e, "SRL data error");
                        }
                    }
                }
            }
        }
        for (gid, graph) in graphs.iter_mut().enumerate() {
            graph.set_gid(gid);
        }
        tracing::info!(
            corpus = name,
            labeled = srl.len(),
            parsed = sentences.len(),
            graphs = graphs.len(),
            "corpus loaded"
        );
        Ok(Self {
            name: name.to_string(),
            graphs,
        })
    }

    /// `*.all.lemma.tags` と `*.frame.elements` のファイル組からコーパスを構築します。
    ///
    /// コーパス名は構文解析ファイルの名前から `.all.lemma.tags` を除いたものです。
    pub fn from_paths<P, F>(parses: P, frame_elements: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: AsRef<Path>,
    {
        let (parses, frame_elements) = (parses.as_ref(), frame_elements.as_ref());
        for path in [parses, frame_elements] {
            if path.is_dir() {
                return Err(FrameIdError::PathIsDirectory(path.to_path_buf()));
            }
        }
        let file_name = utils::source_name(parses);
        let name = file_name
            .strip_suffix(crate::resources::PARSE_SUFFIX)
            .unwrap_or(&file_name);
        Self::from_readers(File::open(parses)?, File::open(frame_elements)?, name)
    }

    fn build_graph(
        sentence: &ParsedSentence,
        predicate: &[usize],
        annotation: &PredicateAnnotation,
    ) -> Result<DependencyGraph> {
        let mut graph = DependencyGraph::new(sentence.nodes(), sentence.edges())?;
        graph.attach_predicate_and_roles(
            predicate,
            &annotation.frame,
            &annotation.lemmapos,
            annotation.roles_by_node(),
        )?;
        Ok(graph)
    }

    /// コーパス名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// グラフを取り出します。
    pub fn into_graphs(self) -> Vec<DependencyGraph> {
        self.graphs
    }
}

impl Deref for Corpus {
    type Target = [DependencyGraph];

    fn deref(&self) -> &Self::Target {
        &self.graphs
    }
}
