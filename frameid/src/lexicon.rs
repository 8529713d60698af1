//! フレーム辞書を管理するモジュール
//!
//! lemma.pos から喚起されうるフレームの集合への写像と、フレーム名と
//! 密な整数IDの全単射を提供します。辞書は外部のリスト（`frame \t lemma.pos`）
//! または学習グラフの述語主辞から一度だけ構築され、以後は読み取り専用です。

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use hashbrown::HashMap;

use crate::errors::{FrameIdError, Result};
use crate::graph::DependencyGraph;
use crate::utils;

/// 辞書に存在しないフレームを報告する際の名前
pub const UNKNOWN_FRAME: &str = "UNKNOWN_FRAME";

/// フレームID
///
/// 辞書構築時にフレームの初出順で 0 から割り当てられる密なIDです。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(u32);

impl FrameId {
    /// 新しいフレームIDを作成します。
    #[inline(always)]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// ベクトルの添字として使える値を返します。
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 辞書の出典
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexiconSource {
    /// 外部のリストファイル
    List(String),

    /// 学習グラフ
    TrainingData,
}

impl fmt::Display for LexiconSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::List(name) => write!(f, "{name}"),
            Self::TrainingData => write!(f, "training_data"),
        }
    }
}

/// フレーム辞書
#[derive(Clone, Debug)]
pub struct Lexicon {
    frame_lexicon: HashMap<String, Vec<String>>,
    frame_to_id: HashMap<String, FrameId>,
    id_to_frame: Vec<String>,
    source: LexiconSource,
}

impl Lexicon {
    /// `(フレーム, lemma.pos)` の組から辞書を構築します。
    ///
    /// フレームIDは重複を除いた初出順に割り当てられます。同じ lemma.pos に同じ
    /// フレームが複数回現れた場合は一つにまとめられます。
    ///
    /// # 引数
    ///
    /// * `pairs` - `(フレーム, lemma.pos)` の列
    /// * `source` - 辞書の出典
    pub fn from_pairs<I, F, L>(pairs: I, source: LexiconSource) -> Self
    where
        I: IntoIterator<Item = (F, L)>,
        F: Into<String>,
        L: Into<String>,
    {
        let mut frame_lexicon: HashMap<String, Vec<String>> = HashMap::new();
        let mut frame_to_id = HashMap::new();
        let mut id_to_frame = vec![];
        for (frame, lemmapos) in pairs {
            let frame = frame.into();
            if !frame_to_id.contains_key(&frame) {
                let id = FrameId::new(u32::try_from(id_to_frame.len()).unwrap_or(u32::MAX));
                frame_to_id.insert(frame.clone(), id);
                id_to_frame.push(frame.clone());
            }
            let frames = frame_lexicon.entry(lemmapos.into()).or_default();
            if !frames.contains(&frame) {
                frames.push(frame);
            }
        }
        let lexicon = Self {
            frame_lexicon,
            frame_to_id,
            id_to_frame,
            source,
        };
        let unmapped = lexicon.unmapped_frames();
        if !unmapped.is_empty() {
            tracing::warn!(?unmapped, "frames in the lexicon have no id");
        }
        tracing::info!(
            source = %lexicon.source,
            lemmas = lexicon.frame_lexicon.len(),
            frames = lexicon.num_frames(),
            "lexicon built"
        );
        lexicon
    }

    /// `frame \t lemma.pos` 形式のリストから辞書を構築します。
    ///
    /// 空行は読み飛ばします。
    ///
    /// # 引数
    ///
    /// * `rdr` - リストのリーダー
    /// * `name` - 報告用の出典名
    ///
    /// # エラー
    ///
    /// 二列でない行がある場合、[`FrameIdError`] が返されます。
    pub fn load_from_list<R>(rdr: R, name: &str) -> Result<Self>
    where
        R: Read,
    {
        let reader = BufReader::new(rdr);
        let mut pairs = vec![];
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let cols = utils::parse_tsv_row(line)?;
            match cols.as_slice() {
                [frame, lemmapos] => pairs.push((frame.clone(), lemmapos.clone())),
                _ => {
                    let msg = format!(
                        "line {}: expected `frame<TAB>lemma.pos`, got {} columns",
                        i + 1,
                        cols.len()
                    );
                    return Err(FrameIdError::invalid_format("lexicon", msg));
                }
            }
        }
        Ok(Self::from_pairs(pairs, LexiconSource::List(name.to_string())))
    }

    /// リストファイルから辞書を構築します。
    ///
    /// 出典名はファイル名です。
    ///
    /// # エラー
    ///
    /// ファイルが開けない場合やフォーマットが不正な場合、[`FrameIdError`] が返されます。
    pub fn load_from_list_file<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if path.is_dir() {
            return Err(FrameIdError::PathIsDirectory(path.to_path_buf()));
        }
        Self::load_from_list(File::open(path)?, &utils::source_name(path))
    }

    /// 学習グラフの述語主辞から辞書を構築します。
    ///
    /// 述語項構造を持たないグラフは無視されます。
    pub fn load_from_training_graphs<'a, I>(graphs: I) -> Self
    where
        I: IntoIterator<Item = &'a DependencyGraph>,
    {
        let pairs = graphs
            .into_iter()
            .filter_map(DependencyGraph::predicate)
            .map(|p| (p.frame().to_string(), p.lemmapos().to_string()));
        Self::from_pairs(pairs, LexiconSource::TrainingData)
    }

    /// フレーム名からIDを取得します。
    ///
    /// 辞書にないフレームの場合は警告を出力し、`None`（報告上は `-1`）を返します。
    pub fn frame_id(&self, frame: &str) -> Option<FrameId> {
        let id = self.frame_to_id.get(frame).copied();
        if id.is_none() {
            tracing::warn!(frame, "unknown frame, assigning id=-1");
        }
        id
    }

    /// IDからフレーム名を取得します。
    pub fn frame(&self, id: FrameId) -> Option<&str> {
        self.id_to_frame.get(id.index()).map(String::as_str)
    }

    /// lemma.pos が喚起しうるフレームのIDを挿入順に返します。
    ///
    /// 未知の lemma.pos では空です。
    pub fn available_frame_ids(&self, lemmapos: &str) -> Vec<FrameId> {
        self.frame_lexicon
            .get(lemmapos)
            .into_iter()
            .flatten()
            .filter_map(|f| self.frame_to_id.get(f).copied())
            .collect()
    }

    /// lemma.pos が喚起しうるフレーム名を挿入順に返します。
    ///
    /// IDを持たないフレームも含みます。
    pub fn frames(&self, lemmapos: &str) -> &[String] {
        self.frame_lexicon
            .get(lemmapos)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// すべてのフレームIDをID順に返します。
    pub fn all_frame_ids(&self) -> Vec<FrameId> {
        (0..self.id_to_frame.len())
            .filter_map(|i| u32::try_from(i).ok())
            .map(FrameId::new)
            .collect()
    }

    /// lemma.pos が辞書にないかどうか
    pub fn is_unknown(&self, lemmapos: &str) -> bool {
        !self.frame_lexicon.contains_key(lemmapos)
    }

    /// lemma.pos が二つ以上の異なるフレームを喚起しうるかどうか
    pub fn is_ambiguous(&self, lemmapos: &str) -> bool {
        self.frame_lexicon
            .get(lemmapos)
            .is_some_and(|frames| frames.len() > 1)
    }

    /// 辞書中の lemma.pos をソート順に返します。
    pub fn lemmas(&self) -> Vec<&str> {
        let mut lemmas: Vec<&str> = self.frame_lexicon.keys().map(String::as_str).collect();
        lemmas.sort_unstable();
        lemmas
    }

    /// IDを持たないフレームを返します。
    ///
    /// 通常は空です。空でない場合、そのフレームは予測も評価もできません。
    pub fn unmapped_frames(&self) -> Vec<&str> {
        let mut frames: Vec<&str> = self
            .frame_lexicon
            .values()
            .flatten()
            .filter(|f| !self.frame_to_id.contains_key(f.as_str()))
            .map(String::as_str)
            .collect();
        frames.sort_unstable();
        frames.dedup();
        frames
    }

    /// フレーム数
    pub fn num_frames(&self) -> usize {
        self.id_to_frame.len()
    }

    /// 辞書の出典
    pub fn source(&self) -> &LexiconSource {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_first_occurrence() {
        let lex = Lexicon::from_pairs(
            [("Motion", "walk.v"), ("Placing", "put.v"), ("Motion", "run.v")],
            LexiconSource::TrainingData,
        );
        assert_eq!(Some(FrameId::new(0)), lex.frame_id("Motion"));
        assert_eq!(Some(FrameId::new(1)), lex.frame_id("Placing"));
        assert_eq!(2, lex.num_frames());
    }

    #[test]
    fn test_duplicate_pairs_collapse() {
        let lex = Lexicon::from_pairs(
            [("Motion", "walk.v"), ("Motion", "walk.v")],
            LexiconSource::TrainingData,
        );
        assert!(!lex.is_ambiguous("walk.v"));
        assert_eq!(vec![FrameId::new(0)], lex.available_frame_ids("walk.v"));
    }

    #[test]
    fn test_unknown_frame() {
        let lex = Lexicon::from_pairs([("Motion", "walk.v")], LexiconSource::TrainingData);
        assert_eq!(None, lex.frame_id("Leadership"));
        assert_eq!(None, lex.frame(FrameId::new(5)));
    }

    #[test]
    fn test_load_from_list() {
        let data = "Motion\twalk.v\n\nPlacing\twalk.v\nMotion\trun.v\n";
        let lex = Lexicon::load_from_list(data.as_bytes(), "lex.tsv").unwrap();
        assert_eq!(&LexiconSource::List("lex.tsv".to_string()), lex.source());
        assert_eq!(vec!["run.v", "walk.v"], lex.lemmas());
        assert!(lex.unmapped_frames().is_empty());
    }

    #[test]
    fn test_load_from_list_bad_row() {
        let data = "Motion\twalk.v\nPlacing\n";
        assert!(Lexicon::load_from_list(data.as_bytes(), "lex.tsv").is_err());
    }

    #[test]
    fn test_source_display() {
        assert_eq!("training_data", LexiconSource::TrainingData.to_string());
        assert_eq!("fn15", LexiconSource::List("fn15".to_string()).to_string());
    }
}
