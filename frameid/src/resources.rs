//! 資源ディレクトリの配置
//!
//! ```text
//! <root>/
//!   out/                   報告の出力先
//!   srl_data/
//!     embeddings/          埋め込みファイル
//!     corpora/             学習・評価コーパス
//!     lexicons/            辞書リスト
//! ```

use std::path::{Path, PathBuf};

/// 構文解析ファイルの拡張子
pub const PARSE_SUFFIX: &str = ".all.lemma.tags";

/// フレーム要素ファイルの拡張子
pub const FRAME_ELEMENTS_SUFFIX: &str = ".frame.elements";

/// 資源ディレクトリの配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceLayout {
    root: PathBuf,
}

impl ResourceLayout {
    /// ルートディレクトリから配置を作成します。
    pub fn new<P>(root: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { root: root.into() }
    }

    /// ルートディレクトリ
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 報告の出力先
    pub fn out(&self) -> PathBuf {
        self.root.join("out")
    }

    /// データディレクトリ
    pub fn data(&self) -> PathBuf {
        self.root.join("srl_data")
    }

    /// 埋め込みディレクトリ
    pub fn embeddings_dir(&self) -> PathBuf {
        self.data().join("embeddings")
    }

    /// コーパスディレクトリ
    pub fn corpora_dir(&self) -> PathBuf {
        self.data().join("corpora")
    }

    /// 辞書ディレクトリ
    pub fn lexicons_dir(&self) -> PathBuf {
        self.data().join("lexicons")
    }

    /// コーパスの `(構文解析ファイル, フレーム要素ファイル)` を返します。
    ///
    /// # 例
    ///
    /// ```
    /// use std::path::Path;
    /// use frameid::resources::ResourceLayout;
    ///
    /// let layout = ResourceLayout::new("/home/me/frameid");
    /// let (parses, fes) = layout.corpus("das_test");
    /// assert_eq!(parses, Path::new("/home/me/frameid/srl_data/corpora/das_test.all.lemma.tags"));
    /// assert_eq!(fes, Path::new("/home/me/frameid/srl_data/corpora/das_test.frame.elements"));
    /// ```
    pub fn corpus(&self, name: &str) -> (PathBuf, PathBuf) {
        let dir = self.corpora_dir();
        (
            dir.join(format!("{name}{PARSE_SUFFIX}")),
            dir.join(format!("{name}{FRAME_ELEMENTS_SUFFIX}")),
        )
    }

    /// 辞書リストのパス。名前がなければ `None` です。
    pub fn lexicon(&self, name: Option<&str>) -> Option<PathBuf> {
        name.map(|n| self.lexicons_dir().join(n))
    }

    /// 埋め込みファイルのパス。名前がなければ `None` です。
    pub fn embeddings(&self, name: Option<&str>) -> Option<PathBuf> {
        name.map(|n| self.embeddings_dir().join(n))
    }
}
