//! エラー型の定義
//!
//! このモジュールは、frameidライブラリで使用されるすべてのエラー型を定義します。
//! グラフの構造的な異常（主辞が見つからない、前置詞に目的語がない等）は
//! 致命的ではなく、呼び出し側がインスタンスをスキップするかどうかを決めます。

use std::error::Error;
use std::fmt::{self, Debug};

use crate::graph::NodeId;

/// frameid専用のResult型
///
/// エラー型としてデフォルトで[`FrameIdError`]を使用します。
pub type Result<T, E = FrameIdError> = std::result::Result<T, E>;

/// frameidのエラー型
///
/// このライブラリで発生する可能性のあるすべてのエラーを表現します。
#[derive(Debug, thiserror::Error)]
pub enum FrameIdError {
    /// 無効な引数エラー
    ///
    /// [`InvalidArgumentError`]のエラーバリアント。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 無効なフォーマットエラー
    ///
    /// [`InvalidFormatError`]のエラーバリアント。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 無効な状態エラー
    ///
    /// [`InvalidStateError`]のエラーバリアント。
    #[error(transparent)]
    InvalidState(InvalidStateError),

    /// 一つのグラフに二つ目の述語項構造を付与しようとした
    #[error("graph {gid} already carries a predicate-argument structure")]
    DuplicateAnnotation {
        /// 対象グラフのID（未割り当ての場合は `NOID`）
        gid: String,
    },

    /// ノード群の主辞が見つからない
    ///
    /// すべてのノードの親がグループ内にある場合に発生します。
    /// 木構造の係り受け解析では起こらないはずです。
    #[error("no head found for node group {nodes:?}")]
    NoHeadFound {
        /// 対象のノード群
        nodes: Vec<NodeId>,
    },

    /// グラフに存在しないノードを参照した
    #[error("node {0} does not exist in the graph")]
    UnknownNode(NodeId),

    /// 前置詞ノードに支配される語（目的語）が存在しない
    #[error("preposition at node {0} governs no word")]
    DanglingPreposition(NodeId),

    /// 埋め込みファイルの次元が先頭行と一致しない
    #[error("embedding row {line} has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        /// 1始まりの行番号
        line: usize,
        /// 先頭行から決定された次元数
        expected: usize,
        /// 実際の次元数
        actual: usize,
    },

    /// 学習に使えるインスタンスが一つもない
    #[error("no usable training instances")]
    EmptyTrainingSet,

    /// 学習前に予測が呼ばれた
    #[error("the classifier has not been trained")]
    NotTrained,

    /// 浮動小数点数パースエラー
    ///
    /// [`ParseFloatError`](std::num::ParseFloatError)のエラーバリアント。
    #[error(transparent)]
    ParseFloat(std::num::ParseFloatError),

    /// 整数パースエラー
    ///
    /// [`ParseIntError`](std::num::ParseIntError)のエラーバリアント。
    #[error(transparent)]
    ParseInt(std::num::ParseIntError),

    /// UTF-8エンコーディングエラー
    ///
    /// [`std::str::Utf8Error`]のエラーバリアント。
    #[error(transparent)]
    Utf8(std::str::Utf8Error),

    /// ディレクトリが指定されたエラー
    ///
    /// ファイルが期待される場所にディレクトリが指定された場合に発生します。
    #[error("The path '{0}' is a directory, but a file was expected.")]
    PathIsDirectory(std::path::PathBuf),

    /// I/Oエラー
    ///
    /// [`std::io::Error`](std::io::Error)のエラーバリアント。
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl FrameIdError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - フォーマット名
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効な状態エラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    /// * `cause` - エラーの原因
    pub(crate) fn invalid_state<S, M>(msg: S, cause: M) -> Self
    where
        S: Into<String>,
        M: Into<String>,
    {
        Self::InvalidState(InvalidStateError {
            msg: msg.into(),
            cause: cause.into(),
        })
    }
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// 入力フォーマットが無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidFormatError {
    /// フォーマットの名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// 状態が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidStateError {
    /// エラーメッセージ
    pub(crate) msg: String,

    /// エラーの根本原因
    pub(crate) cause: String,
}

impl fmt::Display for InvalidStateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidStateError: {}: {}", self.msg, self.cause)
    }
}

impl Error for InvalidStateError {}

impl From<std::num::ParseFloatError> for FrameIdError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::ParseFloat(error)
    }
}

impl From<std::num::ParseIntError> for FrameIdError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::ParseInt(error)
    }
}

impl From<std::str::Utf8Error> for FrameIdError {
    fn from(error: std::str::Utf8Error) -> Self {
        Self::Utf8(error)
    }
}
