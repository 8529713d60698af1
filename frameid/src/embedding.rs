//! 単語埋め込み（VSM）を管理するモジュール

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use hashbrown::HashMap;

use crate::errors::{FrameIdError, Result};
use crate::utils;

/// 単語から固定次元のベクトルへの写像
///
/// キーは小文字化して格納され、検索も小文字化して行います。
/// 語彙にない単語には次元数分のゼロベクトルを返します。
#[derive(Clone, Debug)]
pub struct EmbeddingStore {
    map: HashMap<String, Vec<f32>>,
    dim: usize,
    zeros: Vec<f32>,
    source: Option<String>,
}

impl EmbeddingStore {
    /// 埋め込みを持たない縮退したストアを作成します。
    ///
    /// 次元数は 1 で、常にゼロベクトルを返します。素性を参照しない
    /// ベースライン分類器のために使います。
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
            dim: 1,
            zeros: vec![0.0],
            source: None,
        }
    }

    /// 空白区切りのテキスト（`word v1 v2 ...`）から埋め込みを読み込みます。
    ///
    /// 次元数は最初の行から決まります。同じ単語（小文字化後）が複数回現れた場合は
    /// 後の行で上書きします。空行は読み飛ばします。
    ///
    /// # 引数
    ///
    /// * `rdr` - 埋め込みファイルのリーダー
    /// * `name` - 報告用の出典名
    ///
    /// # エラー
    ///
    /// 以下の場合に [`FrameIdError`] が返されます：
    ///
    /// - ベクトルを一つも含まない場合
    /// - 数値として解釈できない値がある場合
    /// - 最初の行と次元数が異なる行がある場合 ([`FrameIdError::DimensionMismatch`])
    ///
    /// # 例
    ///
    /// ```
    /// use frameid::embedding::EmbeddingStore;
    ///
    /// let store = EmbeddingStore::from_reader("cat 1.0 2.0\ndog 3.0 4.0\n".as_bytes(), "toy")?;
    /// assert_eq!(store.get("Cat"), &[1.0f32, 2.0]);
    /// assert_eq!(store.get("bird"), &[0.0, 0.0]);
    /// # Ok::<(), frameid::errors::FrameIdError>(())
    /// ```
    pub fn from_reader<R>(rdr: R, name: &str) -> Result<Self>
    where
        R: Read,
    {
        let reader = BufReader::new(rdr);
        let mut map = HashMap::new();
        let mut dim = None;
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let mut tokens = line.split_whitespace();
            let Some(word) = tokens.next() else {
                continue;
            };
            let vector = tokens
                .map(str::parse::<f32>)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            match dim {
                None if vector.is_empty() => {
                    let msg = format!("line {}: `{word}` has no vector", i + 1);
                    return Err(FrameIdError::invalid_format("embeddings", msg));
                }
                None => dim = Some(vector.len()),
                Some(expected) if expected != vector.len() => {
                    return Err(FrameIdError::DimensionMismatch {
                        line: i + 1,
                        expected,
                        actual: vector.len(),
                    });
                }
                Some(_) => {}
            }
            map.insert(word.to_lowercase(), vector);
        }
        let Some(dim) = dim else {
            return Err(FrameIdError::invalid_format(
                "embeddings",
                "the source contains no vectors",
            ));
        };
        tracing::info!(source = name, words = map.len(), dim, "embeddings loaded");
        Ok(Self {
            map,
            dim,
            zeros: vec![0.0; dim],
            source: Some(name.to_string()),
        })
    }

    /// ファイルから埋め込みを読み込みます。
    ///
    /// 出典名はファイル名です。
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if path.is_dir() {
            return Err(FrameIdError::PathIsDirectory(path.to_path_buf()));
        }
        Self::from_reader(File::open(path)?, &utils::source_name(path))
    }

    /// 単語のベクトルを返します。
    ///
    /// 単語は小文字化して検索します。語彙にない場合はゼロベクトルです。
    pub fn get(&self, word: &str) -> &[f32] {
        self.map
            .get(word.to_lowercase().as_str())
            .map_or(self.zeros.as_slice(), Vec::as_slice)
    }

    /// 単語が語彙にあるかどうか
    pub fn contains(&self, word: &str) -> bool {
        self.map.contains_key(word.to_lowercase().as_str())
    }

    /// ベクトルの次元数
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// 語彙数
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// 語彙が空かどうか
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// 報告用の出典名（縮退ストアでは `NA`）
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or("NA")
    }
}

impl Default for EmbeddingStore {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_oov() {
        let store =
            EmbeddingStore::from_reader("cat 1.0 2.0\ndog 3.0 4.0\n".as_bytes(), "toy").unwrap();
        assert_eq!(&[1.0f32, 2.0], store.get("cat"));
        assert_eq!(&[0.0, 0.0], store.get("bird"));
        assert_eq!(2, store.dim());
        assert_eq!("toy", store.source());
    }

    #[test]
    fn test_keys_are_lowercased() {
        let store = EmbeddingStore::from_reader("Cat 1.0\ncat 2.0\n".as_bytes(), "toy").unwrap();
        assert_eq!(1, store.len());
        assert_eq!(&[2.0f32], store.get("CAT"));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err =
            EmbeddingStore::from_reader("cat 1.0 2.0\ndog 3.0\n".as_bytes(), "toy").unwrap_err();
        assert!(matches!(
            err,
            FrameIdError::DimensionMismatch {
                line: 2,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_empty_source_is_rejected() {
        assert!(EmbeddingStore::from_reader("\n".as_bytes(), "toy").is_err());
    }

    #[test]
    fn test_bad_float() {
        assert!(EmbeddingStore::from_reader("cat 1.0 x\n".as_bytes(), "toy").is_err());
    }

    #[test]
    fn test_degenerate_store() {
        let store = EmbeddingStore::empty();
        assert_eq!(1, store.dim());
        assert_eq!(&[0.0f32], store.get("anything"));
        assert_eq!("NA", store.source());
    }
}
