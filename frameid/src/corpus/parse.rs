//! 構文解析ファイル（`*.all.lemma.tags`）の読み込み

use std::io::{BufRead, BufReader, Read};

use crate::errors::Result;
use crate::graph::NodeId;

/// 一文を構成する列ブロックの数（表層形、品詞、係り受けラベル、係り元、未使用、見出し語）
const NUM_BLOCKS: usize = 6;

/// 構文解析済みのトークン
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedToken {
    /// 表層形
    pub form: String,

    /// 品詞
    pub pos: String,

    /// 係り受けラベル
    pub dep: String,

    /// 係り元のトークンID（0 は ROOT）
    pub head: NodeId,

    /// 見出し語
    pub lemma: String,
}

/// 構文解析済みの文
///
/// トークンIDは 1 始まりで、`tokens[i]` のIDは `i + 1` です。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedSentence {
    tokens: Vec<ParsedToken>,
}

impl ParsedSentence {
    /// トークンのスライス
    pub fn tokens(&self) -> &[ParsedToken] {
        &self.tokens
    }

    /// `(トークンID, 表層形)` の列
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &str)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (i + 1, t.form.as_str()))
    }

    /// `(係り元, 係り先, ラベル)` の列
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &str)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.head, i + 1, t.dep.as_str()))
    }

    /// 一行を解析します。不正な行では `None` を返します。
    fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.split('\t');
        let num_tokens: usize = fields.next()?.trim().parse().ok()?;
        if num_tokens == 0 {
            return None;
        }
        let fields: Vec<&str> = fields.collect();
        if fields.len() < NUM_BLOCKS * num_tokens {
            return None;
        }
        let block = |b: usize, i: usize| fields[b * num_tokens + i];
        let mut tokens = Vec::with_capacity(num_tokens);
        for i in 0..num_tokens {
            tokens.push(ParsedToken {
                form: block(0, i).to_string(),
                pos: block(1, i).to_string(),
                dep: block(2, i).to_string(),
                head: block(3, i).trim().parse().ok()?,
                lemma: block(5, i).to_string(),
            });
        }
        Some(Self { tokens })
    }
}

/// 構文解析ファイルを読み込みます。
///
/// 空でない各行が一文です。文IDは空でない行を 0 から数えたもので、戻り値の添字に
/// 対応します。不正な行は警告を出力して `None` とし、読み込みを続けます。
///
/// # エラー
///
/// 読み込みに失敗した場合、[`FrameIdError`](crate::errors::FrameIdError) が返されます。
pub fn read_parses<R>(rdr: R) -> Result<Vec<Option<ParsedSentence>>>
where
    R: Read,
{
    let reader = BufReader::new(rdr);
    let mut sentences = vec![];
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let sentence = ParsedSentence::parse_line(line);
        if sentence.is_none() {
            tracing::warn!(sid = sentences.len(), "malformed parse data");
        }
        sentences.push(sentence);
    }
    Ok(sentences)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let line = "2\tJohn\twalks\tNNP\tVBZ\tnsubj\troot\t2\t0\t_\t_\tjohn\twalk";
        let sentence = ParsedSentence::parse_line(line).unwrap();
        assert_eq!(2, sentence.tokens().len());
        assert_eq!("walk", sentence.tokens()[1].lemma);
        assert_eq!(
            vec![(2, 1, "nsubj"), (0, 2, "root")],
            sentence.edges().collect::<Vec<_>>()
        );
        assert_eq!(
            vec![(1, "John"), (2, "walks")],
            sentence.nodes().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_missing_block() {
        let line = "2\tJohn\twalks\tNNP\tVBZ\tnsubj\troot\t2\t0\t_\t_";
        assert_eq!(None, ParsedSentence::parse_line(line));
    }

    #[test]
    fn test_bad_head() {
        let line = "1\tHi\tUH\troot\tx\t_\thi";
        assert_eq!(None, ParsedSentence::parse_line(line));
    }

    #[test]
    fn test_bad_count() {
        assert_eq!(None, ParsedSentence::parse_line("two\ta\tb"));
    }

    #[test]
    fn test_sentence_ids_skip_blank_lines() {
        let data = "1\tHi\tUH\troot\t0\t_\thi\n\nbad\n1\tYo\tUH\troot\t0\t_\tyo\n";
        let sentences = read_parses(data.as_bytes()).unwrap();
        assert_eq!(3, sentences.len());
        assert!(sentences[0].is_some());
        assert!(sentences[1].is_none());
        assert_eq!("Yo", sentences[2].as_ref().unwrap().tokens()[0].form);
    }
}
