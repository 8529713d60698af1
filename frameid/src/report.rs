//! タブ区切りの報告を書き出すモジュール
//!
//! 各報告器は作成時にヘッダ行を書き、以後一件ごとに一行を追記します。
//! コーパスの書き出しだけはヘッダを持たず、[`DependencyGraph::pretty`] の出力を
//! そのまま並べます。

use std::io::Write;
use std::time::Duration;

use crate::config::{flag, or_na, ExperimentConfig};
use crate::errors::Result;
use crate::evaluation::Score;
use crate::graph::DependencyGraph;
use crate::lexicon::{FrameId, Lexicon, UNKNOWN_FRAME};

/// 予測結果のヘッダ
pub const RESULT_COLUMNS: [&str; 10] = [
    "gid",
    "sent",
    "lemmapos",
    "pos",
    "predicted_id",
    "true_id",
    "predicted_frame",
    "true_frame",
    "ambig",
    "unknown",
];

/// 集計結果のヘッダ
pub const SUMMARY_COLUMNS: [&str; 24] = [
    "train",
    "test",
    "clf",
    "feats",
    "lex",
    "vsm",
    "MWE_avg",
    "all_unk",
    "num_components",
    "max_sampled",
    "num_epochs",
    "total",
    "correct",
    "ambig",
    "ambig_correct",
    "unambig",
    "unambig_correct",
    "unk",
    "unk_correct",
    "total_acc",
    "ambig_acc",
    "unambig_acc",
    "unk_acc",
    "time",
];

/// 辞書のヘッダ
pub const LEXICON_COLUMNS: [&str; 2] = ["lemma", "frames"];

const MISSING_ID: &str = "-1";

fn write_row<W, S>(wtr: &mut W, fields: &[S]) -> Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    for (i, field) in fields.iter().enumerate() {
        if i != 0 {
            wtr.write_all(b"\t")?;
        }
        wtr.write_all(field.as_ref().as_bytes())?;
    }
    wtr.write_all(b"\n")?;
    Ok(())
}

fn frame_id_label(id: Option<FrameId>) -> String {
    id.map_or_else(|| MISSING_ID.to_string(), |id| id.to_string())
}

fn frame_label(lexicon: &Lexicon, id: Option<FrameId>) -> &str {
    id.and_then(|id| lexicon.frame(id)).unwrap_or(UNKNOWN_FRAME)
}

/// 予測結果の報告器
pub struct ResultReporter<W> {
    wtr: W,
}

impl<W> ResultReporter<W>
where
    W: Write,
{
    /// ヘッダ行を書いて報告器を作成します。
    ///
    /// # エラー
    ///
    /// 書き込みに失敗した場合、[`FrameIdError`](crate::errors::FrameIdError) が返されます。
    pub fn new(mut wtr: W) -> Result<Self> {
        write_row(&mut wtr, &RESULT_COLUMNS)?;
        Ok(Self { wtr })
    }

    /// 一インスタンスの予測結果を書きます。
    ///
    /// 品詞列は lemma.pos の `.` 以降の部分です。IDを持たない正解フレームは
    /// ID `-1`、フレーム名 `UNKNOWN_FRAME` になります。
    pub fn report(
        &mut self,
        graph: &DependencyGraph,
        lemmapos: &str,
        predicted: FrameId,
        gold: Option<FrameId>,
        lexicon: &Lexicon,
    ) -> Result<()> {
        let gid = or_na(graph.gid());
        let pos = lemmapos.split('.').nth(1).unwrap_or("_");
        let predicted_id = predicted.to_string();
        let gold_id = frame_id_label(gold);
        write_row(
            &mut self.wtr,
            &[
                gid.as_str(),
                graph.sentence(),
                lemmapos,
                pos,
                predicted_id.as_str(),
                gold_id.as_str(),
                frame_label(lexicon, Some(predicted)),
                frame_label(lexicon, gold),
                flag(lexicon.is_ambiguous(lemmapos)),
                flag(lexicon.is_unknown(lemmapos)),
            ],
        )
    }

    /// 内部のライタを返します。
    pub fn into_inner(self) -> W {
        self.wtr
    }
}

/// 集計結果の報告器
pub struct SummaryReporter<W> {
    wtr: W,
}

impl<W> SummaryReporter<W>
where
    W: Write,
{
    /// ヘッダ行を書いて報告器を作成します。
    pub fn new(mut wtr: W) -> Result<Self> {
        write_row(&mut wtr, &SUMMARY_COLUMNS)?;
        Ok(Self { wtr })
    }

    /// 一つの学習・評価コーパスの組の集計結果を書きます。
    ///
    /// # 引数
    ///
    /// * `train` - 学習コーパス名
    /// * `test` - 評価コーパス名
    /// * `config` - 実験設定
    /// * `score` - 集計結果
    /// * `elapsed` - 評価にかかった時間
    pub fn report(
        &mut self,
        train: &str,
        test: &str,
        config: &ExperimentConfig,
        score: &Score,
        elapsed: Duration,
    ) -> Result<()> {
        let fields = [
            train.to_string(),
            test.to_string(),
            config.classifier_kind().to_string(),
            config.mapper_kind().to_string(),
            or_na(config.lexicon_name()),
            or_na(config.embeddings_name()),
            flag(config.is_multiword_averaging()).to_string(),
            flag(config.is_all_unknown()).to_string(),
            or_na(config.get_num_components()),
            or_na(config.get_max_sampled()),
            or_na(config.get_num_epochs()),
            score.total.to_string(),
            score.correct.to_string(),
            score.total_ambiguous.to_string(),
            score.correct_ambiguous.to_string(),
            score.total_unambiguous.to_string(),
            score.correct_unambiguous.to_string(),
            score.total_unknown.to_string(),
            score.correct_unknown.to_string(),
            score.accuracy().to_string(),
            score.ambiguous_accuracy().to_string(),
            score.unambiguous_accuracy().to_string(),
            score.unknown_accuracy().to_string(),
            elapsed.as_secs_f64().to_string(),
        ];
        write_row(&mut self.wtr, &fields)
    }

    /// 内部のライタを返します。
    pub fn into_inner(self) -> W {
        self.wtr
    }
}

/// 辞書の内容を書きます。
///
/// lemma.pos はソート順で、フレームは `ID: フレーム` を `, ` で連結したものです。
pub fn write_lexicon<W>(mut wtr: W, lexicon: &Lexicon) -> Result<()>
where
    W: Write,
{
    write_row(&mut wtr, &LEXICON_COLUMNS)?;
    for lemma in lexicon.lemmas() {
        let frames = lexicon
            .frames(lemma)
            .iter()
            .map(|frame| {
                let id = lexicon.frame_id(frame);
                format!("{}: {frame}", frame_id_label(id))
            })
            .collect::<Vec<_>>()
            .join(", ");
        write_row(&mut wtr, &[lemma, frames.as_str()])?;
    }
    Ok(())
}

/// グラフ列を診断用の多列テキストで書きます。
///
/// 各グラフの後には空行が入ります。
pub fn write_corpus<'a, W, I>(mut wtr: W, graphs: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a DependencyGraph>,
{
    for graph in graphs {
        wtr.write_all(graph.pretty().as_bytes())?;
        wtr.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::classifier::ClassifierKind;
    use crate::lexicon::LexiconSource;
    use crate::mapper::MapperKind;

    fn lexicon() -> Lexicon {
        Lexicon::from_pairs(
            [("Motion", "walk.v"), ("Self_motion", "walk.v"), ("Placing", "put.v")],
            LexiconSource::TrainingData,
        )
    }

    fn graph() -> DependencyGraph {
        let mut g = DependencyGraph::new(
            [(1, "John"), (2, "walks")],
            [(2, 1, "nsubj"), (0, 2, "root")],
        )
        .unwrap();
        g.attach_predicate_and_roles(&[2], "Motion", "walk.v", [(1, "Theme")])
            .unwrap();
        g.set_gid(5);
        g
    }

    #[test]
    fn test_result_row() {
        let lexicon = lexicon();
        let mut reporter = ResultReporter::new(vec![]).unwrap();
        reporter
            .report(&graph(), "walk.v", FrameId::new(1), None, &lexicon)
            .unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(RESULT_COLUMNS.join("\t"), lines[0]);
        assert_eq!(
            "5\tJohn walks\twalk.v\tv\t1\t-1\tSelf_motion\tUNKNOWN_FRAME\tTrue\tFalse",
            lines[1]
        );
    }

    #[test]
    fn test_summary_row() {
        let config =
            ExperimentConfig::new(ClassifierKind::FrequencyBaselineByLemma, MapperKind::Dummy);
        let mut score = Score::new();
        score.consume(true, false, false, Some(FrameId::new(0)));
        score.consume(false, true, false, Some(FrameId::new(0)));
        let mut reporter = SummaryReporter::new(vec![]).unwrap();
        reporter
            .report("train", "test", &config, &score, Duration::from_millis(1500))
            .unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        let row: Vec<&str> = out.lines().nth(1).unwrap().split('\t').collect();
        assert_eq!(SUMMARY_COLUMNS.len(), row.len());
        assert_eq!(
            &["train", "test", "DataMajorityBaseline", "DummyMapper", "NA", "NA", "False", "False"],
            &row[..8]
        );
        assert_eq!(&["NA", "NA", "NA", "2", "1", "1", "0", "1", "1", "0", "0"], &row[8..19]);
        assert_eq!(&["0.5", "0", "1", "0", "1.5"], &row[19..]);
    }

    #[test]
    fn test_lexicon_rows() {
        let mut out = vec![];
        write_lexicon(&mut out, &lexicon()).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            "lemma\tframes\nput.v\t2: Placing\nwalk.v\t0: Motion, 1: Self_motion\n",
            out
        );
    }

    #[test]
    fn test_corpus_echo() {
        let mut out = vec![];
        write_corpus(&mut out, [&graph()]).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            "5\t1\tJohn\t2\tnsubj\tTheme\t_\n5\t2\twalks\t0\troot\t_\tMotion\n\n",
            out
        );
    }

    #[test]
    fn test_write_through_buffered_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.conll");
        let mut wtr = std::io::BufWriter::new(std::fs::File::create(&path).unwrap());
        write_corpus(&mut wtr, [&graph()]).unwrap();
        write_lexicon(&mut wtr, &lexicon()).unwrap();
        wtr.flush().unwrap();
        let out = std::fs::read_to_string(&path).unwrap();
        assert!(out.starts_with("5\t1\tJohn"));
        assert!(out.ends_with("walk.v\t0: Motion, 1: Self_motion\n"));
    }
}
