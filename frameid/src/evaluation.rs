//! 予測結果の集計
//!
//! [`Score`] は正解数と総数を、曖昧な lemma・曖昧でない lemma・未知の lemma の
//! 部分集合ごとに数えます。

use crate::lexicon::FrameId;

/// 正解率を返します。分母が 0 の場合は 0 です。
///
/// # 例
///
/// ```
/// use frameid::evaluation::accuracy;
///
/// assert_eq!(0.75, accuracy(3, 4));
/// assert_eq!(0.0, accuracy(0, 0));
/// ```
pub fn accuracy(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

/// 予測結果の集計器
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Score {
    /// 集計したインスタンス数
    pub total: usize,
    /// 正解数
    pub correct: usize,
    /// 曖昧な lemma のインスタンス数
    pub total_ambiguous: usize,
    /// 曖昧な lemma の正解数
    pub correct_ambiguous: usize,
    /// 曖昧でない lemma のインスタンス数
    pub total_unambiguous: usize,
    /// 曖昧でない lemma の正解数
    pub correct_unambiguous: usize,
    /// 未知の lemma のインスタンス数
    pub total_unknown: usize,
    /// 未知の lemma の正解数
    pub correct_unknown: usize,

    skip_unknown_frames: bool,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    /// 正解フレームがIDを持たないインスタンスを読み飛ばす集計器を作成します。
    pub fn new() -> Self {
        Self {
            total: 0,
            correct: 0,
            total_ambiguous: 0,
            correct_ambiguous: 0,
            total_unambiguous: 0,
            correct_unambiguous: 0,
            total_unknown: 0,
            correct_unknown: 0,
            skip_unknown_frames: true,
        }
    }

    /// 正解フレームがIDを持たないインスタンスを読み飛ばすかどうかを指定します。
    ///
    /// 辞書にも学習データにもないフレームはどの分類器も予測できません。
    pub fn skip_unknown_frames(mut self, yes: bool) -> Self {
        self.skip_unknown_frames = yes;
        self
    }

    /// 一インスタンスの結果を集計します。
    ///
    /// # 引数
    ///
    /// * `correct` - 予測が正解と一致したか
    /// * `ambiguous` - lemma.pos が曖昧か
    /// * `unknown` - lemma.pos が辞書にないか
    /// * `gold` - 正解フレームのID
    pub fn consume(
        &mut self,
        correct: bool,
        ambiguous: bool,
        unknown: bool,
        gold: Option<FrameId>,
    ) {
        if self.skip_unknown_frames && gold.is_none() {
            return;
        }
        self.total += 1;
        self.correct += usize::from(correct);
        if ambiguous {
            self.total_ambiguous += 1;
            self.correct_ambiguous += usize::from(correct);
        } else {
            self.total_unambiguous += 1;
            self.correct_unambiguous += usize::from(correct);
        }
        if unknown {
            self.total_unknown += 1;
            self.correct_unknown += usize::from(correct);
        }
    }

    /// 全体の正解率
    pub fn accuracy(&self) -> f64 {
        accuracy(self.correct, self.total)
    }

    /// 曖昧な lemma の正解率
    pub fn ambiguous_accuracy(&self) -> f64 {
        accuracy(self.correct_ambiguous, self.total_ambiguous)
    }

    /// 曖昧でない lemma の正解率
    pub fn unambiguous_accuracy(&self) -> f64 {
        accuracy(self.correct_unambiguous, self.total_unambiguous)
    }

    /// 未知の lemma の正解率
    pub fn unknown_accuracy(&self) -> f64 {
        accuracy(self.correct_unknown, self.total_unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume() {
        let mut score = Score::new();
        let gold = Some(FrameId::new(0));
        score.consume(true, true, false, gold);
        score.consume(false, true, false, gold);
        score.consume(true, false, true, gold);
        assert_eq!(3, score.total);
        assert_eq!(2, score.correct);
        assert_eq!(2, score.total_ambiguous);
        assert_eq!(1, score.correct_ambiguous);
        assert_eq!(1, score.total_unambiguous);
        assert_eq!(1, score.correct_unambiguous);
        assert_eq!(1, score.total_unknown);
        assert_eq!(1, score.correct_unknown);
        assert_eq!(0.5, score.ambiguous_accuracy());
    }

    #[test]
    fn test_unknown_gold_is_skipped() {
        let mut score = Score::new();
        score.consume(false, false, true, None);
        assert_eq!(Score::new(), score);
    }

    #[test]
    fn test_unknown_gold_is_counted() {
        let mut score = Score::new().skip_unknown_frames(false);
        score.consume(false, false, true, None);
        assert_eq!(1, score.total);
        assert_eq!(0.0, score.accuracy());
    }

    #[test]
    fn test_empty_accuracies() {
        let score = Score::default();
        assert_eq!(0.0, score.accuracy());
        assert_eq!(0.0, score.unknown_accuracy());
    }
}
