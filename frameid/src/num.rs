//! 数値ベクトルのユーティリティを提供するモジュール
//!
//! 埋め込みの平均、内積、コサイン類似度、候補集合に制限した argmax など、
//! 素性抽出と分類器の双方から使われる小さな演算をまとめています。

/// 二つのベクトルの内積を計算します。
///
/// 長さが異なる場合は短い方に合わせます。
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// ベクトルのL2ノルムを計算します。
#[inline]
pub fn norm(a: &[f32]) -> f32 {
    dot(a, a).sqrt()
}

/// 二つのベクトルのコサイン類似度を計算します。
///
/// どちらかがゼロベクトルの場合は 0.0 を返します。
///
/// # 例
///
/// ```
/// # use frameid::num::cosine;
/// assert_eq!(cosine(&[1.0, 0.0], &[2.0, 0.0]), 1.0);
/// assert_eq!(cosine(&[0.0, 0.0], &[2.0, 0.0]), 0.0);
/// ```
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let denom = norm(a) * norm(b);
    if denom == 0.0 {
        return 0.0;
    }
    dot(a, b) / denom
}

/// ベクトル群の要素ごとの平均を計算します。
///
/// # 引数
///
/// * `vectors` - 平均を取るベクトルのイテレータ。すべて `dim` 次元であること。
/// * `dim` - 出力の次元数
///
/// # 戻り値
///
/// 平均ベクトル。入力が空の場合は `dim` 次元のゼロベクトル。
pub fn mean<'a, I>(vectors: I, dim: usize) -> Vec<f32>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut sum = vec![0f32; dim];
    let mut count = 0usize;
    for v in vectors {
        debug_assert_eq!(v.len(), dim);
        for (s, x) in sum.iter_mut().zip(v) {
            *s += x;
        }
        count += 1;
    }
    if count != 0 {
        let scale = 1.0 / count as f32;
        for s in &mut sum {
            *s *= scale;
        }
    }
    sum
}

/// 候補の中から最大スコアのものを返します。
///
/// 同点の場合は候補列で最初に最大値に達したものを選びます。
/// スコアが範囲外の候補（`scores.len()` 以上）と NaN は負の無限大として扱います。
///
/// # 引数
///
/// * `candidates` - 候補インデックスの列（格納順に走査）
/// * `scores` - 全クラスのスコア
///
/// # 戻り値
///
/// 候補が空の場合は `None`
pub fn argmax_among<I>(candidates: I, scores: &[f32]) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut best: Option<(usize, f32)> = None;
    for c in candidates {
        let score = match scores.get(c) {
            Some(&s) if !s.is_nan() => s,
            _ => f32::NEG_INFINITY,
        };
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((c, score)),
        }
    }
    best.map(|(c, _)| c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        let a = [1.0, 2.0];
        let b = [3.0, 4.0];
        assert_eq!(vec![2.0, 3.0], mean([&a[..], &b[..]], 2));
    }

    #[test]
    fn test_mean_of_nothing_is_zero() {
        assert_eq!(vec![0.0, 0.0, 0.0], mean(std::iter::empty(), 3));
    }

    #[test]
    fn test_argmax_first_wins_on_tie() {
        let scores = [0.5, 0.9, 0.9, 0.1];
        assert_eq!(Some(1), argmax_among([0, 1, 2, 3], &scores));
        assert_eq!(Some(2), argmax_among([2, 1], &scores));
    }

    #[test]
    fn test_argmax_empty() {
        assert_eq!(None, argmax_among(std::iter::empty(), &[1.0]));
    }

    #[test]
    fn test_argmax_nan_does_not_win() {
        let scores = [f32::NAN, 0.2, f32::NAN];
        assert_eq!(Some(1), argmax_among([0, 1], &scores));
        assert_eq!(Some(1), argmax_among([1, 2], &scores));
    }
}
