//! 文脈とフレームの同時埋め込みによるランキングモデル
//!
//! 文脈ベクトル `x` は射影行列 `U` で潜在空間 `u = xU` に写され、各フレームは
//! 同じ空間の埋め込み `v_f` を持ちます。学習は WARP 損失で行います。各インスタンスの
//! 正解フレームを正例とし、その他のフレームから負例を一様に抽出して、
//! マージンを破る負例が見つかった時点で更新します。更新の重みは負例が見つかるまでの
//! 試行回数が少ないほど大きくなります。予測では `u` と各 `v_f` のコサイン類似度を
//! スコアとします。

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::classifier::{ClassifierConfig, Instance};
use crate::errors::{FrameIdError, Result};
use crate::num;

const MARGIN: f32 = 1.0;
const EPSILON: f32 = 1e-6;
const USER_ALPHA: f32 = 1e-6;

/// ランキングモデル
pub struct RankingModel {
    input_dim: usize,
    // input_dim x num_components
    user: Vec<Vec<f32>>,
    // num_frames x num_components
    items: Vec<Vec<f32>>,
}

fn init_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Vec<Vec<f32>> {
    let scale = 1.0 / cols as f32;
    (0..rows)
        .map(|_| (0..cols).map(|_| (rng.gen::<f32>() - 0.5) * scale).collect())
        .collect()
}

fn adagrad_step(param: &mut [f32], accum: &mut [f32], grad: &[f32], learning_rate: f32) {
    for ((p, a), g) in param.iter_mut().zip(accum.iter_mut()).zip(grad) {
        *a += g * g;
        *p -= learning_rate * g / (a.sqrt() + EPSILON);
    }
}

impl RankingModel {
    pub(crate) fn train(
        instances: &[Instance],
        num_frames: usize,
        config: &ClassifierConfig,
    ) -> Result<Self> {
        let Some(first) = instances.first() else {
            return Err(FrameIdError::EmptyTrainingSet);
        };
        if num_frames == 0 {
            return Err(FrameIdError::invalid_state(
                "cannot train a ranking model",
                "the lexicon has no frames",
            ));
        }
        let input_dim = first.features.len();
        let k = config.get_num_components();
        let max_sampled = config.get_max_sampled();
        let learning_rate = config.effective_learning_rate();

        let mut rng = StdRng::seed_from_u64(config.get_seed());
        let mut model = Self {
            input_dim,
            user: init_matrix(&mut rng, input_dim, k),
            items: init_matrix(&mut rng, num_frames, k),
        };
        let mut user_accum = vec![vec![0.0; k]; input_dim];
        let mut item_accum = vec![vec![0.0; k]; num_frames];

        let mut order: Vec<usize> = (0..instances.len()).collect();
        for epoch in 0..config.effective_num_epochs() {
            order.shuffle(&mut rng);
            let mut violations = 0usize;
            for &i in &order {
                let instance = &instances[i];
                let pos = instance.label.index();
                if num_frames < 2 || pos >= num_frames {
                    continue;
                }
                let u = model.project(instance.features);
                let pos_score = num::dot(&u, &model.items[pos]);
                for trial in 1..=max_sampled {
                    let mut neg = rng.gen_range(0..num_frames - 1);
                    if neg >= pos {
                        neg += 1;
                    }
                    if num::dot(&u, &model.items[neg]) <= pos_score - MARGIN {
                        continue;
                    }
                    let weight = (1.0 + ((num_frames - 1) / trial) as f32).ln();
                    let grad_u: Vec<f32> = model.items[neg]
                        .iter()
                        .zip(&model.items[pos])
                        .map(|(n, p)| weight * (n - p))
                        .collect();
                    let grad_pos: Vec<f32> = u.iter().map(|x| -weight * x).collect();
                    let grad_neg: Vec<f32> = u.iter().map(|x| weight * x).collect();
                    let items = &mut model.items;
                    adagrad_step(&mut items[pos], &mut item_accum[pos], &grad_pos, learning_rate);
                    adagrad_step(&mut items[neg], &mut item_accum[neg], &grad_neg, learning_rate);
                    for (j, &x) in instance.features.iter().enumerate() {
                        if x == 0.0 {
                            continue;
                        }
                        let grad: Vec<f32> = grad_u
                            .iter()
                            .zip(&model.user[j])
                            .map(|(g, w)| x * g + USER_ALPHA * w)
                            .collect();
                        adagrad_step(&mut model.user[j], &mut user_accum[j], &grad, learning_rate);
                    }
                    violations += 1;
                    break;
                }
            }
            tracing::debug!(epoch, violations, "ranking epoch finished");
        }
        Ok(model)
    }

    /// 学習に使った素性ベクトルの次元数
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn project(&self, features: &[f32]) -> Vec<f32> {
        let k = self.items.first().map_or(0, Vec::len);
        let mut u = vec![0.0; k];
        for (&x, row) in features.iter().zip(&self.user) {
            if x == 0.0 {
                continue;
            }
            for (u_c, w) in u.iter_mut().zip(row) {
                *u_c += x * w;
            }
        }
        u
    }

    /// 全フレームに対するコサイン類似度
    pub fn scores(&self, features: &[f32]) -> Vec<f32> {
        let u = self.project(features);
        self.items.iter().map(|v| num::cosine(&u, v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::classifier::ClassifierKind;
    use crate::lexicon::FrameId;

    static LEFT: [f32; 2] = [1.0, 0.0];
    static RIGHT: [f32; 2] = [0.0, 1.0];

    fn instances() -> Vec<Instance<'static>> {
        let mut instances = vec![];
        for _ in 0..10 {
            instances.push(Instance {
                features: &LEFT,
                label: FrameId::new(0),
                lemmapos: "walk.v",
            });
            instances.push(Instance {
                features: &RIGHT,
                label: FrameId::new(1),
                lemmapos: "walk.v",
            });
        }
        instances
    }

    fn config() -> ClassifierConfig {
        ClassifierConfig::new(ClassifierKind::RankingEmbedding)
            .num_components(8)
            .max_sampled(5)
            .num_epochs(200)
            .seed(1)
    }

    #[test]
    fn test_separable_contexts() {
        let model = RankingModel::train(&instances(), 2, &config()).unwrap();
        let left = model.scores(&LEFT);
        let right = model.scores(&RIGHT);
        assert!(left[0] > left[1]);
        assert!(right[1] > right[0]);
    }

    #[test]
    fn test_same_seed_same_model() {
        let a = RankingModel::train(&instances(), 2, &config()).unwrap();
        let b = RankingModel::train(&instances(), 2, &config()).unwrap();
        assert_eq!(a.scores(&LEFT), b.scores(&LEFT));
    }

    #[test]
    fn test_zero_context_scores_zero() {
        let model = RankingModel::train(&instances(), 2, &config()).unwrap();
        assert_eq!(vec![0.0, 0.0], model.scores(&[0.0, 0.0]));
    }

    #[test]
    fn test_remembers_input_dim() {
        let model = RankingModel::train(&instances(), 2, &config().num_epochs(1)).unwrap();
        assert_eq!(2, model.input_dim());
    }
}
