//! フィードフォワードネットワークによる多クラス分類器
//!
//! 構成は `入力 -> 256 (ReLU) -> 100 (ReLU) -> フレーム数 (softmax)` で、
//! 交差エントロピー損失を AdaGrad によるミニバッチ学習で最小化します。
//! 出力層はフレーム全体を覆い、候補の制限は分類器側で行います。

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::classifier::{ClassifierConfig, Instance};
use crate::errors::{FrameIdError, Result};

const HIDDEN_DIMS: [usize; 2] = [256, 100];
const BATCH_SIZE: usize = 32;
const EPSILON: f32 = 1e-7;

/// 全結合層
struct Dense {
    in_dim: usize,
    out_dim: usize,
    // in_dim x out_dim, row-major
    weight: Vec<f32>,
    bias: Vec<f32>,
    grad_weight: Vec<f32>,
    grad_bias: Vec<f32>,
    accum_weight: Vec<f32>,
    accum_bias: Vec<f32>,
}

impl Dense {
    /// Glorot の一様分布で重みを初期化します。
    fn new(rng: &mut StdRng, in_dim: usize, out_dim: usize) -> Self {
        let limit = (6.0 / (in_dim + out_dim) as f32).sqrt();
        let weight = (0..in_dim * out_dim)
            .map(|_| rng.gen_range(-limit..limit))
            .collect();
        Self {
            in_dim,
            out_dim,
            weight,
            bias: vec![0.0; out_dim],
            grad_weight: vec![0.0; in_dim * out_dim],
            grad_bias: vec![0.0; out_dim],
            accum_weight: vec![0.0; in_dim * out_dim],
            accum_bias: vec![0.0; out_dim],
        }
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut out = self.bias.clone();
        for (&x, row) in input.iter().zip(self.weight.chunks_exact(self.out_dim)) {
            if x == 0.0 {
                continue;
            }
            for (o, w) in out.iter_mut().zip(row) {
                *o += x * w;
            }
        }
        out
    }

    /// 勾配を蓄積し、入力に対する勾配を返します。
    fn backward(&mut self, input: &[f32], grad_output: &[f32]) -> Vec<f32> {
        let mut grad_input = vec![0.0; self.in_dim];
        let rows = self
            .weight
            .chunks_exact(self.out_dim)
            .zip(self.grad_weight.chunks_exact_mut(self.out_dim));
        for ((&x, (row, grad_row)), gi) in input.iter().zip(rows).zip(&mut grad_input) {
            for ((w, gw), g) in row.iter().zip(grad_row).zip(grad_output) {
                *gw += x * g;
                *gi += w * g;
            }
        }
        for (gb, g) in self.grad_bias.iter_mut().zip(grad_output) {
            *gb += g;
        }
        grad_input
    }

    fn step(&mut self, learning_rate: f32, batch: usize) {
        let scale = 1.0 / batch as f32;
        let params = self.weight.iter_mut().chain(self.bias.iter_mut());
        let grads = self.grad_weight.iter_mut().chain(self.grad_bias.iter_mut());
        let accums = self.accum_weight.iter_mut().chain(self.accum_bias.iter_mut());
        for ((p, g), a) in params.zip(grads).zip(accums) {
            let grad = *g * scale;
            *a += grad * grad;
            *p -= learning_rate * grad / (a.sqrt() + EPSILON);
            *g = 0.0;
        }
    }
}

fn relu(v: &mut [f32]) {
    for x in v {
        *x = x.max(0.0);
    }
}

fn softmax(v: &mut [f32]) {
    let max = v.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0;
    for x in v.iter_mut() {
        *x = (*x - max).exp();
        sum += *x;
    }
    for x in v.iter_mut() {
        *x /= sum;
    }
}

/// フィードフォワードネットワーク
pub struct FeedForwardNet {
    input_dim: usize,
    layers: Vec<Dense>,
}

impl FeedForwardNet {
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
                "cannot train a feed-forward network",
                "the lexicon has no frames",
            ));
        }
        let mut rng = StdRng::seed_from_u64(config.get_seed());
        let input_dim = first.features.len();
        let mut dims = vec![input_dim];
        dims.extend(HIDDEN_DIMS);
        dims.push(num_frames);
        let mut net = Self {
            input_dim,
            layers: dims
                .windows(2)
                .map(|w| Dense::new(&mut rng, w[0], w[1]))
                .collect(),
        };
        let learning_rate = config.effective_learning_rate();

        let mut order: Vec<usize> = (0..instances.len()).collect();
        for epoch in 0..config.effective_num_epochs() {
            order.shuffle(&mut rng);
            let mut loss = 0.0;
            for batch in order.chunks(BATCH_SIZE) {
                for &i in batch {
                    loss += net.accumulate(&instances[i]);
                }
                for layer in &mut net.layers {
                    layer.step(learning_rate, batch.len());
                }
            }
            tracing::debug!(epoch, loss = loss / instances.len() as f32, "epoch finished");
        }
        Ok(net)
    }

    /// 学習に使った素性ベクトルの次元数
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// 各層の出力（活性化後）を返します。先頭は入力です。
    fn activations(&self, features: &[f32]) -> Vec<Vec<f32>> {
        let mut acts = vec![features.to_vec()];
        for (l, layer) in self.layers.iter().enumerate() {
            let mut out = layer.forward(&acts[l]);
            if l + 1 == self.layers.len() {
                softmax(&mut out);
            } else {
                relu(&mut out);
            }
            acts.push(out);
        }
        acts
    }

    /// 一インスタンス分の勾配を蓄積し、その損失を返します。
    fn accumulate(&mut self, instance: &Instance) -> f32 {
        let acts = self.activations(instance.features);
        let label = instance.label.index();
        let Some(probs) = acts.last() else {
            return 0.0;
        };
        let loss = -probs.get(label).map_or(0.0, |p| p.max(f32::MIN_POSITIVE).ln());
        let mut grad: Vec<f32> = probs.clone();
        if let Some(g) = grad.get_mut(label) {
            *g -= 1.0;
        }
        for (l, layer) in self.layers.iter_mut().enumerate().rev() {
            grad = layer.backward(&acts[l], &grad);
            if l != 0 {
                for (g, a) in grad.iter_mut().zip(&acts[l]) {
                    if *a <= 0.0 {
                        *g = 0.0;
                    }
                }
            }
        }
        loss
    }

    /// 全フレームに対する事後確率
    pub fn scores(&self, features: &[f32]) -> Vec<f32> {
        self.activations(features).pop().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::classifier::ClassifierKind;
    use crate::lexicon::FrameId;

    static FEATURES: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    fn instances() -> Vec<Instance<'static>> {
        let mut instances = vec![];
        for _ in 0..8 {
            for (i, features) in FEATURES.iter().enumerate() {
                instances.push(Instance {
                    features,
                    label: FrameId::new(i as u32),
                    lemmapos: "walk.v",
                });
            }
        }
        instances
    }

    fn config() -> ClassifierConfig {
        ClassifierConfig::new(ClassifierKind::FeedForward)
            .num_epochs(100)
            .seed(3)
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let mut v = vec![1.0, 2.0, 3.0];
        softmax(&mut v);
        assert!((v.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!(v[2] > v[1] && v[1] > v[0]);
    }

    #[test]
    fn test_learns_separable_classes() {
        let net = FeedForwardNet::train(&instances(), 3, &config()).unwrap();
        for (i, features) in FEATURES.iter().enumerate() {
            let scores = net.scores(features);
            assert_eq!(3, scores.len());
            let best = crate::num::argmax_among(0..3, &scores);
            assert_eq!(Some(i), best);
        }
    }

    #[test]
    fn test_output_covers_frame_inventory() {
        // Frames never seen in training still get a score.
        let net = FeedForwardNet::train(&instances(), 5, &config()).unwrap();
        assert_eq!(5, net.scores(&FEATURES[0]).len());
    }

    #[test]
    fn test_remembers_input_dim() {
        let net = FeedForwardNet::train(&instances(), 3, &config().num_epochs(1)).unwrap();
        assert_eq!(3, net.input_dim());
    }
}
