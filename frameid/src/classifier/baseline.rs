//! 頻度に基づくベースライン分類器

use hashbrown::HashMap;

use crate::classifier::Instance;

fn count(counts: &mut [f32], instance: &Instance) {
    if let Some(c) = counts.get_mut(instance.label.index()) {
        *c += 1.0;
    }
}

/// lemma.pos ごとのフレーム頻度
///
/// 学習データに現れた lemma.pos ではその lemma.pos の頻度を、現れなかった lemma.pos
/// では全インスタンスにわたる頻度をスコアとします。全体の頻度は既知の lemma.pos の
/// インスタンスも含めて数えます。
pub struct LemmaFrequency {
    global: Vec<f32>,
    by_lemma: HashMap<String, Vec<f32>>,
}

impl LemmaFrequency {
    pub(crate) fn train(instances: &[Instance], num_frames: usize) -> Self {
        let mut global = vec![0.0; num_frames];
        let mut by_lemma: HashMap<String, Vec<f32>> = HashMap::new();
        for instance in instances {
            count(&mut global, instance);
            let counts = by_lemma
                .entry_ref(instance.lemmapos)
                .or_insert_with(|| vec![0.0; num_frames]);
            count(counts, instance);
        }
        Self { global, by_lemma }
    }

    /// フレームごとのスコア
    ///
    /// `lemmapos` が `None` の場合は全体の頻度を返します。
    pub fn scores(&self, lemmapos: Option<&str>) -> Vec<f32> {
        lemmapos
            .and_then(|l| self.by_lemma.get(l))
            .unwrap_or(&self.global)
            .clone()
    }
}

/// 全体のフレーム頻度
///
/// 候補の制限は分類器側で行うため、学習データに現れなかった候補のスコアは 0 です。
pub struct LexiconFrequency {
    global: Vec<f32>,
}

impl LexiconFrequency {
    pub(crate) fn train(instances: &[Instance], num_frames: usize) -> Self {
        let mut global = vec![0.0; num_frames];
        for instance in instances {
            count(&mut global, instance);
        }
        Self { global }
    }

    /// フレームごとのスコア
    pub fn scores(&self) -> Vec<f32> {
        self.global.clone()
    }
}
