//! テスト用ユーティリティ
//!
//! テストコードで使用する便利なマクロや関数を提供します。

use crate::graph::DependencyGraph;

macro_rules! hashmap {
    ( $($k:expr => $v:expr,)* ) => {
        {
            #[allow(unused_mut)]
            let mut h = hashbrown::HashMap::new();
            $(
                h.insert($k, $v);
            )*
            h
        }
    };
    ( $($k:expr => $v:expr),* ) => {
        hashmap![$( $k => $v, )*]
    };
}

pub(crate) use hashmap;

/// 小さなコーパスを読み込んでグラフ列を返します。
pub(crate) fn load_graphs(parses: &str, frame_elements: &str) -> Vec<DependencyGraph> {
    crate::corpus::Corpus::from_readers(parses.as_bytes(), frame_elements.as_bytes(), "test")
        .unwrap()
        .into_graphs()
}
