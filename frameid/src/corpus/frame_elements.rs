//! フレーム要素ファイル（`*.frame.elements`）の読み込み

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read};

use crate::errors::{FrameIdError, Result};
use crate::graph::NodeId;
use crate::utils;

const FRAME_COL: usize = 3;
const LEMMAPOS_COL: usize = 4;
const PREDICATE_COL: usize = 5;
const SID_COL: usize = 7;
const ROLES_COL: usize = 8;

// Upper bound on the number of token ids one span may unroll to.
const MAX_SPAN_LEN: usize = u16::MAX as usize;

/// 一つの述語項構造の注釈
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredicateAnnotation {
    /// 喚起されるフレーム
    pub frame: String,

    /// 述語の lemma.pos（小文字化済み）
    pub lemmapos: String,

    /// `(役割, 役割のスパンのトークンID)` の列
    pub roles: Vec<(String, Vec<NodeId>)>,
}

impl PredicateAnnotation {
    /// トークンIDごとの役割を返します。
    ///
    /// 一つのトークンが複数の役割に含まれる場合は後の役割が優先されます。
    pub fn roles_by_node(&self) -> Vec<(NodeId, &str)> {
        let mut by_node: Vec<(NodeId, &str)> = vec![];
        for (role, span) in &self.roles {
            let role = role.as_str();
            for &id in span {
                match by_node.iter_mut().find(|(n, _)| *n == id) {
                    Some(entry) => entry.1 = role,
                    None => by_node.push((id, role)),
                }
            }
        }
        by_node
    }
}

/// 文IDごと、述語のトークンID列ごとの注釈
pub type SrlData = BTreeMap<usize, BTreeMap<Vec<NodeId>, Vec<PredicateAnnotation>>>;

/// 0 始まりのオフセット表記を 1 始まりのトークンID列に変換します。
///
/// 単一の値はそのまま 1 を加えます。区切り文字で複数の値が与えられた場合は、
/// 隣り合う値の間を両端を含めて展開し、重複を除いてソートします。
///
/// # エラー
///
/// 数値として解釈できない値、1 を加えると桁あふれする値、または展開後の長さが
/// 65535 を超える場合、[`FrameIdError`] が返されます。
///
/// # 例
///
/// ```
/// use frameid::corpus::fix_offsets;
///
/// assert_eq!(fix_offsets("3", ':')?, vec![4]);
/// assert_eq!(fix_offsets("2:5", ':')?, vec![3, 4, 5, 6]);
/// assert_eq!(fix_offsets("6_7_9", '_')?, vec![7, 8, 9, 10]);
/// # Ok::<(), frameid::errors::FrameIdError>(())
/// ```
pub fn fix_offsets(span: &str, sep: char) -> Result<Vec<NodeId>> {
    let values = span
        .split(sep)
        .map(|v| -> Result<NodeId> {
            v.trim().parse::<NodeId>()?.checked_add(1).ok_or_else(|| {
                FrameIdError::invalid_format("offset", format!("offset `{v}` is too large"))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if values.len() <= 1 {
        return Ok(values);
    }
    let len = values
        .windows(2)
        .filter(|w| w[0] <= w[1])
        .fold(0usize, |len, w| len.saturating_add(w[1] - w[0] + 1));
    if len > MAX_SPAN_LEN {
        let msg = format!("span `{span}` unrolls to {len} tokens");
        return Err(FrameIdError::invalid_format("offset", msg));
    }
    let mut unrolled: Vec<NodeId> = values
        .windows(2)
        .flat_map(|w| w[0]..=w[1])
        .collect();
    unrolled.sort_unstable();
    unrolled.dedup();
    Ok(unrolled)
}

/// フレーム要素ファイルを読み込みます。
///
/// タブ区切りで、4列目がフレーム、5列目が lemma.pos、6列目が `_` 区切りの述語オフセット、
/// 8列目が文ID、9列目以降が役割とスパン（`start:end` または単一のオフセット）の組です。
///
/// # エラー
///
/// 列が足りない行や数値として解釈できないオフセットがある場合、
/// [`FrameIdError`] が返されます。
pub fn read_frame_elements<R>(rdr: R) -> Result<SrlData>
where
    R: Read,
{
    let reader = BufReader::new(rdr);
    let mut data = SrlData::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let cols = utils::parse_tsv_row(line)?;
        if cols.len() < ROLES_COL {
            let msg = format!("line {}: expected at least {ROLES_COL} columns", i + 1);
            return Err(FrameIdError::invalid_format("frame.elements", msg));
        }
        let predicate = fix_offsets(&cols[PREDICATE_COL], '_')?;
        let sid: usize = cols[SID_COL].trim().parse()?;
        let role_cols = &cols[ROLES_COL..];
        if role_cols.len() % 2 != 0 {
            tracing::warn!(line = i + 1, "role without a span is ignored");
        }
        let roles = role_cols
            .chunks_exact(2)
            .map(|pair| -> Result<(String, Vec<NodeId>)> {
                Ok((pair[0].clone(), fix_offsets(&pair[1], ':')?))
            })
            .collect::<Result<Vec<_>>>()?;
        data.entry(sid)
            .or_default()
            .entry(predicate)
            .or_default()
            .push(PredicateAnnotation {
                frame: cols[FRAME_COL].clone(),
                lemmapos: cols[LEMMAPOS_COL].to_lowercase(),
                roles,
            });
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_offsets_single() {
        assert_eq!(vec![1], fix_offsets("0", ':').unwrap());
    }

    #[test]
    fn test_fix_offsets_reversed_range_is_empty() {
        assert!(fix_offsets("5:2", ':').unwrap().is_empty());
    }

    #[test]
    fn test_fix_offsets_bad_value() {
        assert!(fix_offsets("a:2", ':').is_err());
    }

    #[test]
    fn test_fix_offsets_overflow() {
        let max = usize::MAX.to_string();
        assert!(matches!(
            fix_offsets(&max, ':'),
            Err(FrameIdError::InvalidFormat(_))
        ));
        assert!(fix_offsets(&format!("0:{max}"), ':').is_err());
    }

    #[test]
    fn test_fix_offsets_huge_span() {
        assert!(matches!(
            fix_offsets("0:4000000000", ':'),
            Err(FrameIdError::InvalidFormat(_))
        ));
        assert_eq!(65535, fix_offsets("0:65534", ':').unwrap().len());
    }

    #[test]
    fn test_read_all_role_pairs() {
        let data = "1\t0.5\t2\tSelf_motion\tWalk.V\t1\twalks\t0\tSelf_mover\t0\tPath\t2:3\n";
        let srl = read_frame_elements(data.as_bytes()).unwrap();
        let annotations = &srl[&0][&vec![2]];
        assert_eq!(1, annotations.len());
        assert_eq!("walk.v", annotations[0].lemmapos);
        assert_eq!(
            vec![
                ("Self_mover".to_string(), vec![1]),
                ("Path".to_string(), vec![3, 4]),
            ],
            annotations[0].roles
        );
    }

    #[test]
    fn test_two_structures_on_one_span() {
        let data = "\
1\t0.5\t0\tMotion\trun.v\t1\truns\t4
1\t0.5\t0\tSelf_motion\trun.v\t1\truns\t4
";
        let srl = read_frame_elements(data.as_bytes()).unwrap();
        assert_eq!(2, srl[&4][&vec![2]].len());
    }

    #[test]
    fn test_short_row() {
        assert!(read_frame_elements("1\t0.5\t0\tMotion\n".as_bytes()).is_err());
    }

    #[test]
    fn test_roles_by_node_last_wins() {
        let annotation = PredicateAnnotation {
            frame: "Motion".to_string(),
            lemmapos: "go.v".to_string(),
            roles: vec![
                ("Theme".to_string(), vec![1, 2]),
                ("Goal".to_string(), vec![2, 3]),
            ],
        };
        assert_eq!(
            vec![(1, "Theme"), (2, "Goal"), (3, "Goal")],
            annotation.roles_by_node()
        );
    }
}
