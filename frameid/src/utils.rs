//! ユーティリティ関数を提供するモジュール
//!
//! 主にタブ区切りファイル（辞書リスト、フレーム要素ファイル、構文解析ファイル）の
//! 行解析を提供します。

use csv_core::ReadFieldResult;

use crate::errors::{FrameIdError, Result};

/// タブ区切りの行を解析してフィールドのベクターに分割する
///
/// 引用符は解釈しません。コーパス中の `"` はそのまま単語として扱われます。
///
/// # 引数
///
/// * `row` - 解析するタブ区切りの文字列（改行を含まないこと）
///
/// # 戻り値
///
/// 解析されたフィールドを格納する文字列のベクター
///
/// # エラー
///
/// 一つのフィールドが内部バッファを超える場合、[`FrameIdError`]が返されます。
///
/// # 例
///
/// ```
/// # use frameid::utils::parse_tsv_row;
/// let fields = parse_tsv_row("Motion\twalk.v").unwrap();
/// assert_eq!(fields, vec!["Motion", "walk.v"]);
///
/// let fields_with_quote = parse_tsv_row("\"\t''").unwrap();
/// assert_eq!(fields_with_quote, vec!["\"", "''"]);
/// ```
pub fn parse_tsv_row(row: &str) -> Result<Vec<String>> {
    let mut fields = vec![];
    let mut rdr = csv_core::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .build();
    let mut bytes = row.as_bytes();
    let mut output = [0; 4096];
    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        let end = match result {
            ReadFieldResult::InputEmpty => true,
            ReadFieldResult::Field { record_end } => record_end,
            ReadFieldResult::End => true,
            ReadFieldResult::OutputFull => {
                return Err(FrameIdError::invalid_format("row", "Field too large"))
            }
        };
        fields.push(std::str::from_utf8(&output[..nout])?.to_string());
        if end {
            break;
        }
        bytes = &bytes[nin..];
    }
    Ok(fields)
}

/// パスの末尾要素（ファイル名）を返します。
///
/// 辞書や埋め込みの出典名として報告に使います。
pub fn source_name(path: &std::path::Path) -> String {
    path.file_name()
        .map_or_else(|| "NA".to_string(), |name| name.to_string_lossy().into_owned())
}
