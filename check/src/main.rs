//! コーパスの読み込み結果を確認するユーティリティ
//!
//! 指定されたコーパスを読み込み、構築した依存グラフを `<corpus>.conll` に書き出します。

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use frameid::corpus::Corpus;
use frameid::errors::FrameIdError;
use frameid::report;
use frameid::resources::ResourceLayout;

#[derive(Parser, Debug)]
#[clap(name = "check", about = "Load corpora and echo their dependency graphs")]
struct Args {
    /// Resource root containing `srl_data/` and `out/`.
    #[clap(short = 'r', long)]
    root: PathBuf,

    /// Corpus names under `srl_data/corpora/`.
    ///
    /// Specify comma-separated names.
    #[clap(short = 'c', long, value_delimiter(','), required = true)]
    corpora: Vec<String>,

    /// Output directory. Defaults to `out/` under the resource root.
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CheckError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// コーパスの読み込みエラー
    #[error(transparent)]
    FrameId(#[from] FrameIdError),
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), CheckError> {
    init_logging();
    let args = Args::parse();

    let layout = ResourceLayout::new(&args.root);
    let out = args.out.clone().unwrap_or_else(|| layout.out());
    fs::create_dir_all(&out)?;

    for name in &args.corpora {
        let (parses, frame_elements) = layout.corpus(name);
        let corpus = Corpus::from_paths(parses, frame_elements)?;
        let path = out.join(format!("{name}.conll"));
        let mut wtr = BufWriter::new(File::create(&path)?);
        report::write_corpus(&mut wtr, corpus.iter())?;
        wtr.flush()?;
        tracing::info!(corpus = name, graphs = corpus.len(), path = %path.display(), "written");
    }

    Ok(())
}
