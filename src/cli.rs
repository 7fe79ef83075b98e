//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "corpus-pairs",
    about = "prompt/text stream generation from raw corpora."
)]
/// Holds every command that is callable by the `corpus-pairs` command.
pub enum CorpusPairs {
    #[structopt(about = "Convert a corpus into aligned prompt/text files")]
    Convert(Convert),
    #[structopt(about = "List known corpora")]
    List(List),
    #[structopt(about = "Check alignment of prompt/text files and count their size")]
    Check(Check),
}

#[derive(Debug, StructOpt)]
/// Convert command and parameters.
///
/// ```sh
/// corpus-pairs convert zhidao out/ --src /data/zhidao -w 16
/// ```
pub struct Convert {
    #[structopt(help = "corpus name (see `list`)")]
    pub corpus: String,
    #[structopt(parse(from_os_str), help = "destination folder")]
    pub dst: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "src",
        help = "override the corpus source (file or folder)"
    )]
    pub src: Option<PathBuf>,
    #[structopt(
        parse(from_os_str),
        long = "registry",
        help = "JSON file declaring additional corpora"
    )]
    pub registry: Option<PathBuf>,
    #[structopt(
        short = "w",
        long = "workers",
        help = "number of workers. Default is 40."
    )]
    pub workers: Option<usize>,
    #[structopt(long = "capacity", help = "channel capacity. Default is 1024.")]
    pub capacity: Option<usize>,
    #[structopt(long = "gzip", help = "compress output files")]
    pub gzip: bool,
    #[structopt(
        long = "byte-tokens",
        help = "tokenize into UTF-8 bytes",
        conflicts_with = "tokenizer"
    )]
    pub byte_tokens: bool,
    #[structopt(
        parse(from_os_str),
        long = "tokenizer",
        help = "path to a tokenizer.json (needs the hf-tokenizer feature)"
    )]
    pub tokenizer: Option<PathBuf>,
}

#[derive(Debug, StructOpt)]
pub struct List {
    #[structopt(
        parse(from_os_str),
        long = "registry",
        help = "JSON file declaring additional corpora"
    )]
    pub registry: Option<PathBuf>,
}

#[derive(Debug, StructOpt)]
pub struct Check {
    #[structopt(parse(from_os_str), help = "prompt file")]
    pub prompts: PathBuf,
    #[structopt(parse(from_os_str), help = "text file")]
    pub texts: PathBuf,
}
