//! # corpus-pairs
//!
//! Command line entry point.
//!
//! ```sh
//! corpus-pairs 0.1.0
//! prompt/text stream generation from raw corpora.
//!
//! USAGE:
//!     corpus-pairs <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     check      Check alignment of prompt/text files and count their size
//!     convert    Convert a corpus into aligned prompt/text files
//!     help       Prints this message or the help of the given subcommand(s)
//!     list       List known corpora
//! ```
//!
//! Logging is configured with `RUST_LOG` (e.g. `RUST_LOG=info`).
use std::path::Path;

use corpus_pairs::check::check_pairs;
use corpus_pairs::corpora::Registry;
use corpus_pairs::error::Error;
use corpus_pairs::pipeline::{Conversion, ConvertToFiles, Pipeline, PipelineConfigBuilder};
use corpus_pairs::tokenizer::{ByteTokenizer, Tokenizer};
use structopt::StructOpt;

#[macro_use]
extern crate log;

mod cli;

fn load_registry(path: Option<&Path>) -> Result<Registry, Error> {
    match path {
        Some(path) => Registry::from_file(path),
        None => Ok(Registry::default()),
    }
}

fn load_tokenizer(opts: &cli::Convert) -> Result<Option<Box<dyn Tokenizer>>, Error> {
    if opts.byte_tokens {
        return Ok(Some(Box::new(ByteTokenizer)));
    }
    match &opts.tokenizer {
        None => Ok(None),
        #[cfg(feature = "hf-tokenizer")]
        Some(path) => Ok(Some(Box::new(
            corpus_pairs::tokenizer::HfTokenizer::from_file(path)?,
        ))),
        #[cfg(not(feature = "hf-tokenizer"))]
        Some(path) => Err(Error::Config(format!(
            "cannot load {:?}: built without the hf-tokenizer feature",
            path
        ))),
    }
}

fn convert(opts: cli::Convert) -> Result<(), Error> {
    let registry = load_registry(opts.registry.as_deref())?;
    let mut descriptor = registry.get(&opts.corpus)?.clone();
    if let Some(src) = &opts.src {
        descriptor = descriptor.with_path(src);
    }
    debug!("descriptor: {:?}", descriptor);

    let tokenizer = load_tokenizer(&opts)?;

    let mut builder = PipelineConfigBuilder::default();
    if let Some(workers) = opts.workers {
        builder.workers(workers);
    }
    if let Some(capacity) = opts.capacity {
        builder.channel_capacity(capacity);
    }
    let config = builder.tokenize(tokenizer.is_some()).build()?;

    let mut conversion = Conversion::new(descriptor, config);
    if let Some(tokenizer) = &tokenizer {
        conversion = conversion.with_tokenizer(&**tokenizer);
    }

    let pipeline = ConvertToFiles::new(&opts.corpus, opts.dst.clone(), opts.gzip, conversion);
    let summary = pipeline.run()?;
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::CorpusPairs::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::CorpusPairs::Convert(c) => convert(c)?,
        cli::CorpusPairs::List(l) => {
            let registry = load_registry(l.registry.as_deref())?;
            for (name, descriptor) in registry.iter() {
                println!(
                    "{}\t{}\t{}",
                    name,
                    descriptor.extraction.name(),
                    descriptor.path.display()
                );
            }
        }
        cli::CorpusPairs::Check(c) => {
            let stats = check_pairs(&c.prompts, &c.texts)?;
            info!("{} pairs, {} total", stats.nb_pairs, stats.total_count());
            println!("{}", serde_json::to_string(&stats)?);
        }
    };
    Ok(())
}
