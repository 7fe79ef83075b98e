/*! Output sinks.

Prompts and texts are written to two separate sinks that must stay positionally aligned:
the n-th prompt and the n-th text come from the same [ExtractedPair].
[SinkPair] is the only way the pipeline writes, so that both halves are always written together.
!*/
use std::{
    fs::File,
    io::{BufRead, BufWriter, Write},
    path::{Path, PathBuf},
};

use flate2::{write::GzEncoder, Compression};
use log::info;

use crate::error::Error;
use crate::io::source::open_reader;
use crate::sample::{ExtractedPair, Sample};

/// A sample with its JSON line, encoded before anything is written.
pub struct Entry<'a> {
    sample: &'a Sample,
    line: Vec<u8>,
}

impl<'a> Entry<'a> {
    pub fn encode(sample: &'a Sample) -> Result<Self, Error> {
        let mut line = serde_json::to_vec(sample)?;
        line.push(b'\n');
        Ok(Self { sample, line })
    }

    pub fn sample(&self) -> &Sample {
        self.sample
    }

    /// JSON value followed by a newline.
    pub fn line(&self) -> &[u8] {
        &self.line
    }
}

/// Append-only destination for one of the two streams.
pub trait Sink {
    fn write_entry(&mut self, entry: &Entry) -> Result<(), Error>;

    fn write(&mut self, sample: &Sample) -> Result<(), Error> {
        self.write_entry(&Entry::encode(sample)?)
    }

    /// Flush everything and finalize the underlying format.
    fn finish(&mut self) -> Result<(), Error>;
}

enum Handle {
    Plain(BufWriter<File>),
    Gz(GzEncoder<BufWriter<File>>),
}

impl Write for Handle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Handle::Plain(w) => w.write(buf),
            Handle::Gz(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Handle::Plain(w) => w.flush(),
            Handle::Gz(w) => w.flush(),
        }
    }
}

/// JSON-lines file sink: one JSON string (or array of ids) per line.
///
/// Using JSON keeps multi-line texts on a single line.
pub struct JsonlSink {
    path: PathBuf,
    handle: Handle,
    nb_written: u64,
}

impl JsonlSink {
    /// Create (truncate) the file at `path`, gzip-compressed if `gzip` is set.
    pub fn create(path: &Path, gzip: bool) -> Result<Self, Error> {
        info!("creating {:?}", path);
        let file = BufWriter::new(File::create(path)?);
        let handle = if gzip {
            Handle::Gz(GzEncoder::new(file, Compression::default()))
        } else {
            Handle::Plain(file)
        };
        Ok(Self {
            path: path.to_path_buf(),
            handle,
            nb_written: 0,
        })
    }

    pub fn nb_written(&self) -> u64 {
        self.nb_written
    }
}

impl Sink for JsonlSink {
    fn write_entry(&mut self, entry: &Entry) -> Result<(), Error> {
        self.handle.write_all(entry.line())?;
        self.nb_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        match &mut self.handle {
            Handle::Plain(w) => w.flush()?,
            Handle::Gz(w) => {
                w.try_finish()?;
                w.get_mut().flush()?;
            }
        }
        info!("{:?}: {} entries", self.path, self.nb_written);
        Ok(())
    }
}

/// In-memory sink.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub samples: Vec<Sample>,
}

impl Sink for MemorySink {
    fn write_entry(&mut self, entry: &Entry) -> Result<(), Error> {
        self.samples.push(entry.sample().clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write_entry(&mut self, entry: &Entry) -> Result<(), Error> {
        (**self).write_entry(entry)
    }

    fn finish(&mut self) -> Result<(), Error> {
        (**self).finish()
    }
}

/// Prompt and text sinks, written in lockstep.
pub struct SinkPair<P, T> {
    prompts: P,
    texts: T,
    nb_pairs: u64,
}

impl<P: Sink, T: Sink> SinkPair<P, T> {
    pub fn new(prompts: P, texts: T) -> Self {
        Self {
            prompts,
            texts,
            nb_pairs: 0,
        }
    }

    /// Write the prompt then the text of a pair.
    ///
    /// Both halves are encoded first, so an encoding error writes nothing.
    /// A write error is returned immediately and the sinks must then be considered invalid:
    /// if the text sink fails, the prompt sink holds one more entry than the text sink.
    pub fn write_pair(&mut self, pair: &ExtractedPair) -> Result<(), Error> {
        let prompt = Entry::encode(&pair.prompt)?;
        let text = Entry::encode(&pair.response)?;
        self.prompts.write_entry(&prompt)?;
        self.texts.write_entry(&text)?;
        self.nb_pairs += 1;
        Ok(())
    }

    pub fn nb_pairs(&self) -> u64 {
        self.nb_pairs
    }

    pub fn finish(&mut self) -> Result<(), Error> {
        self.prompts.finish()?;
        self.texts.finish()
    }

    pub fn into_inner(self) -> (P, T) {
        (self.prompts, self.texts)
    }
}

/// Read back a JSON-lines sink file (plain or `.gz`).
pub fn read_samples(path: &Path) -> Result<impl Iterator<Item = Result<Sample, Error>>, Error> {
    let reader = open_reader(path)?;
    Ok(reader.lines().map(|line| {
        let line = line?;
        Ok(serde_json::from_str(&line)?)
    }))
}
