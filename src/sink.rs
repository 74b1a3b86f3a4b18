use crate::document::TfIdfScore;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Destination for the final (word, document, score) triples
pub trait ScoreSink {
    fn write(&mut self, score: &TfIdfScore) -> Result<()>;

    /// Called once after the last score
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl ScoreSink for Vec<TfIdfScore> {
    fn write(&mut self, score: &TfIdfScore) -> Result<()> {
        self.push(score.clone());
        Ok(())
    }
}

/// Tab separated `word\tdocument\tscore` lines
pub struct TextSink<W: Write> {
    writer: W,
}

impl TextSink<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ScoreSink for TextSink<W> {
    fn write(&mut self, score: &TfIdfScore) -> Result<()> {
        writeln!(self.writer, "{}\t{}\t{}", score.word, score.document, score.score)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// One JSON object per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl JsonLinesSink<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ScoreSink for JsonLinesSink<W> {
    fn write(&mut self, score: &TfIdfScore) -> Result<()> {
        serde_json::to_writer(&mut self.writer, score)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
