use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use boxnav_core::{EnvironmentSnapshot, Frame, FrameSink, RunSummary};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON object per line, tagged by `type`.
    JsonLines,
    /// A single `{scene, frames, summary}` document written at the end.
    Json,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("jsonl") | Some("ndjson") => Ok(OutputFormat::JsonLines),
            Some("json") => Ok(OutputFormat::Json),
            Some(other) => bail!("unsupported output extension '.{other}' (expected .json or .jsonl)"),
            None => bail!("output path {} has no extension (expected .json or .jsonl)", path.display()),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Line<'a> {
    Scene(&'a EnvironmentSnapshot),
    Frame(&'a Frame),
    Summary(&'a RunSummary),
}

pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &Line<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, line)?;
        self.out.write_all(b"\n")
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn begin(&mut self, scene: &EnvironmentSnapshot) -> io::Result<()> {
        self.write_line(&Line::Scene(scene))
    }

    fn frame(&mut self, frame: &Frame) -> io::Result<()> {
        self.write_line(&Line::Frame(frame))
    }

    fn finish(&mut self, summary: &RunSummary) -> io::Result<()> {
        self.write_line(&Line::Summary(summary))?;
        self.out.flush()
    }
}

#[derive(Serialize)]
struct Document<'a> {
    scene: Option<&'a EnvironmentSnapshot>,
    frames: &'a [Frame],
    summary: &'a RunSummary,
}

/// Buffers the whole run and writes it as one pretty-printed document.
pub struct JsonDocumentSink<W: Write> {
    out: W,
    scene: Option<EnvironmentSnapshot>,
    frames: Vec<Frame>,
}

impl<W: Write> JsonDocumentSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, scene: None, frames: Vec::new() }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for JsonDocumentSink<W> {
    fn begin(&mut self, scene: &EnvironmentSnapshot) -> io::Result<()> {
        self.scene = Some(scene.clone());
        Ok(())
    }

    fn frame(&mut self, frame: &Frame) -> io::Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> io::Result<()> {
        let doc = Document { scene: self.scene.as_ref(), frames: &self.frames, summary };
        serde_json::to_writer_pretty(&mut self.out, &doc)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

/// Create the file at `path` and pick a sink by its extension.
pub fn open_sink(path: &Path) -> Result<Box<dyn FrameSink>> {
    let format = OutputFormat::from_path(path)?;
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let out = BufWriter::new(file);
    Ok(match format {
        OutputFormat::JsonLines => Box::new(JsonLinesSink::new(out)),
        OutputFormat::Json => Box::new(JsonDocumentSink::new(out)),
    })
}
