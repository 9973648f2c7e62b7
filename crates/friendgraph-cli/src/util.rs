use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;

/// Where a command writes its result: a file when a path is given, stdout
/// otherwise.
pub struct Output {
    writer: Box<dyn Write>,
    destination: String,
}

impl Output {
    /// Writes `value` as pretty JSON to `output_path` (or stdout).
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        serde_json::to_writer_pretty(&mut output, value)
            .with_context(|| format!("Failed to write JSON to {}", output.destination))?;
        output.finish()?;
        log::info!("saved to {}", output.destination);
        Ok(())
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = output_path else {
            return Ok(Self {
                writer: Box::new(io::stdout().lock()),
                destination: "stdout".to_owned(),
            });
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            destination: path.display().to_string(),
        })
    }

    pub fn display_path(&self) -> &str {
        &self.destination
    }

    /// Terminates the output with a newline and flushes it.
    pub fn finish(&mut self) -> anyhow::Result<()> {
        writeln!(self.writer)
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("Failed to finish output to {}", self.destination))
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Opens `path` for buffered reading.
///
/// `file_kind` names the file in error messages (e.g. "users").
pub fn open_reader<P>(file_kind: &str, path: P) -> anyhow::Result<BufReader<File>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    Ok(BufReader::new(file))
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let reader = open_reader(file_kind, path)?;
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}
