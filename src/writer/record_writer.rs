use crate::config::OutputConfig;
use crate::converter::OutputRecord;
use crate::error::{ConvertError, Result};
use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
pub struct WriterOptions {
    pub echo: bool,
    pub quote_fields: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            echo: true,
            quote_fields: false,
        }
    }
}

impl From<&OutputConfig> for WriterOptions {
    fn from(config: &OutputConfig) -> Self {
        Self {
            echo: config.echo,
            quote_fields: config.quote_fields,
        }
    }
}

/// `<input><suffix>`, e.g. `export.json` -> `export.json.csv`.
pub fn output_path_for(input: &Path, suffix: &str) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Serialises one record as a newline-terminated line.
pub fn format_line(record: &OutputRecord, quote_fields: bool) -> io::Result<String> {
    if !quote_fields {
        return Ok(format!("{}\n", record.to_raw_line()));
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.serialize(record)?;

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Result of a completed write pass.
#[derive(Debug)]
pub struct WriteSummary {
    pub records_written: usize,
    /// Set when echoing to the console failed part-way; the file is complete.
    pub echo_error: Option<ConvertError>,
}

/// Writes records to the output file and mirrors each line to the console.
///
/// The file handle is owned for the writer's lifetime and closed on drop,
/// so an early return on error still releases it. A failing console (e.g. a
/// closed pipe) only turns echo off; file write failures are fatal.
pub struct RecordWriter<F: Write, C: Write> {
    path: PathBuf,
    file: F,
    console: Option<C>,
    quote_fields: bool,
    records_written: usize,
    echo_error: Option<io::Error>,
}

impl RecordWriter<BufWriter<File>, Stdout> {
    /// Creates (or truncates) the output file.
    pub fn create<P: AsRef<Path>>(path: P, options: WriterOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ConvertError::Output {
            path: path.display().to_string(),
            source,
        })?;

        let console = options.echo.then(io::stdout);
        Ok(Self::from_parts(path, BufWriter::new(file), console, options))
    }
}

impl<F: Write, C: Write> RecordWriter<F, C> {
    pub fn from_parts<P: AsRef<Path>>(
        path: P,
        file: F,
        console: Option<C>,
        options: WriterOptions,
    ) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file,
            console,
            quote_fields: options.quote_fields,
            records_written: 0,
            echo_error: None,
        }
    }

    pub fn write_record(&mut self, record: &OutputRecord) -> Result<()> {
        let line = format_line(record, self.quote_fields).map_err(|e| self.output_error(e))?;

        if let Err(e) = self.file.write_all(line.as_bytes()) {
            return Err(self.output_error(e));
        }

        self.echo(|console| console.write_all(line.as_bytes()));

        self.records_written += 1;
        Ok(())
    }

    pub fn write_all<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a OutputRecord>,
    {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Flushes both sinks.
    pub fn finish(mut self) -> Result<WriteSummary> {
        if let Err(e) = self.file.flush() {
            return Err(self.output_error(e));
        }

        self.echo(|console| console.flush());

        Ok(WriteSummary {
            records_written: self.records_written,
            echo_error: self
                .echo_error
                .take()
                .map(|source| ConvertError::Echo { source }),
        })
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn into_inner(self) -> (F, Option<C>) {
        (self.file, self.console)
    }

    fn echo<O>(&mut self, op: O)
    where
        O: FnOnce(&mut C) -> io::Result<()>,
    {
        if let Some(ref mut console) = self.console {
            if let Err(e) = op(console) {
                self.console = None;
                self.echo_error = Some(e);
            }
        }
    }

    fn output_error(&self, source: io::Error) -> ConvertError {
        ConvertError::Output {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn memory_writer(options: WriterOptions) -> RecordWriter<Vec<u8>, Vec<u8>> {
        let console = options.echo.then(Vec::new);
        RecordWriter::from_parts("memory.csv", Vec::new(), console, options)
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_output_path_appends_suffix() {
        assert_eq!(
            output_path_for(Path::new("dir/export.json"), ".csv"),
            PathBuf::from("dir/export.json.csv")
        );
        assert_eq!(
            output_path_for(Path::new("export"), ".txt"),
            PathBuf::from("export.txt")
        );
    }

    #[test]
    fn test_file_and_console_receive_same_lines() {
        let mut writer = memory_writer(WriterOptions::default());
        let records = [
            OutputRecord::new("https://a.example", "u", "p"),
            OutputRecord::new("https://b.example", "v", "q"),
        ];
        writer.write_all(&records).unwrap();
        assert_eq!(writer.records_written(), 2);

        let (file, console) = writer.into_inner();
        let expected = "https://a.example,u,p\nhttps://b.example,v,q\n";
        assert_eq!(String::from_utf8(file).unwrap(), expected);
        assert_eq!(String::from_utf8(console.unwrap()).unwrap(), expected);
    }

    #[test]
    fn test_echo_disabled() {
        let options = WriterOptions {
            echo: false,
            quote_fields: false,
        };
        let mut writer = memory_writer(options);
        writer
            .write_record(&OutputRecord::new("https://a.example", "u", "p"))
            .unwrap();

        let (file, console) = writer.into_inner();
        assert!(console.is_none());
        assert_eq!(file, b"https://a.example,u,p\n");
    }

    #[test]
    fn test_quoted_output() {
        let record = OutputRecord::new("https://a.example", "a,b", "say \"hi\"");
        assert_eq!(
            format_line(&record, true).unwrap(),
            "https://a.example,\"a,b\",\"say \"\"hi\"\"\"\n"
        );
        assert_eq!(
            format_line(&OutputRecord::new("x", "y", "z"), true).unwrap(),
            "x,y,z\n"
        );
        assert_eq!(
            format_line(&record, false).unwrap(),
            "https://a.example,a,b,say \"hi\"\n"
        );
    }

    #[test]
    fn test_write_failure_is_output_error() {
        let mut writer: RecordWriter<FailingSink, Vec<u8>> = RecordWriter::from_parts(
            "broken.csv",
            FailingSink,
            None,
            WriterOptions::default(),
        );
        let result = writer.write_record(&OutputRecord::new("x", "y", "z"));
        match result {
            Err(ConvertError::Output { path, .. }) => assert_eq!(path, "broken.csv"),
            other => panic!("expected output error, got {:?}", other),
        }
        assert_eq!(writer.records_written(), 0);
    }

    #[test]
    fn test_console_failure_keeps_writing_file() {
        let mut writer: RecordWriter<Vec<u8>, FailingSink> = RecordWriter::from_parts(
            "piped.csv",
            Vec::new(),
            Some(FailingSink),
            WriterOptions::default(),
        );
        let records = [
            OutputRecord::new("https://a.example", "u", "p"),
            OutputRecord::new("https://b.example", "v", "q"),
        ];
        writer.write_all(&records).unwrap();
        assert_eq!(writer.records_written(), 2);

        let summary = writer.finish().unwrap();
        assert_eq!(summary.records_written, 2);
        assert!(matches!(summary.echo_error, Some(ConvertError::Echo { .. })));
    }

    #[test]
    fn test_console_failure_recorded_once() {
        let mut writer: RecordWriter<Vec<u8>, FailingSink> = RecordWriter::from_parts(
            "piped.csv",
            Vec::new(),
            Some(FailingSink),
            WriterOptions::default(),
        );
        writer.write_record(&OutputRecord::new("x", "y", "z")).unwrap();
        writer.write_record(&OutputRecord::new("x", "y", "z")).unwrap();

        let (file, console) = writer.into_inner();
        assert!(console.is_none());
        assert_eq!(file, b"x,y,z\nx,y,z\n");
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("export.json.csv");
        std::fs::write(&path, "stale content\n").unwrap();

        let options = WriterOptions {
            echo: false,
            quote_fields: false,
        };
        let mut writer = RecordWriter::create(&path, options).unwrap();
        writer
            .write_record(&OutputRecord::new("https://a.example", "u", "p"))
            .unwrap();
        let summary = writer.finish().unwrap();
        assert_eq!(summary.records_written, 1);
        assert!(summary.echo_error.is_none());

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "https://a.example,u,p\n"
        );
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("out.csv");
        let result = RecordWriter::create(&path, WriterOptions::default());
        assert!(matches!(result, Err(ConvertError::Output { .. })));
    }
}
