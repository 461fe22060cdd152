use anyhow::Context;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Open `input` for buffered reading. `stdin` reads standard input, and files
/// ending in `.gz` are decompressed on the fly.
///
/// ```
/// use std::io::BufRead;
/// let reader = nwkgraft::reader("tests/placement/basic.txt").unwrap();
/// assert_eq!(reader.lines().count(), 3);
///
/// assert!(nwkgraft::reader("tests/placement/no_such_file.txt").is_err());
/// ```
pub fn reader(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = Path::new(input);
        let file = std::fs::File::open(path)
            .with_context(|| format!("could not open {}", path.display()))?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

/// Read all lines of `input`, without line terminators.
///
/// ```
/// let lines = nwkgraft::read_lines("tests/placement/basic.txt").unwrap();
/// assert_eq!(lines[0], "p1 L1");
/// ```
pub fn read_lines(input: &str) -> anyhow::Result<Vec<String>> {
    let reader = reader(input)?;
    let mut lines = vec![];
    for line in reader.lines() {
        lines.push(line.with_context(|| format!("could not read {}", input))?);
    }
    Ok(lines)
}

/// Read the whole of `input` into a string.
pub fn read_to_string(input: &str) -> anyhow::Result<String> {
    let mut reader = reader(input)?;
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .with_context(|| format!("could not read {}", input))?;
    Ok(content)
}

/// Open `output` for buffered writing. `stdout` writes to standard output.
pub fn writer(output: &str) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = std::fs::File::create(output)
            .with_context(|| format!("could not create {}", output))?;
        Box::new(BufWriter::new(file))
    };

    Ok(writer)
}

/// Write `content` to `output` in one step.
///
/// Files are written to a temporary sibling first and renamed into place, so
/// an existing `output` is either fully replaced or left as it was.
///
/// ```
/// let dir = tempfile::tempdir().unwrap();
/// let out = dir.path().join("out.nwk");
/// let out = out.to_str().unwrap();
///
/// nwkgraft::write_atomic(out, "(A,B);\n").unwrap();
/// assert_eq!(std::fs::read_to_string(out).unwrap(), "(A,B);\n");
/// ```
pub fn write_atomic(output: &str, content: &str) -> anyhow::Result<()> {
    if output == "stdout" {
        let mut writer = writer(output)?;
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        return Ok(());
    }

    let path = Path::new(output);
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("could not create a temporary file in {}", dir.display()))?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path)
        .with_context(|| format!("could not write {}", path.display()))?;

    Ok(())
}
