//! Reading `TITLE/ACTOR/ACTOR/...` corpora into a [`Graph`].

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::CorpusError;
use crate::graph::{Graph, GraphBuilder};

pub const DEFAULT_DELIMITER: u8 = b'/';

/// Builds a graph from every record in `reader`.
///
/// There is no escaping: quotes are ordinary characters and a delimiter
/// inside a name always splits it. Blank lines are skipped but still
/// counted, so error line numbers match the file. A line that is not valid
/// UTF-8, or a read failure, aborts the whole build.
pub fn read_graph<R: Read>(reader: R, delimiter: u8) -> Result<Graph, CorpusError> {
    let started = Instant::now();
    let delimiter = char::from(delimiter);

    let mut builder = GraphBuilder::new();
    let mut count = 0u64;
    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line_no = index as u64 + 1;
        let line = line.map_err(|source| match source.kind() {
            io::ErrorKind::InvalidData => CorpusError::Malformed { line: line_no, source },
            _ => CorpusError::Read { line: line_no, source },
        })?;
        let line = line.strip_suffix('\r').unwrap_or(&line); // CRLF corpora
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split(delimiter);
        let title = fields.next().unwrap_or_default();
        builder
            .add_record(title, fields)
            .map_err(|source| CorpusError::Capacity { line: line_no, source })?;
        count += 1;
    }

    let graph = builder.finish();
    info!(
        records = count,
        vertices = graph.num_actors(),
        movies = graph.num_movies(),
        edges = graph.num_edges(),
        elapsed = ?started.elapsed(),
        "built co-appearance graph"
    );
    Ok(graph)
}

/// Opens `path` and builds a graph from it.
pub fn load_graph(path: &Path, delimiter: u8) -> Result<Graph, CorpusError> {
    let file = File::open(path).map_err(|source| CorpusError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "parsing corpus and building tables");
    debug!(delimiter = %char::from(delimiter), "corpus delimiter");
    read_graph(file, delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = "\
Avengers: Age of Ultron (2015)/Downey Jr., Robert/Johansson, Scarlett/Ruffalo, Mark
Lost in Translation (2003)/Johansson, Scarlett/Murray, Bill

Solo Show (2001)/Murray, Bill
";

    #[test]
    fn test_read_graph() {
        let graph = read_graph(CORPUS.as_bytes(), DEFAULT_DELIMITER).unwrap();
        assert_eq!(graph.num_movies(), 3);
        assert_eq!(graph.num_actors(), 4);
        let scarlett = graph.actor_id("Johansson, Scarlett").unwrap();
        assert_eq!(graph.edges(scarlett).len(), 3); // Downey, Ruffalo, Murray
        // commas inside names are not separators
    }

    #[test]
    fn test_custom_delimiter_and_crlf() {
        let graph = read_graph("M1|A|B\r\nM2|B|C\r\n".as_bytes(), b'|').unwrap();
        assert_eq!(graph.num_actors(), 3);
        assert!(graph.actor_id("B").is_some());
        assert!(graph.actor_id("C\r").is_none());
    }

    #[test]
    fn test_quotes_are_literal() {
        let graph = read_graph("M/\"Quoted/Name\"\n".as_bytes(), DEFAULT_DELIMITER).unwrap();
        assert!(graph.actor_id("\"Quoted").is_some());
        assert!(graph.actor_id("Name\"").is_some());
        // no escaping, the delimiter splits the quoted name
    }

    #[test]
    fn test_trailing_delimiter_adds_no_actor() {
        let graph = read_graph("M/A/B/\n".as_bytes(), DEFAULT_DELIMITER).unwrap();
        assert_eq!(graph.num_actors(), 2);
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let mut bytes = b"M1/A/B\nM2/".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(b"/C\n");
        let err = read_graph(bytes.as_slice(), DEFAULT_DELIMITER).unwrap_err();
        assert!(matches!(err, CorpusError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_error_line_counts_blank_lines() {
        let mut bytes = b"M1/A/B\n\n\nM2/".to_vec();
        bytes.push(0xff);
        bytes.extend_from_slice(b"/C\n");
        let err = read_graph(bytes.as_slice(), DEFAULT_DELIMITER).unwrap_err();
        assert!(matches!(err, CorpusError::Malformed { line: 4, .. })); // physical line
    }

    /// Yields `data` once, then fails every read.
    struct BrokenReader {
        data: &'static [u8],
    }

    impl Read for BrokenReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::new(io::ErrorKind::Other, "disk went away"));
            }
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_read_failure_is_not_malformed() {
        let reader = BrokenReader { data: b"M1/A/B\n" };
        let err = read_graph(reader, DEFAULT_DELIMITER).unwrap_err();
        assert!(matches!(err, CorpusError::Read { line: 2, .. }));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = load_graph(Path::new("does/not/exist.txt"), DEFAULT_DELIMITER).unwrap_err();
        assert!(matches!(err, CorpusError::Unavailable { .. }));
    }
}
