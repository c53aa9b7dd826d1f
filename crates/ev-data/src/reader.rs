//! CSV source retrieval and parsing for the EV dashboard.
//!
//! Fetches the vehicle population CSV from a local path or an http(s) URL,
//! maps columns by header name, streams rows in fixed-size chunks and keeps
//! only rows passing [`is_valid_record`]. The resulting [`Dataset`] is
//! published in one piece once every chunk has been consumed.

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use csv::{ByteRecord, ReaderBuilder};
use ev_core::config::{
    LoaderConfig, COL_ELECTRIC_RANGE, COL_MAKE, COL_MODEL, COL_MODEL_YEAR, COL_VEHICLE_TYPE,
    REQUIRED_COLUMNS,
};
use ev_core::error::{LoadError, Result};
use ev_core::models::{is_valid_record, Dataset, LoadStats, RawRecord, VehicleRecord};
use tracing::{debug, info};
use url::Url;

// ── SourceLocator ─────────────────────────────────────────────────────────────

/// Where the CSV lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocator {
    File(PathBuf),
    Url(Url),
}

impl SourceLocator {
    /// Interpret `locator` as a URL when it has an `http`/`https` scheme,
    /// otherwise as a filesystem path.
    pub fn parse(locator: &str) -> Self {
        let lower = locator.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            if let Ok(url) = Url::parse(locator) {
                return Self::Url(url);
            }
        }
        Self::File(PathBuf::from(locator))
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Retrieve the raw bytes behind `locator`.
///
/// A non-success HTTP status is reported as [`LoadError::Fetch`]; nothing is
/// retried.
pub async fn fetch_source(locator: &SourceLocator) -> Result<Vec<u8>> {
    match locator {
        SourceLocator::File(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|source| LoadError::FileRead {
                    path: path.clone(),
                    source,
                })
        }
        SourceLocator::Url(url) => {
            let fetch_err = |e: reqwest::Error| LoadError::Fetch {
                locator: url.to_string(),
                message: e.to_string(),
            };
            let resp = reqwest::get(url.clone())
                .await
                .map_err(fetch_err)?
                .error_for_status()
                .map_err(fetch_err)?;
            let bytes = resp.bytes().await.map_err(fetch_err)?;
            Ok(bytes.to_vec())
        }
    }
}

/// Parse CSV `bytes` into the working dataset.
///
/// The header row selects columns by exact name; columns beyond those the
/// dashboard reads are ignored. Rows are consumed `config.chunk_size` at a
/// time. Unreadable rows and rows failing [`is_valid_record`] are dropped and
/// counted in [`LoadStats::rows_dropped`].
///
/// Fails when the header cannot be read or lacks one of
/// [`REQUIRED_COLUMNS`].
pub fn parse_records(bytes: &[u8], config: &LoaderConfig) -> Result<Dataset> {
    let start = Instant::now();
    let chunk_size = config.chunk_size.max(1);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let columns = ColumnIndex::from_headers(rdr.byte_headers()?)?;

    let mut parser = ChunkedParser::new(chunk_size);
    for result in rdr.byte_records() {
        match result {
            Ok(record) => parser.push(columns.extract(&record)),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!("Dropping unreadable CSV row: {}", e);
                parser.push_unreadable();
            }
        }
    }
    let (records, mut stats) = parser.finish();
    stats.load_time_seconds = start.elapsed().as_secs_f64();

    debug!(
        rows_read = stats.rows_read,
        rows_kept = stats.rows_kept,
        rows_dropped = stats.rows_dropped,
        chunks = stats.chunks,
        "CSV parsed"
    );

    Ok(Dataset { records, stats })
}

/// Fetch and parse the dataset behind `locator`.
///
/// Parsing runs on a blocking task so the async runtime stays responsive
/// while large files are processed.
pub async fn load_dataset(locator: &SourceLocator, config: &LoaderConfig) -> Result<Dataset> {
    let start = Instant::now();
    info!("Loading dataset from {}", locator);

    let bytes = fetch_source(locator).await?;
    debug!(bytes = bytes.len(), "source fetched");

    let config = config.clone();
    let mut dataset = tokio::task::spawn_blocking(move || parse_records(&bytes, &config))
        .await
        .map_err(anyhow::Error::from)??;
    dataset.stats.load_time_seconds = start.elapsed().as_secs_f64();

    info!(
        rows = dataset.len(),
        dropped = dataset.stats.rows_dropped,
        "Dataset loaded from {}",
        locator
    );

    Ok(dataset)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Positions of the columns the dashboard reads.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    vehicle_type: Option<usize>,
    model_year: Option<usize>,
    electric_range: Option<usize>,
    make: Option<usize>,
    model: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &ByteRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| String::from_utf8_lossy(h).trim_start_matches('\u{feff}') == name)
        };

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| find(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns(missing));
        }

        Ok(Self {
            vehicle_type: find(COL_VEHICLE_TYPE),
            model_year: find(COL_MODEL_YEAR),
            electric_range: find(COL_ELECTRIC_RANGE),
            make: find(COL_MAKE),
            model: find(COL_MODEL),
        })
    }

    /// Decode only the columns the dashboard reads; invalid UTF-8 in them is
    /// replaced, and other columns are never decoded.
    fn extract(&self, record: &ByteRecord) -> RawRecord {
        let field = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                .unwrap_or_default()
        };
        RawRecord {
            vehicle_type: field(self.vehicle_type),
            model_year: field(self.model_year),
            electric_range: field(self.electric_range),
            make: field(self.make),
            model: field(self.model),
        }
    }
}

/// Buffers raw rows and filters them one chunk at a time.
struct ChunkedParser {
    chunk_size: usize,
    pending: Vec<RawRecord>,
    kept: Vec<VehicleRecord>,
    rows_read: usize,
    rows_dropped: usize,
    chunks: usize,
}

impl ChunkedParser {
    fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            pending: Vec::with_capacity(chunk_size.min(16_384)),
            kept: Vec::new(),
            rows_read: 0,
            rows_dropped: 0,
            chunks: 0,
        }
    }

    fn push(&mut self, raw: RawRecord) {
        self.rows_read += 1;
        self.pending.push(raw);
        if self.pending.len() >= self.chunk_size {
            self.flush();
        }
    }

    fn push_unreadable(&mut self) {
        self.rows_read += 1;
        self.rows_dropped += 1;
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let before = self.kept.len();
        let chunk_len = self.pending.len();
        for raw in self.pending.drain(..) {
            match VehicleRecord::from_raw(raw) {
                Some(record) => self.kept.push(record),
                None => self.rows_dropped += 1,
            }
        }
        self.chunks += 1;
        debug!(
            chunk = self.chunks,
            rows = chunk_len,
            kept = self.kept.len() - before,
            "chunk filtered"
        );
    }

    fn finish(mut self) -> (Vec<VehicleRecord>, LoadStats) {
        self.flush();
        let stats = LoadStats {
            rows_read: self.rows_read,
            rows_kept: self.kept.len(),
            rows_dropped: self.rows_dropped,
            chunks: self.chunks,
            load_time_seconds: 0.0,
            loaded_at: Utc::now(),
        };
        (self.kept, stats)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    const HEADER: &str = "VIN (1-10),County,City,State,Postal Code,Model Year,Make,Model,Electric Vehicle Type,Clean Alternative Fuel Vehicle (CAFV) Eligibility,Electric Range,Base MSRP";

    fn csv_with_rows(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for row in rows {
            out.push_str(row);
            out.push('\n');
        }
        out
    }

    fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    fn bev(year: &str, make: &str, model: &str, range: &str) -> String {
        format!(
            "5YJ3E1EB4K,King,Seattle,WA,98101,{year},{make},{model},Battery Electric Vehicle (BEV),Eligible,{range},0"
        )
    }

    // ── SourceLocator ─────────────────────────────────────────────────────────

    #[test]
    fn test_locator_parses_url() {
        let loc = SourceLocator::parse("https://data.example.gov/ev.csv");
        assert!(matches!(loc, SourceLocator::Url(_)));
    }

    #[test]
    fn test_locator_parses_path() {
        let loc = SourceLocator::parse("public/Electric_Vehicle_Population_Data.csv");
        assert_eq!(
            loc,
            SourceLocator::File(PathBuf::from("public/Electric_Vehicle_Population_Data.csv"))
        );
    }

    #[test]
    fn test_locator_display() {
        let loc = SourceLocator::parse("data/ev.csv");
        assert_eq!(loc.to_string(), "data/ev.csv");
    }

    // ── parse_records ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_records_keeps_valid_rows() {
        let csv = csv_with_rows(&[
            &bev("2020", "TESLA", "MODEL 3", "266"),
            &bev("2018", "NISSAN", "LEAF", "151"),
        ]);
        let dataset = parse_records(csv.as_bytes(), &LoaderConfig::default()).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records[0].make, "TESLA");
        assert_eq!(dataset.records[0].model, "MODEL 3");
        assert_eq!(dataset.records[0].electric_range, 266);
        assert_eq!(dataset.records[1].model_year, "2018");
    }

    #[test]
    fn test_parse_records_drops_invalid_rows() {
        let csv = csv_with_rows(&[
            &bev("2020", "TESLA", "MODEL Y", "0"),
            &bev("", "TESLA", "MODEL Y", "0"),
            &bev("2021", "KIA", "EV6", "unknown"),
            "5YJ3E1EB4K,King,Seattle,WA,98101,2019,FORD,FUSION,,Eligible,26,0",
        ]);
        let dataset = parse_records(csv.as_bytes(), &LoaderConfig::default()).unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records[0].model, "MODEL Y");
        assert_eq!(dataset.stats.rows_read, 4);
        assert_eq!(dataset.stats.rows_kept, 1);
        assert_eq!(dataset.stats.rows_dropped, 3);
    }

    #[test]
    fn test_parse_records_preserves_source_order() {
        let rows: Vec<String> = (0..30)
            .map(|i| bev("2020", &format!("MAKE{i}"), "X", "100"))
            .collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let dataset = parse_records(csv_with_rows(&refs).as_bytes(), &LoaderConfig::default())
            .unwrap();

        let makes: Vec<&str> = dataset.records.iter().map(|r| r.make.as_str()).collect();
        let expected: Vec<String> = (0..30).map(|i| format!("MAKE{i}")).collect();
        assert_eq!(makes, expected);
    }

    #[test]
    fn test_parse_records_chunking_is_invisible() {
        let rows: Vec<String> = (0..25).map(|_| bev("2022", "RIVIAN", "R1T", "314")).collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let csv = csv_with_rows(&refs);

        let chunked = parse_records(csv.as_bytes(), &LoaderConfig { chunk_size: 10 }).unwrap();
        let whole = parse_records(csv.as_bytes(), &LoaderConfig { chunk_size: 10_000 }).unwrap();

        assert_eq!(chunked.stats.chunks, 3);
        assert_eq!(whole.stats.chunks, 1);
        assert_eq!(chunked.records, whole.records);
    }

    #[test]
    fn test_parse_records_zero_chunk_size_treated_as_one() {
        let csv = csv_with_rows(&[&bev("2020", "BMW", "I3", "153"), &bev("2020", "BMW", "I3", "153")]);
        let dataset = parse_records(csv.as_bytes(), &LoaderConfig { chunk_size: 0 }).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.stats.chunks, 2);
    }

    #[test]
    fn test_parse_records_quoted_fields() {
        let csv = "Make,Model,Model Year,Electric Vehicle Type,Electric Range\n\
                   \"VOLVO\",\"XC40, RECHARGE\",2021,\"Battery Electric Vehicle (BEV)\",208\n";
        let dataset = parse_records(csv.as_bytes(), &LoaderConfig::default()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records[0].model, "XC40, RECHARGE");
    }

    #[test]
    fn test_parse_records_short_row_reads_missing_cells_as_empty() {
        // The range cell is missing entirely, so the row fails the predicate.
        let csv = "Electric Vehicle Type,Model Year,Make,Electric Range\n\
                   Battery Electric Vehicle (BEV),2020,TESLA\n\
                   Battery Electric Vehicle (BEV),2020,TESLA,220\n";
        let dataset = parse_records(csv.as_bytes(), &LoaderConfig::default()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.stats.rows_dropped, 1);
    }

    #[test]
    fn test_parse_records_without_optional_columns() {
        let csv = "Electric Vehicle Type,Model Year,Electric Range\nBEV,2020,100\n";
        let dataset = parse_records(csv.as_bytes(), &LoaderConfig::default()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records[0].make, "");
        assert_eq!(dataset.records[0].model, "");
    }

    #[test]
    fn test_parse_records_missing_required_column() {
        let csv = "Make,Model,Model Year\nTESLA,MODEL S,2015\n";
        let err = parse_records(csv.as_bytes(), &LoaderConfig::default()).unwrap_err();
        match err {
            LoadError::MissingColumns(cols) => {
                assert_eq!(cols, vec!["Electric Vehicle Type", "Electric Range"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_records_strips_bom_from_first_header() {
        let csv = "\u{feff}Electric Vehicle Type,Model Year,Electric Range\nBEV,2020,100\n";
        let dataset = parse_records(csv.as_bytes(), &LoaderConfig::default()).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_parse_records_invalid_utf8_range_dropped() {
        let mut bytes = b"Electric Vehicle Type,Model Year,Electric Range\n".to_vec();
        bytes.extend_from_slice(b"BEV,2020,\xff\xfe\n");
        bytes.extend_from_slice(b"BEV,2021,90\n");
        let dataset = parse_records(&bytes, &LoaderConfig::default()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.stats.rows_read, 2);
        assert_eq!(dataset.stats.rows_dropped, 1);
    }

    #[test]
    fn test_parse_records_invalid_utf8_in_unread_column_kept() {
        let bytes = b"City,Electric Vehicle Type,Model Year,Make,Electric Range\n\
M\xfcnster,BEV,2020,TESLA,220\n\
Seattle,BEV,2021,KIA,90\n";
        let dataset = parse_records(bytes, &LoaderConfig::default()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.stats.rows_dropped, 0);
        assert_eq!(dataset.records[0].make, "TESLA");
    }

    #[test]
    fn test_parse_records_invalid_utf8_in_make_replaced() {
        let bytes = b"Electric Vehicle Type,Model Year,Make,Electric Range\n\
BEV,2020,CITRO\xcbN,100\n";
        let dataset = parse_records(bytes, &LoaderConfig::default()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records[0].make, "CITRO\u{fffd}N");
        assert_eq!(dataset.records[0].electric_range, 100);
    }

    #[test]
    fn test_parse_records_header_only() {
        let dataset = parse_records(csv_with_rows(&[]).as_bytes(), &LoaderConfig::default())
            .unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.stats.rows_read, 0);
        assert_eq!(dataset.stats.chunks, 0);
    }

    #[test]
    fn test_parse_records_row_accounting() {
        let csv = csv_with_rows(&[
            &bev("2020", "A", "X", "1"),
            &bev("2020", "B", "X", "x"),
            &bev("", "C", "X", "1"),
            &bev("2015", "D", "X", "-3"),
        ]);
        let stats = parse_records(csv.as_bytes(), &LoaderConfig::default())
            .unwrap()
            .stats;
        assert_eq!(stats.rows_read, stats.rows_kept + stats.rows_dropped);
        assert_eq!(stats.rows_kept, 2);
    }

    // ── load_dataset ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_load_dataset_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "ev.csv",
            &csv_with_rows(&[&bev("2023", "TESLA", "MODEL Y", "0")]),
        );

        let dataset = load_dataset(&SourceLocator::File(path), &LoaderConfig::default())
            .await
            .unwrap();
        assert_eq!(dataset.len(), 1);
        assert!(dataset.stats.load_time_seconds >= 0.0);
    }

    #[tokio::test]
    async fn test_load_dataset_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.csv");

        let err = load_dataset(&SourceLocator::File(path.clone()), &LoaderConfig::default())
            .await
            .unwrap_err();
        match err {
            LoadError::FileRead { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    /// Serve a single HTTP response on a local port and return its URL.
    async fn serve_once(status_line: &'static str, body: String) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{status_line}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}/Electric_Vehicle_Population_Data.csv", addr)
    }

    #[tokio::test]
    async fn test_load_dataset_from_url() {
        let body = csv_with_rows(&[
            &bev("2020", "TESLA", "MODEL 3", "266"),
            &bev("2019", "AUDI", "E-TRON", "204"),
        ]);
        let url = serve_once("HTTP/1.1 200 OK", body).await;

        let dataset = load_dataset(&SourceLocator::parse(&url), &LoaderConfig::default())
            .await
            .unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records[1].make, "AUDI");
    }

    #[tokio::test]
    async fn test_load_dataset_http_error_status() {
        let url = serve_once("HTTP/1.1 404 Not Found", String::new()).await;

        let err = load_dataset(&SourceLocator::parse(&url), &LoaderConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }), "got {err}");
    }
}
