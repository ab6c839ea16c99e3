//! Log-line parsing: one LTSV record into the semantic fields the engine
//! consumes.

pub mod ltsv;

use crate::core::config::FieldConfig;
use crate::core::error::{LprofError, Result};
use crate::core::types::LogRecord;

/// Maps configured field labels onto the semantic record fields.
///
/// Every malformed semantic field is a parse error the ingestion loop
/// treats as a record skip, never as fatal.
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    labels: FieldConfig,
}

impl RecordExtractor {
    /// Creates an extractor for the configured labels
    pub fn new(labels: FieldConfig) -> Self {
        RecordExtractor { labels }
    }

    /// Parses one LTSV line into a [`LogRecord`].
    ///
    /// The response time reads the `apptime` label, falling back to
    /// `reqtime` when `apptime` is absent or unparseable. The request body
    /// size label is optional and contributes 0 when absent.
    pub fn extract(&self, line: &str) -> Result<LogRecord> {
        let fields = ltsv::parse_line(line);

        let uri = fields
            .get(self.labels.uri.as_str())
            .ok_or_else(|| LprofError::parse("missing uri field"))?;

        let response_time = match parse_number(fields.get(self.labels.apptime.as_str())) {
            Some(v) => v,
            None => parse_number(fields.get(self.labels.reqtime.as_str()))
                .ok_or_else(|| LprofError::parse("missing response time field"))?,
        };

        let response_body_size = parse_number(fields.get(self.labels.size.as_str()))
            .ok_or_else(|| LprofError::parse("missing response body size field"))?;

        let request_body_size = match fields.get(self.labels.reqsize.as_str()) {
            None => 0.0,
            Some(raw) => raw
                .parse()
                .map_err(|_| LprofError::parse(format!("bad request body size '{}'", raw)))?,
        };

        let status: u16 = fields
            .get(self.labels.status.as_str())
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| LprofError::parse("missing or bad status field"))?;

        Ok(LogRecord {
            uri: uri.to_string(),
            method: fields
                .get(self.labels.method.as_str())
                .unwrap_or(&"")
                .to_string(),
            time: fields
                .get(self.labels.time.as_str())
                .unwrap_or(&"")
                .to_string(),
            response_time,
            request_body_size,
            response_body_size,
            status,
        })
    }
}

fn parse_number(raw: Option<&&str>) -> Option<f64> {
    raw.and_then(|v| v.parse().ok())
}
