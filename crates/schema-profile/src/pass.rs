//! The single ingestion pass.
//!
//! Owns the counter, the sampler, the running content digest, and the
//! document total for one sequential pass over an ordered stream of
//! lines. One line is digested, decoded, parsed, and walked to completion
//! before the next; no state survives `finish()`.

use std::io::BufRead;

use chrono::Utc;
use encoding_rs::Encoding;
use sha1::{Digest, Sha1};
use tracing::{debug, trace, warn};

use indigo_config::{ParseErrorPolicy, ProfileConfig};

use crate::counter::PathCounter;
use crate::errors::{ProfileError, ProfileResult};
use crate::report::{Report, ReportMeta};
use crate::reservoir::ReservoirSampler;
use crate::walker::walk;

/// Profiling state for one pass over the input.
pub struct ProfilePass {
    cfg: ProfileConfig,
    encoding: &'static Encoding,
    counter: PathCounter,
    sampler: ReservoirSampler,
    digest: Sha1,
    total: u64,
    lines_seen: u64,
}

impl ProfilePass {
    pub fn new(cfg: ProfileConfig) -> ProfileResult<Self> {
        let sampler = ReservoirSampler::new(&cfg.sampler);
        Self::with_sampler(cfg, sampler)
    }

    /// Deterministic pass for tests.
    pub fn with_seed(cfg: ProfileConfig, seed: u64) -> ProfileResult<Self> {
        let sampler = ReservoirSampler::with_seed(&cfg.sampler, seed);
        Self::with_sampler(cfg, sampler)
    }

    fn with_sampler(
        cfg: ProfileConfig,
        sampler: ReservoirSampler,
    ) -> ProfileResult<Self> {
        cfg.validate()?;
        let encoding = cfg.resolve_encoding()?;
        Ok(Self {
            cfg,
            encoding,
            counter: PathCounter::new(),
            sampler,
            digest: Sha1::new(),
            total: 0,
            lines_seen: 0,
        })
    }

    /// Ingest one line, raw bytes exactly as read (terminator included).
    ///
    /// The digest is fed first, so blank lines contribute to the checksum
    /// without counting as documents. Decode and parse failures follow the
    /// configured policy: fatal by default, warn-and-skip when configured.
    pub fn feed_line(&mut self, raw: &[u8]) -> ProfileResult<()> {
        self.lines_seen += 1;
        self.digest.update(raw);

        // No BOM sniffing: the configured encoding applies to every byte,
        // so a line can never silently switch the decoder.
        let (text, had_errors) = self.encoding.decode_without_bom_handling(raw);
        if had_errors {
            return self.line_failure(ProfileError::Decode {
                line: self.lines_seen,
                encoding: self.encoding.name(),
            });
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            trace!(line = self.lines_seen, "blank line skipped");
            return Ok(());
        }

        let doc: serde_json::Value = match serde_json::from_str(trimmed) {
            Ok(doc) => doc,
            Err(source) => {
                return self.line_failure(ProfileError::JsonParse {
                    line: self.lines_seen,
                    source,
                });
            }
        };

        walk(&doc, &mut self.counter, &mut self.sampler, "");
        self.total += 1;
        Ok(())
    }

    fn line_failure(&self, err: ProfileError) -> ProfileResult<()> {
        match self.cfg.on_parse_error {
            ParseErrorPolicy::Fail => Err(err),
            ParseErrorPolicy::Skip => {
                warn!(error = %err, "skipping unparseable line");
                Ok(())
            }
        }
    }

    /// Drain a reader line by line into the pass.
    pub fn consume<R: BufRead>(&mut self, mut reader: R) -> ProfileResult<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader.read_until(b'\n', &mut buf)?;
            if n == 0 {
                break;
            }
            self.feed_line(&buf)?;
        }
        debug!(
            lines = self.lines_seen,
            documents = self.total,
            "input drained"
        );
        Ok(())
    }

    /// Documents processed so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn counter(&self) -> &PathCounter {
        &self.counter
    }

    pub fn sampler(&self) -> &ReservoirSampler {
        &self.sampler
    }

    /// Consume the pass and assemble the report.
    pub fn finish(self) -> Report {
        let sha1 = hex::encode(self.digest.finalize());
        debug!(
            total = self.total,
            paths = self.counter.len(),
            %sha1,
            "assembling report"
        );
        Report {
            meta: ReportMeta {
                size: self.cfg.sampler.size,
                date: Utc::now(),
                total: self.total,
                sha1,
            },
            c: self.counter.snapshot(),
            s: self.sampler.samples_snapshot(),
            u: self.sampler.unique_storage(),
            v: self.sampler.unique_examples_snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indigo_config::SamplerCfg;

    fn pass_with(size: usize) -> ProfilePass {
        let cfg = ProfileConfig {
            sampler: SamplerCfg {
                size,
                max_length: 1024,
            },
            ..Default::default()
        };
        ProfilePass::with_seed(cfg, 7).unwrap()
    }

    #[test]
    fn counts_documents_and_paths() {
        let mut pass = pass_with(10);
        pass.feed_line(br#"{"a": 1}"#).unwrap();
        pass.feed_line(br#"{"a": 2, "b": true}"#).unwrap();

        assert_eq!(pass.total(), 2);
        assert_eq!(pass.counter().get("a"), 2);
        assert_eq!(pass.counter().get("b"), 1);
    }

    #[test]
    fn blank_lines_are_not_documents_but_are_digested() {
        let mut with_blank = pass_with(10);
        with_blank.feed_line(br#"{"a": 1}"#).unwrap();
        with_blank.feed_line(b"   \n").unwrap();
        with_blank.feed_line(b"\n").unwrap();

        let mut without_blank = pass_with(10);
        without_blank.feed_line(br#"{"a": 1}"#).unwrap();

        assert_eq!(with_blank.total(), 1);
        assert_eq!(with_blank.counter().get("a"), 1);

        let digest_with = with_blank.finish().meta.sha1;
        let digest_without = without_blank.finish().meta.sha1;
        assert_ne!(digest_with, digest_without);
    }

    #[test]
    fn malformed_json_is_fatal_by_default() {
        let mut pass = pass_with(10);
        pass.feed_line(br#"{"a": 1}"#).unwrap();
        let err = pass.feed_line(b"{not json}").unwrap_err();
        assert!(matches!(err, ProfileError::JsonParse { line: 2, .. }));
    }

    #[test]
    fn skip_policy_continues_past_bad_lines() {
        let cfg = ProfileConfig {
            on_parse_error: ParseErrorPolicy::Skip,
            ..Default::default()
        };
        let mut pass = ProfilePass::with_seed(cfg, 7).unwrap();
        pass.feed_line(br#"{"a": 1}"#).unwrap();
        pass.feed_line(b"{not json}").unwrap();
        pass.feed_line(br#"{"a": 2}"#).unwrap();

        assert_eq!(pass.total(), 2);
        assert_eq!(pass.counter().get("a"), 2);
    }

    #[test]
    fn undecodable_bytes_fail_like_malformed_json() {
        let mut pass = pass_with(10);
        // 0xff is never valid UTF-8
        let err = pass.feed_line(b"\xff{\"a\": 1}").unwrap_err();
        assert!(matches!(err, ProfileError::Decode { line: 1, .. }));
    }

    #[test]
    fn non_utf8_encodings_decode_for_parsing() {
        let cfg = ProfileConfig {
            encoding: "windows-1252".into(),
            ..Default::default()
        };
        let mut pass = ProfilePass::with_seed(cfg, 7).unwrap();
        // 0xe9 is é in windows-1252
        pass.feed_line(b"{\"name\": \"caf\xe9\"}\n").unwrap();

        assert_eq!(pass.total(), 1);
        let report = pass.finish();
        assert_eq!(
            report.s["name"],
            vec![crate::ScalarValue::Str("café".into())]
        );
    }

    #[test]
    fn digest_is_deterministic_and_randomness_free() {
        let lines: &[&[u8]] =
            &[br#"{"a": 1}"#, b"\n", br#"{"a": [1, 2, 3]}"#];

        let run = |seed: u64| {
            let mut pass =
                ProfilePass::with_seed(ProfileConfig::default(), seed).unwrap();
            for line in lines {
                pass.feed_line(line).unwrap();
            }
            pass.finish().meta.sha1
        };

        let reference = {
            let mut hasher = Sha1::new();
            for line in lines {
                hasher.update(line);
            }
            hex::encode(hasher.finalize())
        };

        assert_eq!(run(1), run(2));
        assert_eq!(run(1), reference);
    }

    #[test]
    fn consume_reads_to_end_of_input() {
        let input = b"{\"a\": 1}\n\n{\"a\": 2}\n";
        let mut pass = pass_with(10);
        pass.consume(&input[..]).unwrap();

        assert_eq!(pass.total(), 2);
        assert_eq!(pass.counter().get("a"), 2);
    }

    #[test]
    fn consume_stops_at_first_bad_line() {
        let input =
            b"{\"a\": 1}\n{\"a\": 2}\nnot json\n{\"a\": 3}\n{\"a\": 4}\n";
        let mut pass = pass_with(10);
        let err = pass.consume(&input[..]).unwrap_err();

        assert!(matches!(err, ProfileError::JsonParse { line: 3, .. }));
        assert_eq!(pass.total(), 2);
    }

    #[test]
    fn finish_assembles_all_sections() {
        let mut pass = pass_with(10);
        pass.feed_line(br#"{"a": 1, "b": {"c": 2}}"#).unwrap();
        pass.feed_line(br#"{"a": 3, "b": {"c": 4}}"#).unwrap();
        let report = pass.finish();

        assert_eq!(report.meta.total, 2);
        assert_eq!(report.meta.size, 10);
        assert_eq!(report.meta.sha1.len(), 40);
        assert_eq!(report.c["a"], 2);
        assert_eq!(report.c["b"], 2);
        assert_eq!(report.c["b.c"], 2);
        assert_eq!(
            report.s["a"],
            vec![crate::ScalarValue::Int(1), crate::ScalarValue::Int(3)]
        );
        assert_eq!(
            report.s["b.c"],
            vec![crate::ScalarValue::Int(2), crate::ScalarValue::Int(4)]
        );
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = ProfileConfig {
            sampler: SamplerCfg {
                size: 0,
                max_length: 1024,
            },
            ..Default::default()
        };
        assert!(matches!(
            ProfilePass::new(cfg),
            Err(ProfileError::Config(_))
        ));
    }
}
