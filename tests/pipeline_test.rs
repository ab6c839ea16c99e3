//! End-to-end pipeline tests: LTSV lines through filter, normalizer, and
//! aggregation, plus snapshot round-trips.

use lprof::core::config::{FieldConfig, FilterConfig};
use lprof::core::PercentileMode;
use lprof::filter::Filter;
use lprof::normalize::UriNormalizer;
use lprof::output::{print_stats, OutputFormat, PrintOptions};
use lprof::parse::RecordExtractor;
use lprof::snapshot;
use lprof::stats::{Profile, SortField};

const LOG: &str = "\
time:2026-08-06T10:00:00Z\tmethod:GET\turi:/users/1\tstatus:200\tsize:320\tapptime:0.120
time:2026-08-06T10:00:01Z\tmethod:GET\turi:/users/2\tstatus:200\tsize:280\tapptime:0.080
time:2026-08-06T10:00:02Z\tmethod:GET\turi:/users/3\tstatus:404\tsize:48\tapptime:0.010
time:2026-08-06T10:00:03Z\tmethod:POST\turi:/users\tstatus:201\tsize:96\treqsize:512\tapptime:0.200
time:2026-08-06T10:00:04Z\tmethod:GET\turi:/health\tstatus:200\tsize:16\tapptime:0.002
time:2026-08-06T10:00:05Z\tmethod:GET\turi:/health\tstatus:200\tsize:16\tapptime:0.004
this line is not ltsv at all
time:2026-08-06T10:00:06Z\tmethod:GET\turi:/users/9\tstatus:500\tsize:64\tapptime:1.500
";

fn run_pipeline(filter: &Filter, normalizer: &UriNormalizer, profile: &mut Profile) -> (u64, u64) {
    let extractor = RecordExtractor::new(FieldConfig::default());
    let mut admitted = 0;
    let mut skipped = 0;

    for line in LOG.lines() {
        let record = match extractor.extract(line) {
            Ok(record) => record,
            Err(_) => {
                skipped += 1;
                continue;
            },
        };
        if !filter.admit(&record.uri, record.status, &record.time) {
            skipped += 1;
            continue;
        }
        let uri = match normalizer.normalize(&record.uri) {
            Ok(uri) => uri,
            Err(_) => {
                skipped += 1;
                continue;
            },
        };
        profile.record(
            &record.method,
            &uri,
            record.status,
            record.response_time,
            record.request_body_size,
            record.response_body_size,
        );
        admitted += 1;
    }

    (admitted, skipped)
}

#[test]
fn full_pipeline_aggregates_per_endpoint() {
    let filter = Filter::from_config(&FilterConfig::default()).unwrap();
    let normalizer = UriNormalizer::new(false, &[r"/users/\d+".to_string()]).unwrap();
    let mut profile = Profile::new(true, PercentileMode::Arrival);

    let (admitted, skipped) = run_pipeline(&filter, &normalizer, &mut profile);
    assert_eq!(admitted, 7);
    assert_eq!(skipped, 1);

    // /users/1, /users/2, /users/3, /users/9 collapse into the pattern key
    assert_eq!(profile.endpoint_count(), 3);

    profile.sort(SortField::Count, true);
    let top = &profile.stats()[0];
    assert_eq!(top.uri, r"/users/\d+");
    assert_eq!(top.method, "GET");
    assert_eq!(top.count, 4);
    assert_eq!(top.status_2xx, 2);
    assert_eq!(top.status_4xx, 1);
    assert_eq!(top.status_5xx, 1);
    assert_eq!(top.max_response_time(), 1.5);
    assert_eq!(top.min_response_time(), 0.010);

    // POST body size flowed into the request body accumulator
    let post = profile.stats().iter().find(|s| s.method == "POST").unwrap();
    assert_eq!(post.max_request_body_size(), 512.0);
    assert_eq!(post.sum_response_body_size(), 96.0);
}

#[test]
fn filter_drops_records_before_aggregation() {
    let filter = Filter::from_config(&FilterConfig {
        exclude_statuses: vec![404, 500],
        excludes: vec!["^/health".to_string()],
        ..Default::default()
    })
    .unwrap();
    let normalizer = UriNormalizer::new(false, &[]).unwrap();
    let mut profile = Profile::new(true, PercentileMode::Arrival);

    let (admitted, _) = run_pipeline(&filter, &normalizer, &mut profile);
    assert_eq!(admitted, 3);
    assert!(profile.stats().iter().all(|s| s.status_4xx == 0));
    assert!(profile.stats().iter().all(|s| !s.uri.starts_with("/health")));
}

#[test]
fn time_window_bounds_admission() {
    let filter = Filter::from_config(&FilterConfig {
        start_time: Some("2026-08-06 10:00:02".to_string()),
        end_time: Some("2026-08-06 10:00:04".to_string()),
        ..Default::default()
    })
    .unwrap();
    let normalizer = UriNormalizer::new(false, &[]).unwrap();
    let mut profile = Profile::new(true, PercentileMode::Arrival);

    let (admitted, _) = run_pipeline(&filter, &normalizer, &mut profile);
    // 10:00:02, 10:00:03, 10:00:04 inclusive
    assert_eq!(admitted, 3);
}

#[test]
fn query_masking_groups_equivalent_uris() {
    let extractor = RecordExtractor::new(FieldConfig::default());
    let normalizer = UriNormalizer::new(true, &[]).unwrap();
    let mut profile = Profile::new(true, PercentileMode::Arrival);

    for line in [
        "method:GET\turi:/search?q=alpha&page=1\tstatus:200\tsize:10\tapptime:0.1",
        "method:GET\turi:/search?page=9&q=omega\tstatus:200\tsize:10\tapptime:0.2",
    ] {
        let record = extractor.extract(line).unwrap();
        let uri = normalizer.normalize(&record.uri).unwrap();
        profile.record(&record.method, &uri, record.status, record.response_time, 0.0, 0.0);
    }

    assert_eq!(profile.endpoint_count(), 1);
    assert_eq!(profile.stats()[0].uri, "/search?page=xxx&q=xxx");
    assert_eq!(profile.stats()[0].count, 2);
}

#[test]
fn snapshot_round_trip_preserves_every_projection() {
    let filter = Filter::from_config(&FilterConfig::default()).unwrap();
    let normalizer = UriNormalizer::new(false, &[]).unwrap();
    let mut profile = Profile::new(true, PercentileMode::Arrival);
    run_pipeline(&filter, &normalizer, &mut profile);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.yaml");

    snapshot::dump(profile.stats(), std::fs::File::create(&path).unwrap()).unwrap();
    let restored = snapshot::load(std::fs::File::open(&path).unwrap()).unwrap();

    assert_eq!(restored.len(), profile.stats().len());
    for (orig, rest) in profile.stats().iter().zip(&restored) {
        assert_eq!(rest.count, orig.count);
        assert_eq!(rest.max_response_time(), orig.max_response_time());
        assert_eq!(rest.min_response_time(), orig.min_response_time());
        assert_eq!(rest.avg_response_time(), orig.avg_response_time());
        assert_eq!(rest.p50_response_time(), orig.p50_response_time());
        assert_eq!(rest.p99_response_time(), orig.p99_response_time());
        assert_eq!(rest.stddev_response_time(), orig.stddev_response_time());
        assert_eq!(rest.sum_response_body_size(), orig.sum_response_body_size());
    }

    // a restored profile keeps routing records to the right aggregates
    let mut restored = Profile::from_stats(restored, true, PercentileMode::Arrival);
    let before = restored.endpoint_count();
    restored.record("GET", "/health", 200, 0.003, 0.0, 16.0);
    assert_eq!(restored.endpoint_count(), before);
}

#[test]
fn rendered_output_matches_sorted_order() {
    let filter = Filter::from_config(&FilterConfig::default()).unwrap();
    let normalizer = UriNormalizer::new(false, &[r"/users/\d+".to_string()]).unwrap();
    let mut profile = Profile::new(true, PercentileMode::Arrival);
    run_pipeline(&filter, &normalizer, &mut profile);

    profile.sort(SortField::MaxResponseTime, true);

    let options = PrintOptions {
        format: OutputFormat::Tsv,
        ..PrintOptions::from_config(&Default::default())
    };
    let mut buf = Vec::new();
    print_stats(profile.stats(), &options, &mut buf).unwrap();

    let out = String::from_utf8(buf).unwrap();
    let first_row = out.lines().nth(1).unwrap();
    // the 1.5s endpoint ranks first when sorting by max descending
    assert!(first_row.contains("/users"));
    assert!(first_row.contains("1.500"));
}
