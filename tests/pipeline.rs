use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use venue_crawler::error::FetchError;
use venue_crawler::models::{Config, MatchRecord, QueryRequest, VenueDescriptor, VenueKind};
use venue_crawler::pipeline::run_crawler;
use venue_crawler::utils::http::{FetchedDocument, Fetcher, ReqwestFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn conference_catalog(volume_href: &str) -> String {
    format!(
        r#"<html><body>
        <div id="main">
          <header class="h2"><h2 id="2025">39. AAAI 2025</h2></header>
          <ul class="publ-list">
            <li><a class="toc-link" href="{volume_href}">[contents]</a></li>
          </ul>
          <header class="h2"><h2 id="2024">38. AAAI 2024</h2></header>
          <ul class="publ-list">
            <li><a class="toc-link" href="aaai2024.html">[contents]</a></li>
          </ul>
        </div>
        </body></html>"#
    )
}

fn volume_page(titles: &[&str]) -> String {
    let entries: String = titles
        .iter()
        .map(|t| format!(r#"<li class="entry"><cite><span class="title">{t}</span></cite></li>"#))
        .collect();
    format!(r#"<html><body><ul class="publ-list">{entries}</ul></body></html>"#)
}

fn journal_catalog() -> String {
    r#"<html><body>
      <header id="info-section"><p>Journal info</p></header>
      <ul>
        <li><a href="vol37.html">Volume 37: 2025</a></li>
        <li><a href="vol36.html">Volume 36: 2024</a></li>
      </ul>
    </body></html>"#
        .to_string()
}

async fn serve(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

fn venue(key: &str, kind: VenueKind, url: String) -> VenueDescriptor {
    VenueDescriptor {
        key: key.to_string(),
        full_name: String::new(),
        kind,
        rank: "A".to_string(),
        url,
    }
}

fn fetcher() -> Arc<dyn Fetcher> {
    Arc::new(ReqwestFetcher::new(&Config::default().crawler).unwrap())
}

#[tokio::test]
async fn conference_scan_writes_single_match() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/db/conf/aaai/",
        200,
        conference_catalog("aaai2025.html"),
    )
    .await;
    serve(
        &server,
        "/db/conf/aaai/aaai2025.html",
        200,
        volume_page(&["Clustering Methods for X.", "Unrelated Paper"]),
    )
    .await;

    let tmp = TempDir::new().unwrap();
    let venues = vec![venue(
        "AAAI",
        VenueKind::Conference,
        format!("{}/db/conf/aaai/", server.uri()),
    )];
    let query = QueryRequest::new(["2025"], ["cluster"], tmp.path().join("query_result"));

    let report = run_crawler(&Config::default(), fetcher(), &venues, &query)
        .await
        .unwrap();

    assert_eq!(
        report.records,
        vec![MatchRecord {
            year: "2025".to_string(),
            venue_label: "AAAI (A类 会议)".to_string(),
            title: "Clustering Methods for X".to_string(),
        }]
    );
    assert_eq!(report.venue_failures, 0);

    let content = std::fs::read_to_string(&report.result_path).unwrap();
    assert_eq!(content, "2025-AAAI (A类 会议)  Clustering Methods for X");
    assert!(report.result_path.starts_with(tmp.path().join("query_result")));
    let file_name = report.result_path.file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with("2025-cluster("));
    assert!(file_name.ends_with(").txt"));

    let log = std::fs::read_to_string(&report.log_path).unwrap();
    assert!(report.log_path.parent().unwrap().ends_with("logs"));
    assert!(log.contains("========== AAAI (A类 会议) =========="));
    assert!(log.contains("Saved results to"));
}

#[tokio::test]
async fn failing_venue_does_not_affect_others() {
    let server = MockServer::start().await;
    serve(&server, "/db/conf/broken/", 500, String::new()).await;
    serve(&server, "/db/journals/tkde/", 200, journal_catalog()).await;
    serve(
        &server,
        "/db/journals/tkde/vol37.html",
        200,
        volume_page(&["Deep Clustering.", "Graph Cluster Analysis?", "Databases"]),
    )
    .await;

    let tmp = TempDir::new().unwrap();
    let venues = vec![
        venue(
            "BROKEN",
            VenueKind::Conference,
            format!("{}/db/conf/broken/", server.uri()),
        ),
        venue(
            "TKDE",
            VenueKind::Journal,
            format!("{}/db/journals/tkde/", server.uri()),
        ),
    ];
    let query = QueryRequest::new(["2025"], ["cluster"], tmp.path());

    let report = run_crawler(&Config::default(), fetcher(), &venues, &query)
        .await
        .unwrap();

    let titles: Vec<_> = report.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Deep Clustering", "Graph Cluster Analysis"]);
    assert!(report.records.iter().all(|r| r.venue_label == "TKDE (A类 期刊)"));
    assert_eq!(report.venue_total, 2);
    assert_eq!(report.venue_failures, 1);

    let log = std::fs::read_to_string(&report.log_path).unwrap();
    assert!(log.contains("========== BROKEN (A类 会议) =========="));
    assert!(log.contains("bad status 500"));
    assert!(log.contains("[1/2] "));
    assert!(log.contains("[2/2] "));
}

#[tokio::test]
async fn redirected_catalog_resolves_links_from_final_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/db/conf/aaai"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("Location", format!("{}/db/conf/aaai/", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    serve(&server, "/db/conf/aaai/", 200, conference_catalog("aaai2025.html")).await;
    serve(
        &server,
        "/db/conf/aaai/aaai2025.html",
        200,
        volume_page(&["Clustering at Scale"]),
    )
    .await;

    let tmp = TempDir::new().unwrap();
    let venues = vec![venue(
        "AAAI",
        VenueKind::Conference,
        format!("{}/db/conf/aaai", server.uri()),
    )];
    let query = QueryRequest::new(["2025"], ["cluster"], tmp.path());

    let report = run_crawler(&Config::default(), fetcher(), &venues, &query)
        .await
        .unwrap();

    assert_eq!(report.match_count(), 1);
    assert_eq!(report.records[0].title, "Clustering at Scale");
    assert_eq!(report.link_failures, 0);
}

#[tokio::test]
async fn unknown_type_venue_is_skipped() {
    let server = MockServer::start().await;
    serve(&server, "/db/conf/aaai/", 200, conference_catalog("aaai2025.html")).await;
    serve(
        &server,
        "/db/conf/aaai/aaai2025.html",
        200,
        volume_page(&["Cluster Ensembles"]),
    )
    .await;

    let tmp = TempDir::new().unwrap();
    let venues = vec![
        venue(
            "WS",
            VenueKind::Unknown("workshop".to_string()),
            format!("{}/db/conf/aaai/", server.uri()),
        ),
        venue(
            "AAAI",
            VenueKind::Conference,
            format!("{}/db/conf/aaai/", server.uri()),
        ),
    ];
    let query = QueryRequest::new(["2025"], Vec::<String>::new(), tmp.path());

    let report = run_crawler(&Config::default(), fetcher(), &venues, &query)
        .await
        .unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].venue_label, "AAAI (A类 会议)");
    assert_eq!(report.venue_failures, 1);

    let log = std::fs::read_to_string(&report.log_path).unwrap();
    assert!(log.contains("unknown venue type 'workshop'"));
}

#[tokio::test]
async fn zero_matches_is_a_successful_run() {
    let server = MockServer::start().await;
    serve(&server, "/db/conf/aaai/", 200, conference_catalog("aaai2025.html")).await;
    serve(
        &server,
        "/db/conf/aaai/aaai2025.html",
        200,
        volume_page(&["Unrelated Paper"]),
    )
    .await;

    let tmp = TempDir::new().unwrap();
    let venues = vec![venue(
        "AAAI",
        VenueKind::Conference,
        format!("{}/db/conf/aaai/", server.uri()),
    )];
    let query = QueryRequest::new(["2025"], ["cluster"], tmp.path());

    let report = run_crawler(&Config::default(), fetcher(), &venues, &query)
        .await
        .unwrap();

    assert_eq!(report.match_count(), 0);
    assert_eq!(std::fs::read_to_string(&report.result_path).unwrap(), "");
}

#[tokio::test]
async fn missing_volume_page_counts_as_link_failure() {
    let server = MockServer::start().await;
    serve(&server, "/db/conf/aaai/", 200, conference_catalog("gone.html")).await;

    let tmp = TempDir::new().unwrap();
    let venues = vec![venue(
        "AAAI",
        VenueKind::Conference,
        format!("{}/db/conf/aaai/", server.uri()),
    )];
    let query = QueryRequest::new(["2025"], ["cluster"], tmp.path());

    let report = run_crawler(&Config::default(), fetcher(), &venues, &query)
        .await
        .unwrap();

    assert_eq!(report.match_count(), 0);
    assert_eq!(report.venue_failures, 0);
    assert_eq!(report.link_failures, 1);
}

#[tokio::test]
async fn unwritable_output_before_start_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("occupied");
    std::fs::write(&blocker, "a file, not a directory").unwrap();

    let venues = vec![venue(
        "AAAI",
        VenueKind::Conference,
        "http://127.0.0.1:1/db/conf/aaai/".to_string(),
    )];
    let query = QueryRequest::new(["2025"], ["cluster"], &blocker);

    let err = run_crawler(&Config::default(), fetcher(), &venues, &query)
        .await
        .unwrap_err();

    assert!(err.is_persistence());
}

/// Replaces the output directory with a plain file while the run is in flight.
struct OutputClobberingFetcher {
    output_dir: PathBuf,
}

#[async_trait]
impl Fetcher for OutputClobberingFetcher {
    async fn fetch(&self, _url: &str) -> Result<FetchedDocument, FetchError> {
        std::fs::remove_dir_all(&self.output_dir).unwrap();
        std::fs::write(&self.output_dir, "a file, not a directory").unwrap();
        Err(FetchError::BadStatus(503))
    }
}

#[tokio::test]
async fn report_write_failure_after_crawl_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let output_dir = tmp.path().join("query_result");

    let venues = vec![venue(
        "AAAI",
        VenueKind::Conference,
        "https://dblp.test/db/conf/aaai/".to_string(),
    )];
    let query = QueryRequest::new(["2025"], ["cluster"], &output_dir);
    let fetcher: Arc<dyn Fetcher> = Arc::new(OutputClobberingFetcher {
        output_dir: output_dir.clone(),
    });

    let err = run_crawler(&Config::default(), fetcher, &venues, &query)
        .await
        .unwrap_err();

    assert!(err.is_persistence());
    assert!(output_dir.is_file());
}

/// Fails every request after a short delay, tracking how many are in flight.
#[derive(Default)]
struct CountingFetcher {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

#[async_trait]
impl Fetcher for CountingFetcher {
    async fn fetch(&self, _url: &str) -> Result<FetchedDocument, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Err(FetchError::BadStatus(503))
    }
}

#[tokio::test]
async fn pool_size_bounds_in_flight_venues() {
    let tmp = TempDir::new().unwrap();
    let venues: Vec<_> = (0..6)
        .map(|i| {
            venue(
                &format!("V{i}"),
                VenueKind::Conference,
                format!("https://dblp.test/db/conf/v{i}/"),
            )
        })
        .collect();
    let query = QueryRequest::new(["2025"], ["cluster"], tmp.path());
    let mut config = Config::default();
    config.crawler.max_concurrent = 2;

    let counting = Arc::new(CountingFetcher::default());
    let fetcher: Arc<dyn Fetcher> = counting.clone();
    let report = run_crawler(&config, fetcher, &venues, &query).await.unwrap();

    assert_eq!(report.venue_failures, 6);
    assert_eq!(counting.calls.load(Ordering::SeqCst), 6);
    assert_eq!(counting.peak.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn venue_blocks_stay_contiguous_under_small_pool() {
    let server = MockServer::start().await;
    serve(&server, "/db/conf/aaai/", 200, conference_catalog("aaai2025.html")).await;
    serve(
        &server,
        "/db/conf/aaai/aaai2025.html",
        200,
        volume_page(&["Cluster A.", "Cluster B."]),
    )
    .await;

    let tmp = TempDir::new().unwrap();
    let venues: Vec<_> = (0..6)
        .map(|i| {
            venue(
                &format!("V{i}"),
                VenueKind::Conference,
                format!("{}/db/conf/aaai/", server.uri()),
            )
        })
        .collect();
    let query = QueryRequest::new(["2025"], ["cluster"], tmp.path());
    let mut config = Config::default();
    config.crawler.max_concurrent = 2;

    let report = run_crawler(&config, fetcher(), &venues, &query).await.unwrap();

    assert_eq!(report.match_count(), 12);
    // Each venue's block stays contiguous and in page order.
    for pair in report.records.chunks(2) {
        assert_eq!(pair[0].venue_label, pair[1].venue_label);
        assert_eq!(pair[0].title, "Cluster A");
        assert_eq!(pair[1].title, "Cluster B");
    }

    let log = std::fs::read_to_string(&report.log_path).unwrap();
    for i in 0..6 {
        assert_eq!(log.matches(&format!("========== V{i} (A类 会议) ==========")).count(), 1);
    }
}
