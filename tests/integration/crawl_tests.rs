//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing pages and run the full
//! seed → fetch → extract → paginate cycle end-to-end.

use shelf_ripple::config::{Config, CrawlerConfig, ErrorPolicy, UserAgentConfig};
use shelf_ripple::crawler::Crawler;
use shelf_ripple::output::LineWriter;
use shelf_ripple::{BookRecord, CrawlerError};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOOK: &str = "http://schema.org/Book";

/// Creates a test configuration seeded at `{base_url}/search`
fn create_test_config(base_url: &str, cache_dir: Option<&TempDir>) -> Config {
    let host = url::Url::parse(base_url)
        .expect("Failed to parse base URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string();

    Config {
        crawler: CrawlerConfig {
            seed_url: format!("{}/search", base_url),
            allowed_domains: vec![host],
            max_depth: 2,
            cache_dir: cache_dir.map(|dir| dir.path().to_string_lossy().into_owned()),
            on_record_error: ErrorPolicy::Skip,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: None,
        },
    }
}

fn book_row(title: &str, ratings: &str) -> String {
    format!(
        r#"<tr itemscope itemtype="{BOOK}">
            <td width="5%"><a href="/book/show/{title}" title="{title}"><img src="cover.jpg"></a></td>
            <td width="100%">
                <a class="bookTitle" itemprop="url" href="/book/show/{title}"><span itemprop="name">{title}</span></a>
                <br><span class="greyText smallText uitext"><span class="minirating">{ratings}</span></span>
            </td>
        </tr>"#
    )
}

fn listing(rows: &[String], next_href: Option<&str>) -> String {
    let pagination = next_href
        .map(|href| format!(r#"<a class="next_page" rel="next" href="{href}">next »</a>"#))
        .unwrap_or_default();
    format!(
        r#"<html><head><title>Search</title></head><body>
            <table class="tableList">{}</table>
            <div style="float: right;"><a href="/search">1</a> {}</div>
        </body></html>"#,
        rows.concat(),
        pagination
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

fn redirect(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header("location", location)
}

#[tokio::test]
async fn test_full_listing_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html(listing(
            &[
                book_row("Baby Signs", "4.05 avg rating — 1234 ratings"),
                r#"<tr itemtype="http://schema.org/Person"><td>author row</td></tr>"#.to_string(),
                book_row("Sign With Your Baby", "3.50 avg rating — 1 rating"),
            ],
            Some("/search/page/2"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/page/2"))
        .respond_with(html(listing(
            &[
                book_row("Separated Count", "4.05 avg rating — 1,234 ratings"),
                book_row("Signing Time", "4.40 avg rating — 87 ratings"),
            ],
            Some("/search/page/3"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Depth 3 is beyond max-depth 2
    Mock::given(method("GET"))
        .and(path("/search/page/3"))
        .respond_with(html(listing(&[], None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, None);
    let mut crawler = Crawler::new(config).expect("Failed to create crawler");
    let mut records: Vec<BookRecord> = Vec::new();
    let stats = crawler.run(&mut records).await.expect("Crawl failed");

    let lines: Vec<String> = records.iter().map(|r| r.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "1234|405|Baby Signs",
            "1|350|Sign With Your Baby",
            "87|440|Signing Time",
        ]
    );
    assert_eq!(records[0].detail_url, "/book/show/Baby Signs");

    assert_eq!(stats.pages_visited, 2);
    assert_eq!(stats.records_emitted, 3);
    assert_eq!(stats.records_skipped, 1);
    assert_eq!(stats.links_followed, 1);
    assert_eq!(stats.fetch_failures, 0);
}

#[tokio::test]
async fn test_output_lines_written_to_stream() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html(listing(
            &[
                book_row("Signs | Symbols", "2.00 avg rating — 12 ratings"),
                book_row("Little Hands", "5.00 avg rating — 65535 ratings"),
            ],
            None,
        )))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, None);
    let mut crawler = Crawler::new(config).expect("Failed to create crawler");
    let mut sink = LineWriter::new(Vec::new());
    crawler.run(&mut sink).await.expect("Crawl failed");

    let output = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(output, "12|200|Signs | Symbols\n65535|500|Little Hands\n");
}

#[tokio::test]
async fn test_halt_policy_aborts_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html(listing(
            &[
                book_row("Fine", "4.00 avg rating — 10 ratings"),
                book_row("Broken", "9.99 avg rating — 10 ratings"),
            ],
            Some("/search/page/2"),
        )))
        .mount(&mock_server)
        .await;

    // Links are handled after rows, so the halted page never queues page 2
    Mock::given(method("GET"))
        .and(path("/search/page/2"))
        .respond_with(html(listing(&[], None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url, None);
    config.crawler.on_record_error = ErrorPolicy::Halt;

    let mut crawler = Crawler::new(config).expect("Failed to create crawler");
    let mut records: Vec<BookRecord> = Vec::new();
    let result = crawler.run(&mut records).await;

    assert!(matches!(result, Err(CrawlerError::Record { .. })));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Fine");
}

#[tokio::test]
async fn test_second_run_served_from_cache() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let cache_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html(listing(
            &[book_row("Cached Book", "3.75 avg rating — 40 ratings")],
            None,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut first: Vec<BookRecord> = Vec::new();
    let mut crawler = Crawler::new(create_test_config(&base_url, Some(&cache_dir))).unwrap();
    let first_stats = crawler.run(&mut first).await.expect("First crawl failed");
    assert_eq!(first_stats.pages_from_cache, 0);

    let mut second: Vec<BookRecord> = Vec::new();
    let mut crawler = Crawler::new(create_test_config(&base_url, Some(&cache_dir))).unwrap();
    let second_stats = crawler.run(&mut second).await.expect("Second crawl failed");

    assert_eq!(second_stats.pages_from_cache, 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_failed_fetch_is_not_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let cache_dir = TempDir::new().unwrap();
    let mut crawler = Crawler::new(create_test_config(&base_url, Some(&cache_dir))).unwrap();
    let mut records: Vec<BookRecord> = Vec::new();
    let stats = crawler.run(&mut records).await.expect("Crawl should finish");

    assert!(records.is_empty());
    assert_eq!(stats.pages_visited, 0);
    assert_eq!(stats.fetch_failures, 1);

    // Error responses are never cached
    let entries = std::fs::read_dir(cache_dir.path()).unwrap().count();
    assert_eq!(entries, 0);
}

#[tokio::test]
async fn test_offsite_next_page_not_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html(listing(
            &[book_row("Only Book", "4.00 avg rating — 2 ratings")],
            Some("https://www.amazon.com/s?page=2"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut crawler = Crawler::new(create_test_config(&base_url, None)).unwrap();
    let mut records: Vec<BookRecord> = Vec::new();
    let stats = crawler.run(&mut records).await.expect("Crawl failed");

    assert_eq!(records.len(), 1);
    assert_eq!(stats.pages_visited, 1);
    assert_eq!(stats.links_followed, 0);
}

#[tokio::test]
async fn test_non_html_response_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{\"books\": []}", "application/json"))
        .mount(&mock_server)
        .await;

    let mut crawler = Crawler::new(create_test_config(&base_url, None)).unwrap();
    let mut records: Vec<BookRecord> = Vec::new();
    let stats = crawler.run(&mut records).await.expect("Crawl failed");

    assert!(records.is_empty());
    assert_eq!(stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_listing_pages_served_as_html() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html(listing(&[], None)))
        .mount(&mock_server)
        .await;

    let response = reqwest::get(format!("{}/search", mock_server.uri()))
        .await
        .unwrap();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(content_type.starts_with("text/html"), "{}", content_type);
}

#[tokio::test]
async fn test_redirect_off_allow_list_not_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let port = url::Url::parse(&base_url).unwrap().port().unwrap();

    // Same server under another name; only 127.0.0.1 is allowed
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(redirect(&format!("http://localhost:{}/elsewhere", port)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(html(listing(
            &[book_row("Offsite Book", "4.00 avg rating — 9 ratings")],
            None,
        )))
        .expect(0)
        .mount(&mock_server)
        .await;

    let cache_dir = TempDir::new().unwrap();
    let mut crawler = Crawler::new(create_test_config(&base_url, Some(&cache_dir))).unwrap();
    let mut records: Vec<BookRecord> = Vec::new();
    let stats = crawler.run(&mut records).await.expect("Crawl should finish");

    assert!(records.is_empty());
    assert_eq!(stats.pages_visited, 0);
    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(std::fs::read_dir(cache_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_redirect_loop_is_a_fetch_failure() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(redirect("/bounce"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/bounce"))
        .respond_with(redirect("/search"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut crawler = Crawler::new(create_test_config(&base_url, None)).unwrap();
    let mut records: Vec<BookRecord> = Vec::new();
    let stats = crawler.run(&mut records).await.expect("Crawl should finish");

    assert!(records.is_empty());
    assert_eq!(stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_redirected_page_resolves_links_against_target() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let cache_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(redirect("/books/search"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/books/search"))
        .respond_with(html(listing(
            &[book_row("First Signs", "4.10 avg rating — 21 ratings")],
            Some("page2"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/books/page2"))
        .respond_with(html(listing(
            &[book_row("Second Signs", "3.90 avg rating — 8 ratings")],
            None,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut first: Vec<BookRecord> = Vec::new();
    let mut crawler = Crawler::new(create_test_config(&base_url, Some(&cache_dir))).unwrap();
    let first_stats = crawler.run(&mut first).await.expect("First crawl failed");

    let titles: Vec<&str> = first.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["First Signs", "Second Signs"]);
    assert_eq!(first_stats.fetch_failures, 0);

    // The cached seed keeps its redirect target, so the relative link
    // resolves to the same page without touching the network
    let mut second: Vec<BookRecord> = Vec::new();
    let mut crawler = Crawler::new(create_test_config(&base_url, Some(&cache_dir))).unwrap();
    let second_stats = crawler.run(&mut second).await.expect("Second crawl failed");

    assert_eq!(first, second);
    assert_eq!(second_stats.pages_from_cache, 2);
    assert_eq!(second_stats.fetch_failures, 0);
}
