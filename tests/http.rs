use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/hotel_bookings.csv");

#[derive(Debug, Deserialize)]
struct Point {
    key: u32,
    value: Option<f64>,
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Line {
    name: String,
    points: Vec<Point>,
}

#[derive(Debug, Deserialize)]
struct Table {
    average: Line,
    current: Line,
}

#[derive(Debug, Deserialize)]
struct LineView {
    title: String,
    table: Table,
    stats_current: String,
    stats_all: String,
}

#[derive(Debug, Deserialize)]
struct Country {
    country: String,
    count: u64,
}

#[derive(Debug, Deserialize)]
struct CountriesView {
    title: String,
    countries: Vec<Country>,
}

#[derive(Debug, Deserialize)]
struct Stay {
    nights: u32,
    percent: f64,
}

#[derive(Debug, Deserialize)]
struct StaysView {
    title: String,
    stays: Vec<Stay>,
}

#[derive(Debug, Deserialize)]
struct OptionsView {
    years: Vec<i32>,
    default_year: i32,
    default_month: u32,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/options")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_hotel_dashboard"))
        .env("PORT", port.to_string())
        .env("HOTEL_DATA_PATH", FIXTURE)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn get_json<T: for<'de> Deserialize<'de>>(path: &str, query: &[(&str, &str)]) -> T {
    let server = shared_server().await;
    Client::new()
        .get(format!("{}{path}", server.base_url))
        .query(query)
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn get_status(path: &str, query: &[(&str, &str)]) -> StatusCode {
    let server = shared_server().await;
    Client::new()
        .get(format!("{}{path}", server.base_url))
        .query(query)
        .send()
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn http_options_list_dataset_years() {
    let options: OptionsView = get_json("/api/options", &[]).await;
    assert_eq!(options.years, vec![2015, 2016, 2017]);
    assert_eq!(options.default_year, 2016);
    assert_eq!(options.default_month, 1);
}

#[tokio::test]
async fn http_year_view_uses_defaults() {
    let view: LineView = get_json("/api/year", &[]).await;
    assert_eq!(view.title, "Reservations for 2016");
    assert_eq!(view.table.average.name, "Average");
    assert_eq!(view.table.current.name, "2016");
    assert_eq!(view.table.current.points.len(), 12);
    assert_eq!(view.table.current.points[0].value, Some(4.0));
    assert_eq!(view.stats_current, "Year 2016 Ave : 2,  Max : 4(Jan),  Min : 1(Jul)");
    assert_eq!(view.stats_all, "Historical Ave : 2,  Max : 2(Jan),  Min : 1(Aug)");
}

#[tokio::test]
async fn http_year_view_averages_daily_rate() {
    let view: LineView = get_json(
        "/api/year",
        &[("metric", "Average daily rate"), ("year", "2016")],
    )
    .await;
    assert_eq!(view.title, "Average daily rate for 2016");
    assert_eq!(view.table.current.points[0].value, Some(68.75));
    assert_eq!(view.stats_current, "Year 2016 Ave : 124,  Max : 180(Jul),  Min : 69(Jan)");
}

#[tokio::test]
async fn http_month_view_filters_hotel_type() {
    let view: LineView = get_json(
        "/api/month",
        &[("hotel", "Resort"), ("year", "2016"), ("month", "1")],
    )
    .await;
    assert_eq!(view.title, "Reservations for January 2016");
    assert_eq!(view.table.current.points.len(), 31);
    let second = &view.table.current.points[1];
    assert_eq!(second.key, 2);
    assert_eq!(second.value, Some(1.0));
    assert_eq!(second.note.as_deref(), Some("Saturday"));
    assert_eq!(view.stats_current, "Jan 2016 Ave : 1,  Max : 1(Jan 2),  Min : 1(Jan 2)");
}

#[tokio::test]
async fn http_month_view_reports_missing_month() {
    let view: LineView = get_json("/api/month", &[("year", "2015"), ("month", "3")]).await;
    assert_eq!(view.stats_current, "No data for this month");
    assert_eq!(view.stats_all, "No data for this month");
}

#[tokio::test]
async fn http_histograms_follow_selection() {
    let countries: CountriesView =
        get_json("/api/countries", &[("year", "2016"), ("month", "1")]).await;
    assert_eq!(countries.title, "Countries of origin Jan 2016");
    let ranked: Vec<(&str, u64)> = countries
        .countries
        .iter()
        .map(|c| (c.country.as_str(), c.count))
        .collect();
    assert_eq!(ranked, vec![("GBR", 2), ("FRA", 1)]);

    let stays: StaysView = get_json("/api/stays", &[("year", "2016"), ("month", "1")]).await;
    assert_eq!(stays.title, "Lengths of Stay Jan 2016");
    assert_eq!(stays.stays.len(), 2);
    assert_eq!(stays.stays[0].nights, 2);
    assert!((stays.stays[0].percent - 75.0).abs() < 1e-9);
    assert_eq!(stays.stays[1].nights, 5);
}

#[tokio::test]
async fn http_rejects_invalid_selection() {
    assert_eq!(get_status("/api/month", &[("month", "13")]).await, StatusCode::BAD_REQUEST);
    assert_eq!(get_status("/api/stays", &[("month", "0")]).await, StatusCode::BAD_REQUEST);
    assert_eq!(get_status("/api/year", &[("metric", "Towels")]).await, StatusCode::BAD_REQUEST);
    assert_eq!(get_status("/api/year", &[("hotel", "Motel")]).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_index_serves_dashboard() {
    let server = shared_server().await;
    let body = Client::new()
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Super Hotel Management"));
    assert!(body.contains("year-stats-current"));
}
