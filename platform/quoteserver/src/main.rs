use actix_web::middleware::Logger;
use actix_web::{get, web, App, HttpResponse, HttpServer};
use log::{error, info};
use mockall::mock;
use serde::Deserialize;
use serde_json::json;
use sharesansar::quote::{Client as QuoteClient, Error as QuoteError, Interface, Quote};
use std::env;
use std::io;
use std::num::ParseIntError;
use std::sync::Arc;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>ShareSansar Stock API</title>
    <style>
        body { font-family: Arial, sans-serif; max-width: 800px; margin: 50px auto; padding: 20px; }
        input { width: 70%; padding: 10px; font-size: 16px; }
        button { width: 25%; padding: 10px; font-size: 16px; }
        .output { background-color: #f9f9f9; padding: 20px; margin-top: 20px; }
        pre { white-space: pre-wrap; word-wrap: break-word; }
        code { background-color: #f5f5f5; padding: 2px 6px; font-family: monospace; }
    </style>
</head>
<body>
    <h1>ShareSansar Stock API</h1>
    <div>
        <input type="text" id="ticker" placeholder="Enter stock ticker (e.g., ghl, nabil, trh)">
        <button onclick="fetchStock()">Get Data</button>
    </div>
    <div id="output" class="output" style="display:none">
        <pre id="result"></pre>
    </div>
    <h3>API Endpoints</h3>
    <p><code>GET /api/stock/&lt;ticker&gt;</code> &mdash; quote for a ticker, e.g. <code>/api/stock/ghl</code></p>
    <p><code>GET /api/stock?ticker=&lt;ticker&gt;</code> &mdash; same via query string</p>
    <script>
        function fetchStock() {
            const ticker = document.getElementById('ticker').value.trim();
            if (!ticker) { alert('Please enter a ticker symbol'); return; }
            fetch('/api/stock/' + ticker)
                .then(response => response.json())
                .then(data => {
                    document.getElementById('result').textContent = JSON.stringify(data, null, 2);
                    document.getElementById('output').style.display = 'block';
                })
                .catch(error => {
                    document.getElementById('result').textContent = 'Error: ' + error;
                    document.getElementById('output').style.display = 'block';
                });
        }
        document.getElementById('ticker').addEventListener('keypress', function(e) {
            if (e.key === 'Enter') fetchStock();
        });
    </script>
</body>
</html>
"#;

#[get("/")]
async fn home_handler() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[get("/health")]
async fn health_handler(quote_client: web::Data<Option<Arc<dyn Interface>>>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "scraper_available": quote_client.is_some(),
    }))
}

async fn lookup_response(quote_client: &Option<Arc<dyn Interface>>, ticker: &str) -> HttpResponse {
    let Some(quote_client) = quote_client else {
        return HttpResponse::ServiceUnavailable().json(json!({
            "status": "error",
            "ticker": ticker,
            "message": "Quote client is not available",
        }));
    };

    match quote_client.fetch_quote(ticker.to_string()).await {
        Ok(quote) => HttpResponse::Ok().json(json!({
            "status": "success",
            "ticker": quote.ticker,
            "data": quote,
        })),
        Err(e) => {
            error!("Quote lookup failed: {}", e);

            HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "ticker": ticker,
                "message": e.to_string(),
            }))
        }
    }
}

#[get("/api/stock/{ticker}")]
async fn stock_by_path_handler(
    path: web::Path<String>,
    quote_client: web::Data<Option<Arc<dyn Interface>>>,
) -> HttpResponse {
    lookup_response(&quote_client, &path.into_inner()).await
}

#[derive(Deserialize)]
struct StockQuery {
    ticker: Option<String>,
}

#[get("/api/stock")]
async fn stock_by_query_handler(
    query: web::Query<StockQuery>,
    quote_client: web::Data<Option<Arc<dyn Interface>>>,
) -> HttpResponse {
    let ticker = query
        .ticker
        .as_deref()
        .map(str::trim)
        .filter(|ticker| !ticker.is_empty());

    match ticker {
        Some(ticker) => lookup_response(&quote_client, ticker).await,
        None => HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": "Ticker parameter is required",
        })),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let default_log_filter = if env::var("APP_ENV").as_deref() == Ok("development") {
        "debug"
    } else {
        "info"
    };

    env_logger::init_from_env(env_logger::Env::default().default_filter_or(default_log_filter));

    let server_port_environment_variable = env::var("PORT").unwrap_or("5000".to_string());

    let server_port = server_port_environment_variable
        .parse::<u16>()
        .map_err(|e: ParseIntError| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let quote_client: Option<Arc<dyn Interface>> = match QuoteClient::new() {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            error!("Failed to build quote client: {}", e);
            None
        }
    };

    info!("Server running at http://0.0.0.0:{}", server_port);
    info!("Web interface: http://0.0.0.0:{}/", server_port);
    info!("API endpoint: http://0.0.0.0:{}/api/stock/<ticker>", server_port);
    info!("Health check: http://0.0.0.0:{}/health", server_port);
    info!("Quote client available: {}", quote_client.is_some());

    let quote_client = web::Data::new(quote_client);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(quote_client.clone())
            .service(home_handler)
            .service(health_handler)
            .service(stock_by_path_handler)
            .service(stock_by_query_handler)
    })
    .bind(("0.0.0.0", server_port))?
    .run()
    .await
}

mock! {
    pub QuoteInterfaceMock {}

    #[async_trait::async_trait]
    impl Interface for QuoteInterfaceMock {
        async fn fetch_quote(&self, ticker: String) -> Result<Quote, QuoteError>;
    }
}
