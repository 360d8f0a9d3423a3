//! A basic server showing static routes, path parameters and query strings.

use microhttp_web::{Engine, HttpServer, ServerConfig, StatusCode, middleware};
use log::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize the logger
    env_logger::init();

    let engine = Engine::new();
    engine.use_middleware(middleware::logger())?;

    engine.get("/", |c| c.string(StatusCode::Ok, "Hello, World!"))?;

    // GET /hello?name=tutu
    engine.get("/hello", |c| {
        let name = c.query("name").unwrap_or("World").to_string();
        c.string(StatusCode::Ok, format!("Hello, {name}! You're at {}", c.path()));
    })?;

    // GET /hello/tutu
    engine.get("/hello/:name", |c| {
        let name = c.param("name").unwrap_or_default().to_string();
        c.string(StatusCode::Ok, format!("Hello, {name}!"));
    })?;

    // GET /status?code=404
    engine.get("/status", |c| {
        let status_code = match c.query("code") {
            Some("404") => StatusCode::NotFound,
            Some("500") => StatusCode::InternalServerError,
            _ => StatusCode::Ok,
        };
        c.string(status_code, format!("Status: {}", status_code.as_u16()));
    })?;

    let config = ServerConfig::new("127.0.0.1:8081".parse()?);
    info!("Starting server on http://{}", config.addr);

    let server = HttpServer::new(config, engine.freeze());
    server.start().await?;

    Ok(())
}
