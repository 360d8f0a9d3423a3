//! A fuller server: route groups, middleware, static files and templates.
//!
//! Try:
//!
//! ```text
//! curl http://127.0.0.1:8080/
//! curl http://127.0.0.1:8080/v1/hello?name=geektutu
//! curl http://127.0.0.1:8080/v2/hello/geektutu
//! curl -H 'Authorization: Bearer demo' http://127.0.0.1:8080/v2/hello/geektutu
//! curl -d 'username=geektutu&password=1234' http://127.0.0.1:8080/v2/login
//! curl http://127.0.0.1:8080/assets/Cargo.toml
//! ```

use std::time::Instant;

use microhttp_web::{Context, Engine, HttpServer, RouteError, ServerConfig, StatusCode, middleware};
use microhttp_web::server::RenderError;
use log::info;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct Student {
    name: String,
    age: u8,
}

/// Reject requests without an `Authorization` header.
fn only_authorized(c: &mut Context) {
    if c.header("Authorization").is_none() {
        c.fail(StatusCode::Unauthorized, "missing Authorization header");
        return;
    }
    c.next();
}

/// Log the time spent below this middleware for the v2 group.
fn timed_v2(c: &mut Context) {
    let start = Instant::now();
    c.next();
    info!("[{}] {} in {:?} for group v2", c.status_code().as_u16(), c.path(), start.elapsed());
}

/// A tiny renderer substituting `{{key}}` with top-level fields.
fn render(name: &str, data: &Value) -> Result<String, RenderError> {
    let template = match name {
        "student.tmpl" => "<html><body><p>{{name}} is {{age}}</p></body></html>",
        _ => return Err(format!("template {name} not found").into()),
    };

    let fields = data.as_object().ok_or("template data must be an object")?;
    let html = fields.iter().fold(template.to_string(), |html, (key, value)| {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        html.replace(&format!("{{{{{key}}}}}"), &value)
    });
    Ok(html)
}

fn build_engine() -> Result<Engine, RouteError> {
    let engine = Engine::new();
    engine.use_middleware(middleware::logger())?;
    engine.set_renderer(render);

    engine.get("/", |c| {
        c.html(StatusCode::Ok, "student.tmpl", &Student { name: "Geektutu".to_string(), age: 20 });
    })?;
    engine.static_files("/assets", ".")?;

    let v1 = engine.group("/v1")?;
    v1.get("/hello", |c| {
        let name = c.query("name").unwrap_or("World").to_string();
        c.string(StatusCode::Ok, format!("hello {name}, you're at {}", c.path()));
    })?;

    let v2 = engine.group("/v2")?;
    v2.use_middleware(timed_v2)?;
    v2.post("/login", |c| {
        let payload = json!({
            "username": c.post_form("username"),
            "password": c.post_form("password"),
        });
        c.json(StatusCode::Ok, &payload);
    })?;

    let private = v2.group("/hello")?;
    private.use_middleware(only_authorized)?;
    private.get("/:name", |c| {
        let name = c.param("name").unwrap_or_default().to_string();
        c.string(StatusCode::Ok, format!("hello {name}, you're at {}", c.path()));
    })?;

    engine.get("/files/*filepath", |c| {
        let params = c.params().clone();
        c.json(StatusCode::Ok, &params);
    })?;

    Ok(engine)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let engine = build_engine()?;
    let server = HttpServer::new(ServerConfig::default(), engine.freeze());
    server.start().await?;

    Ok(())
}
