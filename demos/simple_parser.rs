//! Parse raw HTTP requests without running a server.

use microhttp_web::parse_request;

fn main() {
    let request_bytes =
        b"GET /search?q=hello%20world&page=2 HTTP/1.1\r\nHost: example.com\r\nUser-Agent: ExampleBrowser/1.0\r\n\r\n";

    match parse_request(request_bytes) {
        Ok(request) => {
            println!("Successfully parsed HTTP request:");
            println!("Method: {}", request.method);
            println!("Path: {}", request.path);
            println!("Version: {}", request.version);
            println!("Query parameters:");
            for (name, value) in &request.query_params {
                println!("  {name} = {value}");
            }
            println!("Headers:");
            for (name, value) in &request.headers {
                println!("  {name}: {value}");
            }
        }
        Err(err) => {
            println!("Error parsing request: {err}");
        }
    }

    let form_request = b"POST /login HTTP/1.1\r\nHost: example.com\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: 31\r\n\r\nusername=geektutu&password=1234";

    if let Ok(request) = parse_request(form_request) {
        println!("\nForm fields of {}:", request.uri());
        for (name, value) in request.form_params() {
            println!("  {name} = {value}");
        }
    }

    // An unknown method is rejected
    let invalid_request = b"INVALID /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";

    match parse_request(invalid_request) {
        Ok(_) => {
            println!("\nUnexpectedly parsed invalid request!");
        }
        Err(err) => {
            println!("\nExpected error parsing invalid request: {err}");
        }
    }
}
