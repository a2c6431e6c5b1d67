use actix_files::Files;
use actix_web::dev::Service as _;
use actix_web::http::header::{HeaderValue, CACHE_CONTROL};
use actix_web::{middleware, App, HttpServer};
use std::env;

/// Timetables, holidays and the verification file change without a rebuild
fn is_data_file(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);
    let root = env::var("DIST_DIR").unwrap_or_else(|_| "./dist".to_string());

    println!("Serving {root} on 0.0.0.0:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .wrap_fn(|req, srv| {
                let no_cache = is_data_file(req.path());
                let fut = srv.call(req);
                async move {
                    let mut res = fut.await?;
                    if no_cache {
                        res.headers_mut().insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
                    }
                    Ok(res)
                }
            })
            .service(Files::new("/", root.clone()).index_file("index.html"))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
