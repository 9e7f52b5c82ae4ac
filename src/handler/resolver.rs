//! Response resolution module
//!
//! Decides the status of a parsed request against the filesystem. Checks run in a
//! fixed order and the first match wins:
//!
//! 1. method other than GET/HEAD -> 501
//! 2. malformed `If-Modified-Since` -> 400 (even for a missing file)
//! 3. no path, missing path or not a regular file -> 404
//! 4. `If-Modified-Since` later than the modification time -> 304
//! 5. otherwise 200, with the file opened as the body for GET only

use super::fs::FileSystem;
use crate::config::ServeSettings;
use crate::http::date::{format_wire_date, is_after_by_seconds};
use crate::http::{Conditional, Request, Response, Status};
use chrono::{DateTime, Utc};
use std::io;

/// Resolve `request`, stamping the response with the current time
pub async fn resolve<F: FileSystem>(
    request: &Request,
    fs: &F,
    settings: &ServeSettings,
) -> io::Result<Response<F::Body>> {
    resolve_at(request, fs, settings, Utc::now()).await
}

/// Resolve `request` with an explicit `Date` timestamp
///
/// I/O errors after the existence checks (metadata or open) are returned
/// rather than mapped to a status.
pub async fn resolve_at<F: FileSystem>(
    request: &Request,
    fs: &F,
    settings: &ServeSettings,
    now: DateTime<Utc>,
) -> io::Result<Response<F::Body>> {
    let date = format_wire_date(now, &settings.zone);
    let error = |status| Ok(Response::error(status, date.clone(), &settings.server_name));

    if !request.is_get() && !request.is_head() {
        return error(Status::NotImplemented);
    }

    if request.malformed_date() {
        return error(Status::BadRequest);
    }

    let Some(path) = request.resolved_path() else {
        return error(Status::NotFound);
    };
    if !fs.exists(path).await || !fs.is_file(path).await {
        return error(Status::NotFound);
    }

    let content_length = fs.size(path).await?;
    let modified = fs.modified(path).await?;

    if let Conditional::Since(since) = request.conditional() {
        if is_after_by_seconds(*since, modified) {
            return error(Status::NotModified);
        }
    }

    let body = if request.is_get() {
        Some(fs.open(path).await?)
    } else {
        None
    };

    Ok(Response::ok(
        date,
        &settings.server_name,
        format_wire_date(modified, &settings.zone),
        content_length,
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::fs::memory::MemoryFs;
    use crate::http::Zone;
    use chrono::TimeZone;
    use tokio::io::AsyncReadExt;

    const ROOT: &str = "/www";

    fn settings() -> ServeSettings {
        ServeSettings {
            root_dir: ROOT.to_string(),
            server_name: "MyWebServer".to_string(),
            zone: Zone::from_label("EST").unwrap(),
        }
    }

    fn at(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, 12, 0, 0).unwrap()
    }

    fn sample_fs(modified: DateTime<Utc>) -> MemoryFs {
        MemoryFs::new()
            .with_file("/www/a.txt", b"hello world", modified)
            .with_file("/www/index.html", b"<h1>home</h1>", modified)
            .with_dir("/www/docs")
    }

    async fn run(raw: &str, fs: &MemoryFs) -> Response<std::io::Cursor<Vec<u8>>> {
        let request = Request::parse(raw, ROOT);
        resolve_at(&request, fs, &settings(), at(2024, 7, 1)).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_existing_file() {
        let fs = sample_fs(at(2024, 6, 1));
        let mut response = run("GET /a.txt HTTP/1.1\r\n\r\n", &fs).await;

        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.content_length(), 11);
        assert_eq!(
            response.last_modified(),
            Some("Sat Jun 01 07:00:00 EST 2024")
        );
        assert_eq!(response.server_date(), "Mon Jul 01 07:00:00 EST 2024");

        let mut body = Vec::new();
        response
            .take_body()
            .unwrap()
            .read_to_end(&mut body)
            .await
            .unwrap();
        assert_eq!(body, b"hello world");
        assert_eq!(fs.opens(), 1);
    }

    #[tokio::test]
    async fn test_head_never_opens_body() {
        let fs = sample_fs(at(2024, 6, 1));
        let response = run("HEAD /a.txt HTTP/1.1\r\n\r\n", &fs).await;

        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.content_length(), 11);
        assert!(!response.has_body());
        assert_eq!(fs.opens(), 0);
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let fs = sample_fs(at(2024, 6, 1));
        let response = run("GET / HTTP/1.1\r\n\r\n", &fs).await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.content_length(), 13);
    }

    #[tokio::test]
    async fn test_unsupported_methods() {
        let fs = sample_fs(at(2024, 6, 1));
        for raw in [
            "POST /a.txt HTTP/1.1\r\n\r\n",
            "DELETE /missing HTTP/1.1\r\n\r\n",
            "PUT /a.txt HTTP/1.1\r\nIf-Modified-Since: garbage\r\n\r\n",
            "",
        ] {
            let response = run(raw, &fs).await;
            assert_eq!(response.status(), Status::NotImplemented, "{raw:?}");
            assert!(!response.has_body());
        }
        assert_eq!(fs.opens(), 0);
    }

    #[tokio::test]
    async fn test_malformed_date_wins_over_missing_file() {
        let fs = sample_fs(at(2024, 6, 1));
        let response = run(
            "GET /missing.txt HTTP/1.1\r\nIf-Modified-Since: not a date\r\n\r\n",
            &fs,
        )
        .await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = run(
            "HEAD /a.txt HTTP/1.1\r\nIf-Modified-Since: Mon Jan 01 00:00:00 XYZ 2024\r\n\r\n",
            &fs,
        )
        .await;
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[tokio::test]
    async fn test_missing_or_directory_is_not_found() {
        let fs = sample_fs(at(2024, 6, 1));
        for raw in [
            "GET /nope.txt HTTP/1.1\r\n\r\n",
            "GET /docs HTTP/1.1\r\n\r\n",
            "HEAD /docs/ HTTP/1.1\r\n\r\n",
            "GET",
        ] {
            let response = run(raw, &fs).await;
            assert_eq!(response.status(), Status::NotFound, "{raw:?}");
            assert!(!response.has_body());
        }
    }

    #[tokio::test]
    async fn test_conditional_older_file_is_not_modified() {
        let fs = sample_fs(at(2023, 12, 1));
        let response = run(
            "GET /a.txt HTTP/1.1\r\nIf-Modified-Since: Mon Jan 01 00:00:00 EST 2024\r\n\r\n",
            &fs,
        )
        .await;

        assert_eq!(response.status(), Status::NotModified);
        assert!(!response.has_body());
        let head = String::from_utf8(response.head_bytes()).unwrap();
        assert!(!head.contains("Content-Length"));
        assert!(!head.contains("Last-Modified"));
        assert_eq!(fs.opens(), 0);
    }

    #[tokio::test]
    async fn test_conditional_newer_file_is_sent() {
        let fs = sample_fs(at(2024, 6, 1));
        let response = run(
            "GET /a.txt HTTP/1.1\r\nIf-Modified-Since: Mon Jan 01 00:00:00 EST 2024\r\n\r\n",
            &fs,
        )
        .await;

        assert_eq!(response.status(), Status::Ok);
        assert!(response.has_body());
        assert_eq!(response.content_length(), 11);
    }

    #[tokio::test]
    async fn test_conditional_same_second_is_sent() {
        let modified = Utc.with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap()
            + chrono::Duration::milliseconds(400);
        let fs = sample_fs(modified);
        let response = run(
            "HEAD /a.txt HTTP/1.1\r\nIf-Modified-Since: Mon Jan 01 00:00:00 EST 2024\r\n\r\n",
            &fs,
        )
        .await;
        assert_eq!(response.status(), Status::Ok);
    }

    #[tokio::test]
    async fn test_open_failure_is_propagated() {
        let fs = sample_fs(at(2024, 6, 1)).failing_open();
        let request = Request::parse("GET /a.txt HTTP/1.1\r\n\r\n", ROOT);
        let err = resolve(&request, &fs, &settings()).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);

        // HEAD never opens, so it still succeeds
        let request = Request::parse("HEAD /a.txt HTTP/1.1\r\n\r\n", ROOT);
        let response = resolve(&request, &fs, &settings()).await.unwrap();
        assert_eq!(response.status(), Status::Ok);
    }
}
