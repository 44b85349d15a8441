//! Upload Flow Tests
//!
//! Runs the whole pipeline (inputs, enumeration, keys, concurrent uploads,
//! outputs) against a mock S3-compatible endpoint.

#[cfg(test)]
mod tests {
    use s3_upload_action::action::{report, OutputWriter};
    use s3_upload_action::config::{ActionInputs, Config};
    use s3_upload_action::s3::{S3Client, S3ClientConfig};
    use s3_upload_action::upload::put_object::PutObjectHandler;
    use s3_upload_action::upload::UploadError;
    use s3_upload_action::Error;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tree(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, format!("contents of {}", file)).unwrap();
        }
        dir
    }

    fn inputs(server: &MockServer) -> ActionInputs {
        ActionInputs {
            aws_key_id: Some("test-access".into()),
            aws_secret_access_key: Some("test-secret".into()),
            aws_bucket: Some("test-bucket".into()),
            endpoint: Some(server.uri()),
            ..Default::default()
        }
    }

    fn handler(config: &Config) -> PutObjectHandler {
        PutObjectHandler::new(S3Client::new(S3ClientConfig::from(config)).unwrap())
    }

    fn pattern_in(dir: &Path, pattern: &str) -> String {
        format!("{}/{}", dir.display(), pattern)
    }

    // ========================================================================
    // TEST: Directory Mode
    // ========================================================================

    #[tokio::test]
    async fn test_directory_mode_preserves_structure() {
        let server = MockServer::start().await;
        let dir = tree(&["a/b.txt", "index.html"]);

        for key in ["/test-bucket/site/a/b.txt", "/test-bucket/site/index.html"] {
            Mock::given(method("PUT"))
                .and(path(key))
                .respond_with(ResponseTemplate::new(200))
                .expect(1)
                .mount(&server)
                .await;
        }

        let mut raw = inputs(&server);
        raw.source_dir = Some(dir.path().display().to_string());
        raw.destination_dir = Some("site".into());
        let config = Config::from_inputs(&raw).unwrap();

        let outputs = s3_upload_action::run(&config, &handler(&config)).await.unwrap();

        assert_eq!(outputs.object_key, "site");
        assert_eq!(
            outputs.object_locations,
            vec![
                format!("{}/test-bucket/site/a/b.txt", server.uri()),
                format!("{}/test-bucket/site/index.html", server.uri()),
            ]
        );
    }

    #[tokio::test]
    async fn test_random_prefix_used_for_every_key() {
        let server = MockServer::start().await;
        let dir = tree(&["one.txt", "two.txt"]);

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let mut raw = inputs(&server);
        raw.source_dir = Some(dir.path().display().to_string());
        raw.destination_dir = Some("/".into());
        let config = Config::from_inputs(&raw).unwrap();

        let outputs = s3_upload_action::run(&config, &handler(&config)).await.unwrap();

        assert_ne!(outputs.object_key, "/");
        assert!(!outputs.object_key.is_empty());
        for location in &outputs.object_locations {
            let prefix = format!("{}/test-bucket/{}/", server.uri(), outputs.object_key);
            assert!(location.starts_with(&prefix), "{location} lacks {prefix}");
        }
    }

    // ========================================================================
    // TEST: Pattern Mode
    // ========================================================================

    #[tokio::test]
    async fn test_patterns_upload_base_names_with_content_types() {
        let server = MockServer::start().await;
        let dir = tree(&["a.txt", "b.md", "c.png"]);

        Mock::given(method("PUT"))
            .and(path("/test-bucket/docs/a.txt"))
            .and(header("content-type", "text/plain"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/test-bucket/docs/b.md"))
            .and(header("content-type", "text/markdown"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut raw = inputs(&server);
        raw.source_files = Some(format!(
            "{}\n{}\n",
            pattern_in(dir.path(), "*.txt"),
            pattern_in(dir.path(), "*.md")
        ));
        raw.destination_dir = Some("docs".into());
        let config = Config::from_inputs(&raw).unwrap();

        let outputs = s3_upload_action::run(&config, &handler(&config)).await.unwrap();

        assert_eq!(outputs.object_locations.len(), 2);
        assert!(outputs.object_locations[0].ends_with("/docs/a.txt"));
        assert!(outputs.object_locations[1].ends_with("/docs/b.md"));
    }

    #[tokio::test]
    async fn test_nested_match_drops_directories() {
        let server = MockServer::start().await;
        let dir = tree(&["x/y/file.png"]);

        Mock::given(method("PUT"))
            .and(path("/test-bucket/img/file.png"))
            .and(header("content-type", "image/png"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut raw = inputs(&server);
        raw.source_files = Some(pattern_in(dir.path(), "x/**/*.png"));
        raw.destination_dir = Some("img".into());
        let config = Config::from_inputs(&raw).unwrap();

        let outputs = s3_upload_action::run(&config, &handler(&config)).await.unwrap();
        assert_eq!(
            outputs.object_locations,
            vec![format!("{}/test-bucket/img/file.png", server.uri())]
        );
    }

    // ========================================================================
    // TEST: Ordering & Failures
    // ========================================================================

    // The first file answers last; locations still follow enumeration order.
    #[tokio::test]
    async fn test_locations_follow_submission_order() {
        let server = MockServer::start().await;
        let dir = tree(&["1.txt", "2.txt", "3.txt"]);

        for (name, delay) in [("1.txt", 300), ("2.txt", 150), ("3.txt", 0)] {
            Mock::given(method("PUT"))
                .and(path(format!("/test-bucket/{}", name)))
                .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(delay)))
                .expect(1)
                .mount(&server)
                .await;
        }

        let mut raw = inputs(&server);
        raw.source_dir = Some(dir.path().display().to_string());
        let config = Config::from_inputs(&raw).unwrap();

        let outputs = s3_upload_action::run(&config, &handler(&config)).await.unwrap();

        let names: Vec<_> = outputs
            .object_locations
            .iter()
            .map(|l| l.rsplit('/').next().unwrap())
            .collect();
        assert_eq!(names, vec!["1.txt", "2.txt", "3.txt"]);
    }

    #[tokio::test]
    async fn test_one_failed_upload_fails_the_run() {
        let server = MockServer::start().await;
        let dir = tree(&["good.txt", "bad.txt"]);

        Mock::given(method("PUT"))
            .and(path("/test-bucket/good.txt"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/test-bucket/bad.txt"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let mut raw = inputs(&server);
        raw.source_dir = Some(dir.path().display().to_string());
        let config = Config::from_inputs(&raw).unwrap();

        let err = s3_upload_action::run(&config, &handler(&config))
            .await
            .unwrap_err();

        match err {
            Error::Upload(UploadError::Incomplete {
                failed, total, key, ..
            }) => {
                assert_eq!((failed, total), (1, 2));
                assert_eq!(key, "bad.txt");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_no_files_means_no_requests() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut raw = inputs(&server);
        raw.source_files = Some(pattern_in(dir.path(), "*.txt"));
        let config = Config::from_inputs(&raw).unwrap();

        let err = s3_upload_action::run(&config, &handler(&config))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No files to upload");
    }

    // ========================================================================
    // TEST: Outputs
    // ========================================================================

    #[tokio::test]
    async fn test_outputs_written_after_upload() {
        let server = MockServer::start().await;
        let dir = tree(&["a.txt"]);
        let output_file = dir.path().join("github_output");

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut raw = inputs(&server);
        raw.source_files = Some(pattern_in(dir.path(), "*.txt"));
        raw.destination_dir = Some("out".into());
        let config = Config::from_inputs(&raw).unwrap();

        let outputs = s3_upload_action::run(&config, &handler(&config)).await.unwrap();
        report(&outputs, &OutputWriter::to_file(&output_file)).unwrap();

        let written = fs::read_to_string(&output_file).unwrap();
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines[1], "out");
        assert_eq!(
            lines[4],
            format!("[\"{}/test-bucket/out/a.txt\"]", server.uri())
        );
    }
}
