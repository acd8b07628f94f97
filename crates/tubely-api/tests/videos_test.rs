//! Video upload and read API integration tests.
//!
//! Run with: `cargo test -p tubely-api --test videos_test`

#![cfg(unix)]

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use helpers::auth::bearer;
use helpers::fixtures::create_minimal_mp4;
use helpers::tools::ProbeBehavior;
use helpers::{
    api_path, setup_test_app, setup_test_app_with, TestOptions, TEST_BUCKET, TEST_CDN_DOMAIN,
    TEST_STORAGE_URL,
};
use uuid::Uuid;

fn video_form(content_type: &str) -> MultipartForm {
    let part = Part::bytes(Bytes::from(create_minimal_mp4()))
        .file_name("boots.mp4")
        .mime_type(content_type);
    MultipartForm::new().add_part("video", part)
}

#[tokio::test]
async fn test_upload_landscape_video() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = app.create_video(user_id);

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", video.id)))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 200, "{}", response.text());
    let body: serde_json::Value = response.json();

    let signed_prefix = format!("{}/{}/landscape/", TEST_STORAGE_URL, TEST_BUCKET);
    let video_url = body["video_url"].as_str().unwrap();
    assert!(video_url.starts_with(&signed_prefix), "{}", video_url);
    assert!(video_url.contains(".mp4?expires="));
    assert_eq!(body["video"]["video_url"].as_str(), Some(video_url));
    assert_eq!(body["video_id"].as_str(), Some(video.id.to_string().as_str()));
    assert_eq!(body["message"], "Video uploaded successfully");
    assert!(body["cdn_url"]
        .as_str()
        .unwrap()
        .starts_with(&format!("https://{}/landscape/", TEST_CDN_DOMAIN)));

    // The persisted value is the internal reference, not the signed URL.
    let stored = app.videos.get(video.id).unwrap();
    let reference = stored.video_url.unwrap();
    let key = reference
        .strip_prefix(&format!("{},", TEST_BUCKET))
        .expect("reference starts with the bucket");
    assert!(key.starts_with("landscape/") && key.ends_with(".mp4"));
    assert_eq!(app.stored_keys(), vec![key.to_string()]);

    assert!(app.tools.probe_called());
    assert!(app.tools.ffmpeg_called());
    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn test_portrait_and_other_prefixes() {
    for (ratio, prefix) in [("9:16", "portrait/"), ("4:3", "other/")] {
        let app = setup_test_app_with(TestOptions {
            probe: ProbeBehavior::Aspect(ratio),
            ..Default::default()
        })
        .await;
        let user_id = Uuid::new_v4();
        let video = app.create_video(user_id);

        let response = app
            .client()
            .post(&api_path(&format!("/videos/{}/upload", video.id)))
            .add_header("Authorization", bearer(user_id))
            .multipart(video_form("video/mp4"))
            .await;

        assert_eq!(response.status_code(), 200, "{}", response.text());
        let keys = app.stored_keys();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].starts_with(prefix), "{} -> {}", ratio, keys[0]);
    }
}

#[tokio::test]
async fn test_upload_rejects_malformed_video_id_before_auth() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/videos/not-a-uuid/upload"))
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_upload_requires_bearer_token() {
    let app = setup_test_app().await;
    let video = app.create_video(Uuid::new_v4());

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", video.id)))
        .multipart(video_form("video/mp4"))
        .await;
    assert_eq!(response.status_code(), 401);

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", video.id)))
        .add_header("Authorization", "Bearer not.a.jwt")
        .multipart(video_form("video/mp4"))
        .await;
    assert_eq!(response.status_code(), 401);

    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn test_upload_unknown_video_is_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", Uuid::new_v4())))
        .add_header("Authorization", bearer(Uuid::new_v4()))
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_non_owner_rejected_before_staging() {
    let app = setup_test_app().await;
    let video = app.create_video(Uuid::new_v4());

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", video.id)))
        .add_header("Authorization", bearer(Uuid::new_v4()))
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 401);
    assert!(app.staged_files().is_empty());
    assert!(!app.tools.probe_called());
    assert!(app.stored_keys().is_empty());
    assert_eq!(app.videos.get(video.id).unwrap().video_url, None);
}

#[tokio::test]
async fn test_non_owner_rejected_even_without_multipart_body() {
    let app = setup_test_app().await;
    let video = app.create_video(Uuid::new_v4());

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", video.id)))
        .add_header("Authorization", bearer(Uuid::new_v4()))
        .text("not a form")
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_wrong_content_type_rejected_without_processing() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = app.create_video(user_id);

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", video.id)))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form("image/gif"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(app.staged_files().is_empty());
    assert!(!app.tools.probe_called());
    assert!(!app.tools.ffmpeg_called());
}

#[tokio::test]
async fn test_missing_video_field_rejected() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = app.create_video(user_id);

    let part = Part::bytes(Bytes::from(create_minimal_mp4()))
        .file_name("boots.mp4")
        .mime_type("video/mp4");
    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", video.id)))
        .add_header("Authorization", bearer(user_id))
        .multipart(MultipartForm::new().add_part("file", part))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_probe_failure_cleans_up_and_skips_storage() {
    let app = setup_test_app_with(TestOptions {
        probe: ProbeBehavior::Fail,
        ..Default::default()
    })
    .await;
    let user_id = Uuid::new_v4();
    let video = app.create_video(user_id);

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", video.id)))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PROCESSING_ERROR");
    // Tool stderr stays in the logs.
    assert!(!response.text().contains("moov atom"));

    assert!(app.tools.probe_called());
    assert!(!app.tools.ffmpeg_called());
    assert!(app.staged_files().is_empty());
    assert!(app.stored_keys().is_empty());
    assert_eq!(app.videos.get(video.id).unwrap().video_url, None);
}

#[tokio::test]
async fn test_transcode_failure_cleans_up_partial_output() {
    let app = setup_test_app().await;
    app.tools.fail_transcode();
    let user_id = Uuid::new_v4();
    let video = app.create_video(user_id);

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", video.id)))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500, "{}", response.text());
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PROCESSING_ERROR");
    assert!(!response.text().contains("Conversion failed"));

    assert!(app.tools.ffmpeg_called());
    assert!(app.staged_files().is_empty());
    assert!(app.stored_keys().is_empty());
    assert_eq!(app.videos.get(video.id).unwrap().video_url, None);
}

#[tokio::test]
async fn test_storage_failure_returns_bad_gateway_and_leaves_record() {
    let app = setup_test_app().await;
    // A plain file where the `landscape/` prefix directory must go.
    std::fs::create_dir_all(app.bucket_dir()).unwrap();
    std::fs::write(app.bucket_dir().join("landscape"), b"in the way").unwrap();
    let user_id = Uuid::new_v4();
    let video = app.create_video(user_id);

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", video.id)))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 502, "{}", response.text());
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "STORAGE_ERROR");

    assert!(app.tools.ffmpeg_called());
    assert!(app.staged_files().is_empty());
    assert_eq!(app.stored_keys(), vec!["landscape".to_string()]);
    assert_eq!(app.videos.get(video.id).unwrap().video_url, None);
}

#[tokio::test]
async fn test_oversized_video_rejected() {
    const LIMIT: usize = 1024 * 1024;

    // Past the body limit, and past the file limit but inside multipart framing slack.
    for size in [LIMIT + 256 * 1024, LIMIT + 16 * 1024] {
        let app = setup_test_app_with(TestOptions {
            max_video_size_bytes: LIMIT,
            ..Default::default()
        })
        .await;
        let user_id = Uuid::new_v4();
        let video = app.create_video(user_id);

        let part = Part::bytes(Bytes::from(vec![0u8; size]))
            .file_name("boots.mp4")
            .mime_type("video/mp4");
        let response = app
            .client()
            .post(&api_path(&format!("/videos/{}/upload", video.id)))
            .add_header("Authorization", bearer(user_id))
            .multipart(MultipartForm::new().add_part("video", part))
            .await;

        assert_eq!(response.status_code(), 413, "{} bytes: {}", size, response.text());
        assert!(!app.tools.probe_called());
        assert!(app.staged_files().is_empty());
        assert!(app.stored_keys().is_empty());
        assert_eq!(app.videos.get(video.id).unwrap().video_url, None);
    }
}

#[tokio::test]
async fn test_persistence_failure_leaves_orphaned_object() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = app.create_video(user_id);
    app.videos.fail_updates();

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", video.id)))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PERSISTENCE_ERROR");

    let keys = app.stored_keys();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("landscape/"));
    assert!(app.staged_files().is_empty());
}

#[tokio::test]
async fn test_persistence_failure_compensates_when_enabled() {
    let app = setup_test_app_with(TestOptions {
        compensate_orphans: true,
        ..Default::default()
    })
    .await;
    let user_id = Uuid::new_v4();
    let video = app.create_video(user_id);
    app.videos.fail_updates();

    let response = app
        .client()
        .post(&api_path(&format!("/videos/{}/upload", video.id)))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form("video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500);
    assert!(app.stored_keys().is_empty());
}

#[tokio::test]
async fn test_get_video_resolves_signed_url() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let mut video = app.create_video(user_id);
    video.video_url = Some(format!("{},portrait/abc.mp4", TEST_BUCKET));
    app.videos.insert(video.clone());

    let response = app
        .client()
        .get(&api_path(&format!("/videos/{}", video.id)))
        .add_header("Authorization", bearer(user_id))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    let url = body["video_url"].as_str().unwrap();
    assert!(url.starts_with(&format!(
        "{}/{}/portrait/abc.mp4?expires=",
        TEST_STORAGE_URL, TEST_BUCKET
    )));
    assert_eq!(body["thumbnail_url"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_get_video_with_malformed_reference_fails() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let mut video = app.create_video(user_id);
    video.video_url = Some("onlyonepart".to_string());
    app.videos.insert(video.clone());

    let response = app
        .client()
        .get(&api_path(&format!("/videos/{}", video.id)))
        .add_header("Authorization", bearer(user_id))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "FORMAT_ERROR");
}

#[tokio::test]
async fn test_list_videos_only_returns_own_videos() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let mut mine = app.create_video(user_id);
    mine.video_url = Some(format!("{},landscape/mine.mp4", TEST_BUCKET));
    app.videos.insert(mine.clone());
    app.create_video(Uuid::new_v4());

    let response = app
        .client()
        .get(&api_path("/videos"))
        .add_header("Authorization", bearer(user_id))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Vec<serde_json::Value> = response.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["id"].as_str(), Some(mine.id.to_string().as_str()));
    assert!(body[0]["video_url"]
        .as_str()
        .unwrap()
        .contains("/landscape/mine.mp4?expires="));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "alive");

    let response = app.client().get("/health/ready").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ready");
}
