// 该文件是 FlavorSnap （味拍） 项目的一部分。
// tests/dashboard.rs - 面板路由测试
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

mod common;

use std::path::Path;

use axum::{
  Router,
  http::{StatusCode, header},
};
use tower::ServiceExt;
use url::Url;

use common::{
  BODY_LIMIT, body_bytes, body_json, body_text, get_request, jpeg_bytes, multipart_request,
};
use flavorsnap::{
  FromUrl,
  dashboard::{self, Dashboard, DashboardState},
  label::FoodLabel,
  model::ModelWrapper,
  output::SampleFolderOutput,
  service::InferenceService,
};

fn app(samples: &Path) -> Router {
  let model = ModelWrapper::<FoodLabel>::from_url(&Url::parse("fixed:Rice%20and%20Stew").unwrap())
    .unwrap();
  let samples =
    SampleFolderOutput::from_url(&Url::parse(&format!("folder://{}", samples.display())).unwrap())
      .unwrap();
  let state = DashboardState::new(Dashboard::new(InferenceService::new(model), samples));
  dashboard::router(state, BODY_LIMIT)
}

#[tokio::test]
async fn index_renders_initial_page() {
  let root = tempfile::tempdir().unwrap();
  let response = app(root.path()).oneshot(get_request("/")).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);

  let html = body_text(response).await;
  assert!(html.contains("🍽️ FlavorSnap"));
  assert!(html.contains("Upload an image of food 🍲"));
  assert!(html.contains("name=\"image\""));
  assert!(!html.contains("id=\"preview\""));
}

#[tokio::test]
async fn classify_without_upload_warns() {
  let root = tempfile::tempdir().unwrap();
  let app = app(root.path());

  // 浏览器未选择文件时提交的空字段
  let request = multipart_request("/classify", &[("image", "", b"".as_slice())]);
  let response = app.clone().oneshot(request).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  let html = body_text(response).await;
  assert!(html.contains("⚠️ Please upload an image first."));
  assert!(!html.contains("id=\"preview\""));

  let status = body_json(app.clone().oneshot(get_request("/status")).await.unwrap()).await;
  assert_eq!(status["output"], "⚠️ Please upload an image first.");
  assert_eq!(status["busy"], false);
  assert_eq!(status["preview_visible"], false);

  let preview = app.oneshot(get_request("/preview")).await.unwrap();
  assert_eq!(preview.status(), StatusCode::NOT_FOUND);
  assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn classify_upload_saves_sample_and_shows_preview() {
  let root = tempfile::tempdir().unwrap();
  let app = app(root.path());

  let image = jpeg_bytes(500, 500);
  let request = multipart_request("/classify", &[("image", "rice.jpg", image.as_slice())]);
  let response = app.clone().oneshot(request).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);

  let html = body_text(response).await;
  assert!(html.contains("✅ Identified as <strong>Rice and Stew</strong>. Image saved!"));
  assert!(html.contains("id=\"preview\""));

  let saved = std::fs::read_dir(root.path().join("Rice and Stew")).unwrap().count();
  assert_eq!(saved, 1);

  let preview = app.clone().oneshot(get_request("/preview")).await.unwrap();
  assert_eq!(preview.status(), StatusCode::OK);
  assert_eq!(preview.headers()[header::CONTENT_TYPE], "image/png");
  let png = image::load_from_memory(&body_bytes(preview).await).unwrap();
  assert_eq!((png.width(), png.height()), (500, 500));

  let status = body_json(app.oneshot(get_request("/status")).await.unwrap()).await;
  assert_eq!(status["busy"], false);
  assert_eq!(status["preview_visible"], true);
}

#[tokio::test]
async fn classify_keeps_previous_upload_when_field_is_empty() {
  let root = tempfile::tempdir().unwrap();
  let app = app(root.path());

  let image = jpeg_bytes(64, 48);
  let first = multipart_request("/classify", &[("image", "rice.jpg", image.as_slice())]);
  app.clone().oneshot(first).await.unwrap();

  let again = multipart_request("/classify", &[("image", "", b"".as_slice())]);
  let html = body_text(app.oneshot(again).await.unwrap()).await;
  assert!(html.contains("Identified as <strong>Rice and Stew</strong>"));

  let saved = std::fs::read_dir(root.path().join("Rice and Stew")).unwrap().count();
  assert_eq!(saved, 2);
}

#[tokio::test]
async fn classify_corrupt_upload_reports_error() {
  let root = tempfile::tempdir().unwrap();
  let app = app(root.path());

  let request = multipart_request("/classify", &[("image", "broken.jpg", b"\xff\xd8 broken".as_slice())]);
  let html = body_text(app.clone().oneshot(request).await.unwrap()).await;
  assert!(html.contains("❌ Error: "));

  let status = body_json(app.oneshot(get_request("/status")).await.unwrap()).await;
  assert_eq!(status["busy"], false);
  assert!(status["output"].as_str().unwrap().starts_with("❌ Error: "));
  assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}
