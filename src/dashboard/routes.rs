// 该文件是 FlavorSnap （味拍） 项目的一部分。
// src/dashboard/routes.rs - 面板 HTTP 路由
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

use std::{io::Cursor, sync::Arc};

use axum::{
  Json, Router,
  extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
  http::{StatusCode, header},
  response::{Html, IntoResponse, Response},
  routing::{get, post},
};
use image::ImageFormat;
use thiserror::Error;
use tokio::{sync::Mutex, task::JoinError};
use tracing::{debug, error};

use crate::{
  dashboard::{Dashboard, DashboardView, PublishedView, render_page},
  input::UploadedImage,
  label::WithLabel,
};

/// 上传表单中的文件字段名
const IMAGE_FIELD: &str = "image";

#[derive(Error, Debug)]
pub enum DashboardError {
  #[error("invalid upload: {0}")]
  Multipart(#[from] MultipartError),
  #[error("classification worker failed: {0}")]
  Worker(#[from] JoinError),
  #[error("failed to encode preview: {0}")]
  Preview(#[from] image::ImageError),
  #[error("failed to render page: {0}")]
  Template(#[from] minijinja::Error),
}

impl IntoResponse for DashboardError {
  fn into_response(self) -> Response {
    error!("面板请求失败: {}", self);
    let status = match &self {
      DashboardError::Multipart(e) => e.status(),
      DashboardError::Worker(_) | DashboardError::Preview(_) | DashboardError::Template(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, self.to_string()).into_response()
  }
}

pub struct DashboardState<L: WithLabel> {
  dashboard: Arc<Mutex<Dashboard<L>>>,
  published: PublishedView,
}

impl<L: WithLabel> Clone for DashboardState<L> {
  fn clone(&self) -> Self {
    Self {
      dashboard: Arc::clone(&self.dashboard),
      published: self.published.clone(),
    }
  }
}

impl<L: WithLabel> DashboardState<L> {
  pub fn new(dashboard: Dashboard<L>) -> Self {
    let published = dashboard.published().clone();
    Self {
      dashboard: Arc::new(Mutex::new(dashboard)),
      published,
    }
  }
}

pub fn router<L: WithLabel>(state: DashboardState<L>, body_limit: usize) -> Router {
  Router::new()
    .route("/", get(index::<L>))
    .route("/classify", post(classify::<L>))
    .route("/preview", get(preview::<L>))
    .route("/status", get(status::<L>))
    .layer(DefaultBodyLimit::max(body_limit))
    .with_state(state)
}

async fn index<L: WithLabel>(
  State(state): State<DashboardState<L>>,
) -> Result<Html<String>, DashboardError> {
  let view = state.dashboard.lock().await.view();
  Ok(Html(render_page(&view)?))
}

async fn classify<L: WithLabel>(
  State(state): State<DashboardState<L>>,
  mut multipart: Multipart,
) -> Result<Html<String>, DashboardError> {
  let mut upload = None;
  while let Some(field) = multipart.next_field().await? {
    if field.name() == Some(IMAGE_FIELD) {
      let bytes = field.bytes().await?;
      // 浏览器在未选择文件时仍会提交一个空字段
      if !bytes.is_empty() {
        upload = Some(UploadedImage::from(bytes.to_vec()));
      }
    }
  }

  let dashboard = Arc::clone(&state.dashboard);
  let view = tokio::task::spawn_blocking(move || {
    let mut dashboard = dashboard.blocking_lock();
    if let Some(upload) = upload {
      dashboard.select_file(upload);
    }
    dashboard.classify();
    dashboard.view()
  })
  .await?;

  Ok(Html(render_page(&view)?))
}

async fn preview<L: WithLabel>(
  State(state): State<DashboardState<L>>,
) -> Result<Response, DashboardError> {
  let dashboard = state.dashboard.lock().await;
  let Some(image) = dashboard.preview().image() else {
    return Ok(StatusCode::NOT_FOUND.into_response());
  };

  let mut bytes = Cursor::new(Vec::new());
  image.write_to(&mut bytes, ImageFormat::Png)?;
  debug!("返回预览图像: {} 字节", bytes.get_ref().len());
  Ok(([(header::CONTENT_TYPE, "image/png")], bytes.into_inner()).into_response())
}

/// 读取最近发布的视图，不等待面板锁
async fn status<L: WithLabel>(State(state): State<DashboardState<L>>) -> Json<DashboardView> {
  Json(state.published.snapshot())
}
