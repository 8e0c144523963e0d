// 该文件是 FlavorSnap （味拍） 项目的一部分。
// src/api.rs - 预测接口
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

use axum::{
  Json, Router,
  extract::{DefaultBodyLimit, Multipart, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::{input::UploadedImage, label::WithLabel, service::InferenceService};

const IMAGE_FIELD: &str = "image";
pub const NO_IMAGE_UPLOADED: &str = "No image uploaded";

/// `POST /predict` 的响应体：只有 `label` 或只有 `error`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PredictResponse {
  Label { label: String },
  Error { error: String },
}

impl PredictResponse {
  fn error(status: StatusCode, message: impl Into<String>) -> Response {
    let body = PredictResponse::Error {
      error: message.into(),
    };
    (status, Json(body)).into_response()
  }
}

pub fn router<L: WithLabel>(service: InferenceService<L>, body_limit: usize) -> Router {
  Router::new()
    .route("/predict", post(predict::<L>))
    .route("/health", get(health))
    .layer(DefaultBodyLimit::max(body_limit))
    .with_state(service)
}

async fn predict<L: WithLabel>(
  State(service): State<InferenceService<L>>,
  mut multipart: Multipart,
) -> Response {
  let mut upload = None;
  loop {
    match multipart.next_field().await {
      Ok(Some(field)) if field.name() == Some(IMAGE_FIELD) => match field.bytes().await {
        Ok(bytes) => {
          upload = Some(UploadedImage::from(bytes.to_vec()));
          break;
        }
        Err(e) => return PredictResponse::error(e.status(), e.body_text()),
      },
      Ok(Some(_)) => continue,
      Ok(None) => break,
      Err(e) => return PredictResponse::error(e.status(), e.body_text()),
    }
  }

  let Some(upload) = upload else {
    warn!("请求中没有 {} 字段", IMAGE_FIELD);
    return PredictResponse::error(StatusCode::BAD_REQUEST, NO_IMAGE_UPLOADED);
  };

  info!("收到预测请求: {} 字节", upload.len());
  let result = tokio::task::spawn_blocking(move || service.predict(&upload)).await;

  match result {
    Ok(Ok(label)) => {
      let body = PredictResponse::Label {
        label: label.to_label_str().to_string(),
      };
      (StatusCode::OK, Json(body)).into_response()
    }
    Ok(Err(e)) => {
      warn!("预测失败: {}", e);
      PredictResponse::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
    Err(e) => PredictResponse::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
  }
}

async fn health() -> Json<serde_json::Value> {
  Json(json!({ "status": "OK" }))
}
