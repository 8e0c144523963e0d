// 该文件是 FlavorSnap （味拍） 项目的一部分。
// src/service.rs - 推理服务
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

use std::{sync::Arc, time::Instant};

use image::RgbImage;
use thiserror::Error;
use tracing::info;

use crate::{
  frame::ClassifierFrame,
  input::{InputError, UploadedImage},
  label::{FoodLabel, WithLabel},
  model::{Model, ModelError},
  output::OutputError,
};

/// 可在线程间共享的只读分类模型
pub type SharedModel<L> =
  Arc<dyn Model<Input = ClassifierFrame, Output = L, Error = ModelError> + Send + Sync>;

#[derive(Error, Debug)]
pub enum ClassifyError {
  #[error("{0}")]
  DecodeError(#[from] InputError),
  #[error("{0}")]
  InferenceError(#[from] ModelError),
  #[error("{0}")]
  IoError(#[from] OutputError),
}

/// 启动时构造一次，随后克隆给各个处理函数
pub struct InferenceService<L: WithLabel = FoodLabel> {
  model: SharedModel<L>,
}

impl<L: WithLabel> Clone for InferenceService<L> {
  fn clone(&self) -> Self {
    Self {
      model: Arc::clone(&self.model),
    }
  }
}

impl<L: WithLabel> InferenceService<L> {
  pub fn new<M>(model: M) -> Self
  where
    M: Model<Input = ClassifierFrame, Output = L, Error = ModelError> + Send + Sync + 'static,
  {
    Self {
      model: Arc::new(model),
    }
  }

  pub fn from_shared(model: SharedModel<L>) -> Self {
    Self { model }
  }

  pub fn decode(&self, upload: &UploadedImage) -> Result<RgbImage, ClassifyError> {
    Ok(upload.decode()?)
  }

  /// 预处理 + 一次前向计算 + arg-max
  pub fn predict_image(&self, image: &RgbImage) -> Result<L, ClassifyError> {
    let now = Instant::now();
    let frame = ClassifierFrame::from(image);
    let label = self.model.infer(&frame)?;
    info!(
      "推理完成: {}, 耗时: {:.2?}",
      label.to_label_str(),
      now.elapsed()
    );
    Ok(label)
  }

  pub fn predict(&self, upload: &UploadedImage) -> Result<L, ClassifyError> {
    let image = self.decode(upload)?;
    self.predict_image(&image)
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::model::FixedLabelModel;
  use image::{ImageFormat, Rgb};
  use std::io::Cursor;
  use std::sync::atomic::{AtomicUsize, Ordering};

  pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([180, 90, 40]));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
  }

  /// 记录调用次数的模型
  #[derive(Default)]
  pub(crate) struct CountingModel {
    pub calls: AtomicUsize,
  }

  impl Model for CountingModel {
    type Input = ClassifierFrame;
    type Output = FoodLabel;
    type Error = ModelError;

    fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      assert_eq!(input.batch_shape(), [1, 3, 224, 224]);
      Ok(FoodLabel::Egusi)
    }
  }

  pub(crate) struct FailingModel;

  impl Model for FailingModel {
    type Input = ClassifierFrame;
    type Output = FoodLabel;
    type Error = ModelError;

    fn infer(&self, _input: &Self::Input) -> Result<Self::Output, Self::Error> {
      Err(ModelError::LabelOutOfRange(42))
    }
  }

  #[test]
  fn predict_returns_one_of_the_labels() {
    let service = InferenceService::new(FixedLabelModel::new(FoodLabel::RiceAndStew));
    let upload = UploadedImage::from(png_bytes(500, 500));
    let label = service.predict(&upload).unwrap();
    assert!(FoodLabel::ALL.contains(&label));
    assert_eq!(label, FoodLabel::RiceAndStew);
  }

  #[test]
  fn decode_failure_skips_the_model() {
    let model = Arc::new(CountingModel::default());
    let service = InferenceService::<FoodLabel>::from_shared(model.clone());
    let upload = UploadedImage::from(b"GIF89a-but-not-really".to_vec());

    let err = service.predict(&upload).unwrap_err();
    assert!(matches!(err, ClassifyError::DecodeError(_)));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn inference_failure_is_reported() {
    let service = InferenceService::new(FailingModel);
    let upload = UploadedImage::from(png_bytes(8, 8));
    let err = service.predict(&upload).unwrap_err();
    assert!(matches!(err, ClassifyError::InferenceError(_)));
    assert_eq!(err.to_string(), "class index 42 is out of range");
  }
}
