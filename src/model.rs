// 该文件是 FlavorSnap （味拍） 项目的一部分。
// src/model.rs - 模型
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

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, frame::ClassifierFrame, label::WithLabel};

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

#[derive(Error, Debug)]
pub enum ModelError {
  #[error("failed to load model: {0}")]
  LoadError(#[from] std::io::Error),
  #[error("invalid model: {0}")]
  InvalidModel(String),
  #[cfg(feature = "model_onnx")]
  #[error("inference engine error: {0}")]
  EngineError(tract_onnx::prelude::TractError),
  #[error("unknown label: {0}")]
  UnknownLabel(String),
  #[error("class index {0} is out of range")]
  LabelOutOfRange(usize),
  #[error("invalid model path: {0}")]
  ModelPathError(String),
  #[error("unsupported model scheme: {0}")]
  SchemeMismatch(String),
}

#[cfg(feature = "model_onnx")]
impl From<tract_onnx::prelude::TractError> for ModelError {
  fn from(err: tract_onnx::prelude::TractError) -> Self {
    ModelError::EngineError(err)
  }
}

/// 对 logits 取 arg-max 并映射为标签，相同分数时取第一个
pub fn classify_logits<L: WithLabel>(logits: &[f32]) -> Result<L, ModelError> {
  let mut max_logit = f32::NEG_INFINITY;
  let mut cls_idx = None;
  for (idx, &logit) in logits.iter().enumerate() {
    if cls_idx.is_none() || logit > max_logit {
      max_logit = logit;
      cls_idx = Some(idx);
    }
  }

  let cls_idx =
    cls_idx.ok_or_else(|| ModelError::InvalidModel("model produced no logits".to_string()))?;
  debug!("arg-max: 索引 {}, logit {:.4}", cls_idx, max_logit);

  u32::try_from(cls_idx)
    .ok()
    .and_then(L::from_label_id)
    .ok_or(ModelError::LabelOutOfRange(cls_idx))
}

#[cfg(feature = "model_onnx")]
mod onnx;
#[cfg(feature = "model_onnx")]
pub use self::onnx::{OnnxClassifier, OnnxClassifierBuilder};

mod fixed;
pub use self::fixed::FixedLabelModel;

/// 按 URL 方案选择模型实现
pub enum ModelWrapper<L: WithLabel> {
  #[cfg(feature = "model_onnx")]
  Onnx(OnnxClassifier<L>),
  Fixed(FixedLabelModel<L>),
}

impl<L: WithLabel> FromUrl for ModelWrapper<L> {
  type Error = ModelError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    #[cfg(feature = "model_onnx")]
    {
      if url.scheme() == OnnxClassifierBuilder::SCHEME {
        let model = OnnxClassifierBuilder::from_url(url)?.build()?;
        return Ok(ModelWrapper::Onnx(model));
      }
    }

    if url.scheme() == FixedLabelModel::<L>::SCHEME {
      let model = FixedLabelModel::from_url(url)?;
      return Ok(ModelWrapper::Fixed(model));
    }

    Err(ModelError::SchemeMismatch(url.scheme().to_string()))
  }
}

impl<L: WithLabel> Model for ModelWrapper<L> {
  type Input = ClassifierFrame;
  type Output = L;
  type Error = ModelError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    match self {
      #[cfg(feature = "model_onnx")]
      ModelWrapper::Onnx(model) => model.infer(input),
      ModelWrapper::Fixed(model) => model.infer(input),
    }
  }
}
