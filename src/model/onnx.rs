// 该文件是 FlavorSnap （味拍） 项目的一部分。
// src/model/onnx.rs - ONNX 分类模型
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

use std::{io::Cursor, marker::PhantomData};

use tracing::{debug, error, info};
use tract_onnx::prelude::*;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::{AsNchwFrame, ClassifierFrame},
  label::WithLabel,
  model::{Model, ModelError, classify_logits},
};

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

/// 替换了分类头的卷积网络（ONNX 导出），加载后只读
pub struct OnnxClassifier<L> {
  plan: OnnxPlan,
  _phantom: PhantomData<L>,
}

pub struct OnnxClassifierBuilder {
  model_path: String,
}

impl FromUrlWithScheme for OnnxClassifierBuilder {
  const SCHEME: &'static str = "onnx";
}

impl FromUrl for OnnxClassifierBuilder {
  type Error = ModelError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ModelError::SchemeMismatch(url.scheme().to_string()));
    }

    let model_path =
      urlencoding::decode(url.path()).map_err(|e| ModelError::ModelPathError(e.to_string()))?;
    if model_path.is_empty() {
      return Err(ModelError::ModelPathError("empty model path".to_string()));
    }

    Ok(OnnxClassifierBuilder {
      model_path: model_path.into_owned(),
    })
  }
}

impl OnnxClassifierBuilder {
  pub fn build<L: WithLabel>(self) -> Result<OnnxClassifier<L>, ModelError> {
    info!("加载模型文件: {}", self.model_path);
    let model_data = std::fs::read(&self.model_path)?;
    debug!(
      "模型文件大小: {:.2} MB",
      model_data.len() as f64 / (1024.0 * 1024.0)
    );

    let input_shape = ClassifierFrame::default().batch_shape();
    let model = tract_onnx::onnx()
      .model_for_read(&mut Cursor::new(model_data))?
      .with_input_fact(0, f32::fact(input_shape).into())?
      .into_optimized()?;

    let num_outputs = model.outputs.len();
    if num_outputs != 1 {
      error!("预期模型输出数量为 1, 实际为 {}", num_outputs);
      return Err(ModelError::InvalidModel(format!(
        "expected 1 output, found {}",
        num_outputs
      )));
    }

    let output_fact = model.output_fact(0)?;
    match output_fact.shape.as_concrete() {
      Some(dims) if dims.last() == Some(&L::COUNT) => {
        debug!("模型输出形状: {:?}", dims);
      }
      other => {
        error!(
          "分类头输出维度与类别数 {} 不一致: {:?}",
          L::COUNT,
          other
        );
        return Err(ModelError::InvalidModel(format!(
          "classifier head must produce {} classes, found shape {:?}",
          L::COUNT,
          output_fact.shape
        )));
      }
    }

    let plan = model.into_runnable()?;
    info!("模型加载完成");

    Ok(OnnxClassifier {
      plan,
      _phantom: PhantomData,
    })
  }
}

impl<L: WithLabel> Model for OnnxClassifier<L> {
  type Input = ClassifierFrame;
  type Output = L;
  type Error = ModelError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    // 增加批次维度 [1, 3, 224, 224]
    let tensor = Tensor::from_shape(&input.batch_shape(), input.as_nchw())?;

    debug!("执行模型推理");
    let outputs = self.plan.run(tvec!(tensor.into()))?;

    let logits = outputs
      .first()
      .ok_or_else(|| ModelError::InvalidModel("model produced no output".to_string()))?
      .as_slice::<f32>()?;
    debug!("模型推理结果：{:?}", logits);

    classify_logits(logits)
  }
}
