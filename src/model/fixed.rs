// 该文件是 FlavorSnap （味拍） 项目的一部分。
// src/model/fixed.rs - 固定标签模型
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

use tracing::{debug, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::ClassifierFrame,
  label::WithLabel,
  model::{Model, ModelError},
};

/// 不做前向计算、总是返回同一标签的模型，例如 `fixed:Moi%20Moi`
#[derive(Debug, Clone, Copy)]
pub struct FixedLabelModel<L> {
  label: L,
}

impl<L: WithLabel> FixedLabelModel<L> {
  pub fn new(label: L) -> Self {
    Self { label }
  }
}

impl<L: WithLabel> FromUrlWithScheme for FixedLabelModel<L> {
  const SCHEME: &'static str = "fixed";
}

impl<L: WithLabel> FromUrl for FixedLabelModel<L> {
  type Error = ModelError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ModelError::SchemeMismatch(url.scheme().to_string()));
    }

    let name = urlencoding::decode(url.path())
      .map_err(|e| ModelError::ModelPathError(e.to_string()))?;
    let label = L::from_label_str(&name).ok_or_else(|| ModelError::UnknownLabel(name.to_string()))?;
    info!("使用固定标签模型: {}", label.to_label_str());

    Ok(Self::new(label))
  }
}

impl<L: WithLabel> Model for FixedLabelModel<L> {
  type Input = ClassifierFrame;
  type Output = L;
  type Error = ModelError;

  fn infer(&self, _input: &Self::Input) -> Result<Self::Output, Self::Error> {
    debug!("固定标签模型，跳过前向计算");
    Ok(self.label)
  }
}
