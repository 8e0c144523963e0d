// 该文件是 FlavorSnap （味拍） 项目的一部分。
// src/bin/flavorsnap_oneshot.rs - 单张图像分类
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

use anyhow::Result;
use clap::Parser;
use url::Url;

use flavorsnap::{
  FromUrl,
  input::ImageFileInput,
  label::{FoodLabel, WithLabel},
  model::ModelWrapper,
  output::{Persist, SampleFolderOutput},
  service::InferenceService,
};
use tracing::info;

/// FlavorSnap 单张图像分类参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 模型路径（onnx:<文件> 或 fixed:<标签>）
  #[arg(long, value_name = "MODEL", default_value = "onnx:models/best_model.onnx")]
  pub model: Url,
  /// 输入图像（image:<文件>）
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 样本保存目录，不指定则不保存
  #[arg(long, value_name = "SAMPLES")]
  pub samples: Option<Url>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("模型文件路径: {}", args.model);
  info!("输入来源: {}", args.input);

  let service = InferenceService::new(ModelWrapper::<FoodLabel>::from_url(&args.model)?);
  let samples = args
    .samples
    .as_ref()
    .map(SampleFolderOutput::from_url)
    .transpose()?;
  let upload = ImageFileInput::from_url(&args.input)?.into_upload();

  let image = service.decode(&upload)?;
  let label = service.predict_image(&image)?;
  if let Some(samples) = samples {
    samples.persist(&image, &label)?;
  }

  println!("{}", label.to_label_str());
  Ok(())
}
