// 该文件是 FlavorSnap （味拍） 项目的一部分。
// src/bin/flavorsnap_dashboard.rs - 交互式分类面板
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

use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use url::Url;

use flavorsnap::{
  FromUrl,
  dashboard::{self, Dashboard, DashboardState},
  label::FoodLabel,
  model::ModelWrapper,
  output::SampleFolderOutput,
  service::InferenceService,
};
use tracing::info;

/// FlavorSnap 面板参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 模型路径（onnx:<文件> 或 fixed:<标签>）
  #[arg(long, value_name = "MODEL", default_value = "onnx:models/best_model.onnx")]
  pub model: Url,
  /// 样本保存目录
  #[arg(long, value_name = "SAMPLES", default_value = "folder:data/train")]
  pub samples: Url,
  /// 监听地址
  #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:5006")]
  pub listen: SocketAddr,
  /// 上传大小上限（字节）
  #[arg(long, value_name = "BYTES", default_value_t = 16 * 1024 * 1024)]
  pub body_limit: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("模型文件路径: {}", args.model);
  info!("样本目录: {}", args.samples);

  // 模型无法加载时直接退出，不提供服务
  let model = ModelWrapper::<FoodLabel>::from_url(&args.model)?;
  let samples = SampleFolderOutput::from_url(&args.samples)?;
  let service = InferenceService::new(model);

  let state = DashboardState::new(Dashboard::new(service, samples));
  let app = dashboard::router(state, args.body_limit);

  let listener = tokio::net::TcpListener::bind(args.listen).await?;
  info!("面板已启动: http://{}", listener.local_addr()?);
  axum::serve(listener, app)
    .with_graceful_shutdown(flavorsnap::shutdown_signal())
    .await?;

  info!("面板已退出");
  Ok(())
}
