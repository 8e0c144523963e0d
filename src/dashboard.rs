// 该文件是 FlavorSnap （味拍） 项目的一部分。
// src/dashboard.rs - 交互式分类面板
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

use std::sync::{
  Arc, PoisonError, RwLock,
  atomic::{AtomicBool, Ordering},
};

use image::RgbImage;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
  input::UploadedImage,
  label::{FoodLabel, WithLabel},
  output::{Persist, SampleFolderOutput},
  service::{ClassifyError, InferenceService},
};

mod page;
mod routes;
pub use self::page::render_page;
pub use self::routes::{DashboardError, DashboardState, router};

pub const TITLE: &str = "🍽️ FlavorSnap";
pub const INSTRUCTIONS: &str = "Upload an image and click the button to classify your food!";
pub const INITIAL_OUTPUT: &str = "Upload an image of food 🍲";
pub const WARNING_NO_UPLOAD: &str = "⚠️ Please upload an image first.";
pub const BUSY_OUTPUT: &str = "🔍 Classifying...";

/// 输出区状态：`Idle -> Warning`，或 `Idle -> Busy -> Success | Error`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
  Idle,
  Warning,
  Busy,
  Success { label: String },
  Error { message: String },
}

impl Phase {
  pub fn output_text(&self) -> String {
    match self {
      Phase::Idle => INITIAL_OUTPUT.to_string(),
      Phase::Warning => WARNING_NO_UPLOAD.to_string(),
      Phase::Busy => BUSY_OUTPUT.to_string(),
      Phase::Success { label } => format!("✅ Identified as **{}**. Image saved!", label),
      Phase::Error { message } => format!("❌ Error: {}", message),
    }
  }
}

/// 加载指示器，可在不持有面板锁的情况下读取
#[derive(Debug, Clone, Default)]
pub struct BusyIndicator(Arc<AtomicBool>);

impl BusyIndicator {
  pub fn is_busy(&self) -> bool {
    self.0.load(Ordering::SeqCst)
  }

  /// 置为忙碌，返回的守卫在析构时复位
  pub fn raise(&self) -> BusyGuard<'_> {
    self.0.store(true, Ordering::SeqCst);
    BusyGuard(&self.0)
  }
}

pub struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::SeqCst);
  }
}

#[derive(Debug, Default)]
pub struct ImagePreview {
  image: Option<RgbImage>,
  visible: bool,
  revision: u64,
}

impl ImagePreview {
  pub fn show(&mut self, image: RgbImage) {
    self.image = Some(image);
    self.visible = true;
    self.revision += 1;
  }

  pub fn hide(&mut self) {
    self.visible = false;
  }

  pub fn is_visible(&self) -> bool {
    self.visible
  }

  pub fn revision(&self) -> u64 {
    self.revision
  }

  /// 仅在可见时返回图像
  pub fn image(&self) -> Option<&RgbImage> {
    self.image.as_ref().filter(|_| self.visible)
  }
}

/// 页面渲染与状态查询所用的快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardView {
  pub busy: bool,
  pub preview_visible: bool,
  /// 仅用于页面中的预览地址，防止浏览器缓存旧图
  #[serde(skip)]
  pub preview_revision: u64,
  pub output: String,
}

/// 最近一次发布的视图，查询状态时无需持有面板锁
#[derive(Debug, Clone)]
pub struct PublishedView(Arc<RwLock<DashboardView>>);

impl PublishedView {
  fn new(view: DashboardView) -> Self {
    Self(Arc::new(RwLock::new(view)))
  }

  pub fn snapshot(&self) -> DashboardView {
    self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
  }

  fn store(&self, view: DashboardView) {
    *self.0.write().unwrap_or_else(PoisonError::into_inner) = view;
  }
}

/// 控件图：文件输入、加载指示器、预览与输出文本
pub struct Dashboard<L: WithLabel = FoodLabel> {
  service: InferenceService<L>,
  samples: SampleFolderOutput,
  upload: Option<UploadedImage>,
  preview: ImagePreview,
  spinner: BusyIndicator,
  phase: Phase,
  published: PublishedView,
}

impl<L: WithLabel> Dashboard<L> {
  pub fn new(service: InferenceService<L>, samples: SampleFolderOutput) -> Self {
    let dashboard = Self {
      service,
      samples,
      upload: None,
      preview: ImagePreview::default(),
      spinner: BusyIndicator::default(),
      phase: Phase::Idle,
      published: PublishedView::new(DashboardView::default()),
    };
    dashboard.publish();
    dashboard
  }

  /// 文件输入控件的新值
  pub fn select_file(&mut self, upload: UploadedImage) {
    info!("收到上传文件: {} 字节", upload.len());
    self.upload = Some(upload);
  }

  pub fn spinner(&self) -> &BusyIndicator {
    &self.spinner
  }

  pub fn phase(&self) -> &Phase {
    &self.phase
  }

  pub fn preview(&self) -> &ImagePreview {
    &self.preview
  }

  pub fn published(&self) -> &PublishedView {
    &self.published
  }

  fn publish(&self) {
    self.published.store(self.view());
  }

  pub fn view(&self) -> DashboardView {
    DashboardView {
      busy: self.spinner.is_busy(),
      preview_visible: self.preview.is_visible(),
      preview_revision: self.preview.revision(),
      output: self.phase.output_text(),
    }
  }

  /// 分类按钮的处理函数，任何错误都只体现在输出文本中
  pub fn classify(&mut self) -> &Phase {
    let Some(upload) = self.upload.clone() else {
      warn!("未上传图像，忽略分类请求");
      self.phase = Phase::Warning;
      self.preview.hide();
      self.publish();
      return &self.phase;
    };

    let spinner = self.spinner.clone();
    self.phase = match self.run_classification(&upload, &spinner) {
      Ok(label) => Phase::Success {
        label: label.to_label_str().to_string(),
      },
      Err(e) => {
        warn!("分类失败: {}", e);
        Phase::Error {
          message: e.to_string(),
        }
      }
    };
    self.publish();
    &self.phase
  }

  fn run_classification(
    &mut self,
    upload: &UploadedImage,
    spinner: &BusyIndicator,
  ) -> Result<L, ClassifyError> {
    let image = self.service.decode(upload)?;
    self.preview.show(image.clone());

    let _busy = spinner.raise();
    self.phase = Phase::Busy;
    self.publish();

    let label = self.service.predict_image(&image)?;
    self.samples.persist(&image, &label)?;
    Ok(label)
  }
}
