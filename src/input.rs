// 该文件是 FlavorSnap （味拍） 项目的一部分。
// src/input.rs - 图像输入
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

use image::RgbImage;
use thiserror::Error;
use tracing::debug;

mod read_image_file;
pub use self::read_image_file::ImageFileInput;

#[derive(Error, Debug)]
pub enum InputError {
  #[error("URI scheme mismatch")]
  SchemeMismatch,
  #[error("invalid image path: {0}")]
  PathError(String),
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(#[from] image::ImageError),
}

/// 用户上传的原始图像字节（界面或 HTTP 请求）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
  bytes: Vec<u8>,
}

impl From<Vec<u8>> for UploadedImage {
  fn from(bytes: Vec<u8>) -> Self {
    Self { bytes }
  }
}

impl UploadedImage {
  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }

  /// 解码为 RGB 图像，格式由内容推断
  pub fn decode(&self) -> Result<RgbImage, InputError> {
    let image = image::load_from_memory(&self.bytes)?.to_rgb8();
    debug!(
      "图像解码完成: {}x{}, {} 字节",
      image.width(),
      image.height(),
      self.bytes.len()
    );
    Ok(image)
  }
}
