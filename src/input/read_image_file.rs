// 该文件是 FlavorSnap （味拍） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
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

use tracing::{error, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  input::{InputError, UploadedImage},
};

/// 从磁盘读取的一张图像，内容与界面上传等价
pub struct ImageFileInput {
  upload: UploadedImage,
}

impl FromUrlWithScheme for ImageFileInput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for ImageFileInput {
  type Error = InputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(InputError::SchemeMismatch);
    }

    let path =
      urlencoding::decode(url.path()).map_err(|e| InputError::PathError(e.to_string()))?;
    info!("读取图像文件: {}", path);
    let bytes = std::fs::read(&*path)?;

    Ok(ImageFileInput {
      upload: UploadedImage::from(bytes),
    })
  }
}

impl ImageFileInput {
  pub fn into_upload(self) -> UploadedImage {
    self.upload
  }
}
