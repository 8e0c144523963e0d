// 该文件是 FlavorSnap （味拍） 项目的一部分。
// src/output/sample_folder.rs - 按类别目录保存样本
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

use std::{
  path::{Path, PathBuf},
  sync::{Mutex, PoisonError},
};

use chrono::Utc;
use image::RgbImage;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  label::WithLabel,
  output::{OutputError, Persist},
};

const CONSTANT_FILE_NAME: &str = "uploaded_image.jpg";

/// 样本文件命名方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleNaming {
  /// `<日期-时间>-<计数>.jpg`，同一进程内不会覆盖
  #[default]
  Timestamp,
  /// 固定文件名，新样本覆盖同类别的旧样本
  Constant,
}

/// 将样本写入 `<root>/<label>/<file>`，供之后重新训练使用
///
/// URL 形如 `folder:data/train` 或 `folder:///srv/train?naming=constant`。
pub struct SampleFolderOutput {
  directory: PathBuf,
  naming: SampleNaming,
  frame_counter: Mutex<u16>,
}

impl FromUrlWithScheme for SampleFolderOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for SampleFolderOutput {
  type Error = OutputError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(OutputError::SchemeMismatch);
    }

    let mut naming = SampleNaming::default();
    for (k, v) in uri.query_pairs() {
      if k == "naming" {
        naming = match v.as_ref() {
          "timestamp" => SampleNaming::Timestamp,
          "constant" => SampleNaming::Constant,
          other => return Err(OutputError::UnknownNaming(other.to_string())),
        };
      }
    }

    let directory =
      urlencoding::decode(uri.path()).map_err(|e| OutputError::PathError(e.to_string()))?;
    Ok(Self::new(&*directory, naming))
  }
}

impl SampleFolderOutput {
  pub fn new(directory: impl AsRef<Path>, naming: SampleNaming) -> Self {
    Self {
      directory: directory.as_ref().to_path_buf(),
      naming,
      frame_counter: Mutex::new(0),
    }
  }

  pub fn directory(&self) -> &Path {
    &self.directory
  }

  pub fn naming(&self) -> SampleNaming {
    self.naming
  }

  pub fn label_directory<L: WithLabel>(&self, label: &L) -> PathBuf {
    self.directory.join(label.to_label_str())
  }

  fn frame_id(&self) -> u16 {
    let mut counter = self
      .frame_counter
      .lock()
      .unwrap_or_else(PoisonError::into_inner);
    let id = counter.wrapping_add(1);
    *counter = id;
    id
  }

  fn file_name(&self) -> String {
    match self.naming {
      SampleNaming::Timestamp => format!(
        "{}-{:04X}.jpg",
        Utc::now().format("%Y%m%d-%H%M%S"),
        self.frame_id()
      ),
      SampleNaming::Constant => CONSTANT_FILE_NAME.to_string(),
    }
  }
}

impl<L: WithLabel> Persist<RgbImage, L> for SampleFolderOutput {
  type Error = OutputError;

  fn persist(&self, image: &RgbImage, label: &L) -> Result<PathBuf, Self::Error> {
    let directory = self.label_directory(label);
    std::fs::create_dir_all(&directory)?;

    let path = directory.join(self.file_name());
    image.save(&path)?;
    info!("保存样本到文件: {}", path.display());

    Ok(path)
  }
}
