// 该文件是 FlavorSnap （味拍） 项目的一部分。
// src/label.rs - 分类标签
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

use std::fmt;

pub trait WithLabel: Sized + Copy + fmt::Debug + Send + Sync + 'static {
  /// 类别数量，必须与分类头的输出维度一致
  const COUNT: usize;

  fn to_label_str(&self) -> &'static str;
  fn from_label_id(id: u32) -> Option<Self>;
  fn from_label_str(label: &str) -> Option<Self>;
}

/// 食物类别
///
/// 顺序与训练分类头时使用的索引顺序一致，不可调整。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoodLabel {
  Akara,
  Bread,
  Egusi,
  MoiMoi,
  RiceAndStew,
  Yam,
}

impl FoodLabel {
  pub const ALL: [FoodLabel; 6] = [
    FoodLabel::Akara,
    FoodLabel::Bread,
    FoodLabel::Egusi,
    FoodLabel::MoiMoi,
    FoodLabel::RiceAndStew,
    FoodLabel::Yam,
  ];
}

impl WithLabel for FoodLabel {
  const COUNT: usize = Self::ALL.len();

  fn to_label_str(&self) -> &'static str {
    match self {
      FoodLabel::Akara => "Akara",
      FoodLabel::Bread => "Bread",
      FoodLabel::Egusi => "Egusi",
      FoodLabel::MoiMoi => "Moi Moi",
      FoodLabel::RiceAndStew => "Rice and Stew",
      FoodLabel::Yam => "Yam",
    }
  }

  fn from_label_id(id: u32) -> Option<Self> {
    Self::ALL.get(id as usize).copied()
  }

  fn from_label_str(label: &str) -> Option<Self> {
    Self::ALL
      .iter()
      .find(|l| l.to_label_str() == label)
      .copied()
  }
}

impl fmt::Display for FoodLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.to_label_str())
  }
}
